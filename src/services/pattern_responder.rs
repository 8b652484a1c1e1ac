use rand::seq::IndexedRandom;
use regex::Regex;

/// Last-resort reply, also the template of the default catch-all rule.
const FALLBACK_REPLY: &str = "Sorry, I did not understand that. Can you please rephrase?";

struct Rule {
    pattern: Regex,
    templates: Vec<String>,
}

/// Canned-chat responder: an ordered list of (pattern, templates) rules.
///
/// Rules are tried in order and the first match wins. A template is chosen
/// at random from the matching rule's set, and `%N` placeholders are filled
/// with the reflected text of capture group N. The rule table and the
/// reflection table are fixed at construction; `respond` takes `&self` and
/// holds no per-call state.
pub struct PatternResponder {
    rules: Vec<Rule>,
    // Sorted longest-first so multi-word phrases win over their prefixes.
    reflections: Vec<(String, String)>,
    reflection_matcher: Option<Regex>,
}

impl PatternResponder {
    /// Compiles a rule table. Patterns match case-insensitively and are
    /// anchored at the start of the input; reflection keys match whole
    /// phrases only.
    pub fn new(
        pairs: Vec<(String, Vec<String>)>,
        reflections: Vec<(String, String)>,
    ) -> Result<Self, regex::Error> {
        let mut rules = Vec::with_capacity(pairs.len());
        for (pattern, templates) in pairs {
            let compiled = Regex::new(&format!("(?i)^(?:{pattern})"))?;
            rules.push(Rule {
                pattern: compiled,
                templates,
            });
        }

        let mut reflections: Vec<(String, String)> = reflections
            .into_iter()
            .map(|(from, to)| (from.to_lowercase(), to))
            .collect();
        reflections.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let reflection_matcher = if reflections.is_empty() {
            None
        } else {
            let alternation = reflections
                .iter()
                .map(|(from, _)| regex::escape(from))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?)
        };

        Ok(Self {
            rules,
            reflections,
            reflection_matcher,
        })
    }

    /// The stock rule table: greetings, small talk, name echo, and a
    /// universal catch-all as the last rule.
    pub fn with_default_rules() -> Result<Self, regex::Error> {
        Self::new(default_pairs(), default_reflections())
    }

    /// Always returns a reply. The default table ends in a catch-all; a
    /// custom table without one falls back to a fixed apology.
    pub fn respond(&self, input: &str) -> String {
        for rule in &self.rules {
            if let Some(caps) = rule.pattern.captures(input) {
                let Some(template) = rule.templates.choose(&mut rand::rng()) else {
                    continue;
                };
                return self.fill(template, &caps);
            }
        }
        FALLBACK_REPLY.to_string()
    }

    fn fill(&self, template: &str, caps: &regex::Captures<'_>) -> String {
        let mut out = template.to_string();
        for n in 1..caps.len() {
            let placeholder = format!("%{n}");
            if !out.contains(&placeholder) {
                continue;
            }
            let fragment = caps.get(n).map(|m| m.as_str()).unwrap_or("");
            out = out.replace(&placeholder, &self.reflect(fragment));
        }
        out
    }

    /// Swaps first- and second-person phrases so echoed fragments read from
    /// the bot's perspective. Case-insensitive, whole phrases only; text
    /// outside the table (names, for instance) passes through untouched.
    fn reflect(&self, fragment: &str) -> String {
        let Some(matcher) = &self.reflection_matcher else {
            return fragment.to_string();
        };

        matcher
            .replace_all(fragment, |caps: &regex::Captures<'_>| {
                let hit = caps[0].to_lowercase();
                self.reflections
                    .iter()
                    .find(|(from, _)| *from == hit)
                    .map(|(_, to)| to.clone())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn default_pairs() -> Vec<(String, Vec<String>)> {
    let pairs: &[(&str, &[&str])] = &[
        ("hi|hello|hey", &["Hello!", "Hi there!", "Hey!"]),
        (
            "how are you?",
            &[
                "I am doing well, thank you!",
                "I am fine, how about you?",
            ],
        ),
        (
            "what is your name?",
            &["I am an AI chatbot. What is your name?"],
        ),
        (r"my name is (.*)", &["Nice to meet you, %1!"]),
        ("quit", &["Goodbye! Have a great day!"]),
        (
            "top gainers and losers",
            &["Let me fetch the top gainers and losers for you."],
        ),
        (
            r"what are the top gainers and losers\??",
            &["Let me fetch the top gainers and losers for you."],
        ),
        (
            "show me the top gainers and losers",
            &["Let me fetch the top gainers and losers for you."],
        ),
        (r"ohlc of (.*)", &["Let me fetch the OHLC data for %1."]),
        (r"(.*)", &[FALLBACK_REPLY]),
    ];

    pairs
        .iter()
        .map(|(pattern, templates)| {
            (
                (*pattern).to_string(),
                templates.iter().map(|t| (*t).to_string()).collect(),
            )
        })
        .collect()
}

/// First-/second-person pronoun swaps applied to echoed fragments.
fn default_reflections() -> Vec<(String, String)> {
    [
        ("i am", "you are"),
        ("i was", "you were"),
        ("i'm", "you are"),
        ("i'd", "you would"),
        ("i've", "you have"),
        ("i'll", "you will"),
        ("i", "you"),
        ("my", "your"),
        ("you are", "I am"),
        ("you were", "I was"),
        ("you've", "I have"),
        ("you'll", "I will"),
        ("your", "my"),
        ("yours", "mine"),
        ("you", "me"),
        ("me", "you"),
    ]
    .iter()
    .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
    .collect()
}
