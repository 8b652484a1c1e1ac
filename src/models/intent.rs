/// A market-data request recognized inside a free-text message.
///
/// Entity-bearing variants carry the coin name exactly as the user wrote it
/// after the trigger phrase, lower-cased and trimmed of whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Price { coin: String },
    MarketCap { coin: String },
    TradingVolume { coin: String },
    Recommend,
    PredictPrice { coin: String },
    TopGainersLosers,
    Ohlc { coin: String },
}

impl Intent {
    /// Scans the utterance for trigger phrases in a fixed priority order;
    /// the first phrase found wins and the rest are never considered.
    ///
    /// "predict price of" is tested ahead of "price of" because every
    /// occurrence of the former contains the latter.
    pub fn parse(utterance: &str) -> Option<Intent> {
        let lowered = utterance.to_lowercase();

        if let Some(coin) = entity_after(&lowered, "predict price of") {
            return Some(Intent::PredictPrice { coin });
        }
        if let Some(coin) = entity_after(&lowered, "price of") {
            return Some(Intent::Price { coin });
        }
        if let Some(coin) = entity_after(&lowered, "market cap of") {
            return Some(Intent::MarketCap { coin });
        }
        if let Some(coin) = entity_after(&lowered, "trading volume of") {
            return Some(Intent::TradingVolume { coin });
        }
        if lowered.contains("recommend a coin") {
            return Some(Intent::Recommend);
        }
        if lowered.contains("top gainers and losers") {
            return Some(Intent::TopGainersLosers);
        }
        if let Some(coin) = entity_after(&lowered, "ohlc of") {
            return Some(Intent::Ohlc { coin });
        }

        None
    }
}

/// The text after the last occurrence of `trigger`, trimmed.
///
/// `None` means the trigger phrase is absent: a non-match, not an empty
/// entity. An empty entity ("price of" with nothing after) is a valid
/// parse and resolves downstream as a lookup with no result.
fn entity_after(lowered: &str, trigger: &str) -> Option<String> {
    lowered
        .rfind(trigger)
        .map(|at| lowered[at + trigger.len()..].trim().to_string())
}
