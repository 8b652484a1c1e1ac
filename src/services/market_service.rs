use tracing::warn;

use crate::external::market_provider::{MarketProvider, MarketProviderError, TopMovers};
use crate::services::forecasting_service;

pub(crate) const API_FAILURE_REPLY: &str = "Failed to retrieve data from the API.";

// Window sizes match the upstream display conventions: 30 daily points feed
// the prediction, OHLC covers the most recent day, and the recommendation
// looks at the top 10 coins by market cap.
const PREDICTION_WINDOW_DAYS: u32 = 30;
const OHLC_WINDOW_DAYS: u32 = 1;
const RECOMMENDATION_POOL: u32 = 10;

/// Current price, e.g. `The price of Bitcoin in USD is $50000`.
pub async fn price_reply(provider: &dyn MarketProvider, name: &str) -> String {
    let id = coin_id(name);
    if id.is_empty() {
        return price_not_found(name);
    }

    match provider.simple_price(&id).await {
        Ok(Some(price)) => format!("The price of {} in USD is ${}", capitalized(name), price),
        Ok(None) => price_not_found(name),
        Err(err) => {
            warn!("price lookup for '{}' failed: {}", id, err);
            API_FAILURE_REPLY.to_string()
        }
    }
}

/// Market capitalization with thousands separators.
pub async fn market_cap_reply(provider: &dyn MarketProvider, name: &str) -> String {
    let id = coin_id(name);
    if id.is_empty() {
        return market_cap_not_found(name);
    }

    match provider.coin_markets(&id).await {
        Ok(entries) => match entries.first().and_then(|entry| entry.market_cap) {
            Some(cap) => format!(
                "The market cap of {} in USD is ${}",
                capitalized(name),
                thousands(cap)
            ),
            None => market_cap_not_found(name),
        },
        Err(err) => {
            warn!("market cap lookup for '{}' failed: {}", id, err);
            API_FAILURE_REPLY.to_string()
        }
    }
}

/// 24h trading volume with thousands separators.
pub async fn trading_volume_reply(provider: &dyn MarketProvider, name: &str) -> String {
    let id = coin_id(name);
    if id.is_empty() {
        return volume_not_found(name);
    }

    match provider.total_volume(&id).await {
        Ok(Some(volume)) => format!(
            "The trading volume of {} in USD is ${}",
            capitalized(name),
            thousands(volume)
        ),
        Ok(None) => volume_not_found(name),
        Err(err) => {
            warn!("trading volume lookup for '{}' failed: {}", id, err);
            API_FAILURE_REPLY.to_string()
        }
    }
}

/// Recommends the coin currently ranked first by market cap.
pub async fn recommend_reply(provider: &dyn MarketProvider) -> String {
    match provider.top_coins(RECOMMENDATION_POOL).await {
        Ok(coins) => match coins.first() {
            Some(best) => format!(
                "I recommend considering {} as it has the highest market cap and trading volume.",
                capitalized(&best.id)
            ),
            None => "Sorry, I could not find any recommendations at this moment.".to_string(),
        },
        Err(err) => {
            warn!("recommendation lookup failed: {}", err);
            API_FAILURE_REPLY.to_string()
        }
    }
}

/// Linear-trend price prediction over the trailing month of daily closes.
pub async fn predict_reply(provider: &dyn MarketProvider, name: &str) -> String {
    let id = coin_id(name);
    if id.is_empty() {
        return prediction_not_found(name);
    }

    match provider.market_chart(&id, PREDICTION_WINDOW_DAYS).await {
        Ok(Some(points)) => match forecasting_service::predict_next(&points) {
            Ok(predicted) => format!(
                "The predicted price of {} for the next day is ${:.2}",
                capitalized(name),
                predicted
            ),
            Err(err) => {
                warn!("prediction for '{}' failed: {}", id, err);
                prediction_not_found(name)
            }
        },
        Ok(None) => prediction_not_found(name),
        Err(err) => {
            warn!("market chart lookup for '{}' failed: {}", id, err);
            API_FAILURE_REPLY.to_string()
        }
    }
}

/// Most recent daily OHLC candle, each leg to two decimal places.
pub async fn ohlc_reply(provider: &dyn MarketProvider, name: &str) -> String {
    let id = coin_id(name);
    if id.is_empty() {
        return ohlc_not_found(name);
    }

    match provider.ohlc(&id, OHLC_WINDOW_DAYS).await {
        Ok(candles) => match candles.last() {
            Some(candle) => format!(
                "OHLC for {} (USD):\nOpen: ${:.2}, High: ${:.2}, Low: ${:.2}, Close: ${:.2}",
                capitalized(name),
                candle.open,
                candle.high,
                candle.low,
                candle.close
            ),
            None => ohlc_not_found(name),
        },
        Err(err) => {
            warn!("OHLC lookup for '{}' failed: {}", id, err);
            API_FAILURE_REPLY.to_string()
        }
    }
}

/// Ranked gainer/loser sections. HTTP statuses are disambiguated for this
/// endpoint only; a transport failure has no status and maps to the generic
/// failure reply.
pub async fn top_movers_reply(provider: &dyn MarketProvider) -> String {
    match provider.top_gainers_losers().await {
        Ok(movers) => render_movers(&movers),
        Err(MarketProviderError::Http(401)) => {
            "Failed to retrieve data: Unauthorized. Please check your API key.".to_string()
        }
        Err(MarketProviderError::Http(404)) => {
            "Failed to retrieve data: Endpoint not found.".to_string()
        }
        Err(MarketProviderError::Http(500)) => {
            "Failed to retrieve data: Internal server error at CoinGecko.".to_string()
        }
        Err(MarketProviderError::Http(status)) => {
            format!("Failed to retrieve data: HTTP {status}.")
        }
        Err(err) => {
            warn!("gainers/losers lookup failed: {}", err);
            API_FAILURE_REPLY.to_string()
        }
    }
}

fn render_movers(movers: &TopMovers) -> String {
    let gainers = match &movers.gainers {
        Some(list) => list
            .iter()
            .enumerate()
            .map(|(i, mover)| format!("{}. {} (+{:.2}%)", i + 1, mover.name, mover.usd_24h_change))
            .collect::<Vec<_>>()
            .join("\n"),
        None => "No data available for top gainers.".to_string(),
    };

    // Loser changes are negative; the sign comes from the value itself.
    let losers = match &movers.losers {
        Some(list) => list
            .iter()
            .enumerate()
            .map(|(i, mover)| format!("{}. {} ({:.2}%)", i + 1, mover.name, mover.usd_24h_change))
            .collect::<Vec<_>>()
            .join("\n"),
        None => "No data available for top losers.".to_string(),
    };

    format!("### Top Gainers:\n{gainers}\n\n### Top Losers:\n{losers}")
}

fn price_not_found(name: &str) -> String {
    format!("Sorry, I could not find the price for {name}.")
}

fn market_cap_not_found(name: &str) -> String {
    format!("Sorry, I could not find the market cap for {name}.")
}

fn volume_not_found(name: &str) -> String {
    format!("Sorry, I could not find the trading volume for {name}.")
}

fn prediction_not_found(name: &str) -> String {
    format!("Sorry, I could not find enough data to make a prediction for {name}.")
}

fn ohlc_not_found(name: &str) -> String {
    format!("Sorry, I could not find OHLC data for {name}.")
}

/// CoinGecko identifiers are lower-case slugs.
fn coin_id(name: &str) -> String {
    name.trim().to_lowercase()
}

/// First letter upper-cased, the rest lowered ("bitCoin" -> "Bitcoin").
fn capitalized(name: &str) -> String {
    let name = name.trim();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Thousands-separated rendering of a numeric figure. The fractional part,
/// when present, is carried through unchanged.
fn thousands(value: f64) -> String {
    let rendered = value.to_string();
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), Some(frac_part.to_string())),
        None => (rendered, None),
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
