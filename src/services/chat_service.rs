use tracing::info;

use crate::external::market_provider::MarketProvider;
use crate::models::Intent;
use crate::services::market_service;
use crate::services::pattern_responder::PatternResponder;

/// Routes one user message: a recognized intent dispatches to exactly one
/// market operation; anything else goes to the canned responder with the
/// original, un-lowered text.
///
/// Always produces a reply string; market failures surface as
/// human-readable text, never as errors.
pub async fn respond(
    provider: &dyn MarketProvider,
    responder: &PatternResponder,
    user_input: &str,
) -> String {
    match Intent::parse(user_input) {
        Some(intent) => {
            info!("routing to market intent: {:?}", intent);
            dispatch(provider, intent).await
        }
        None => responder.respond(user_input),
    }
}

async fn dispatch(provider: &dyn MarketProvider, intent: Intent) -> String {
    match intent {
        Intent::Price { coin } => market_service::price_reply(provider, &coin).await,
        Intent::MarketCap { coin } => market_service::market_cap_reply(provider, &coin).await,
        Intent::TradingVolume { coin } => {
            market_service::trading_volume_reply(provider, &coin).await
        }
        Intent::Recommend => market_service::recommend_reply(provider).await,
        Intent::PredictPrice { coin } => market_service::predict_reply(provider, &coin).await,
        Intent::TopGainersLosers => market_service::top_movers_reply(provider).await,
        Intent::Ohlc { coin } => market_service::ohlc_reply(provider, &coin).await,
    }
}
