//! End-to-end routing behavior against a stub market provider: exact reply
//! strings, one outbound call per routed intent, and status handling.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use coinchat_backend::external::market_provider::{
    CoinMarketEntry, MarketMover, MarketProvider, MarketProviderError, OhlcCandle, PricePoint,
    TopMovers,
};
use coinchat_backend::services::chat_service;
use coinchat_backend::services::pattern_responder::PatternResponder;

struct StubProvider {
    calls: AtomicUsize,
    fail_with: Option<u16>,
    movers: TopMovers,
}

impl StubProvider {
    fn healthy() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_with: None,
            movers: TopMovers {
                gainers: Some(vec![
                    MarketMover {
                        name: "Pepe".to_string(),
                        usd_24h_change: 25.5,
                    },
                    MarketMover {
                        name: "Bonk".to_string(),
                        usd_24h_change: 11.25,
                    },
                ]),
                losers: Some(vec![MarketMover {
                    name: "Luna".to_string(),
                    usd_24h_change: -18.75,
                }]),
            },
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::healthy()
        }
    }

    fn without_mover_data() -> Self {
        Self {
            movers: TopMovers::default(),
            ..Self::healthy()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn gate<T>(&self, ok: T) -> Result<T, MarketProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_with {
            Some(status) => Err(MarketProviderError::Http(status)),
            None => Ok(ok),
        }
    }
}

#[async_trait]
impl MarketProvider for StubProvider {
    async fn simple_price(&self, id: &str) -> Result<Option<f64>, MarketProviderError> {
        self.gate(match id {
            "bitcoin" => Some(50000.0),
            _ => None,
        })
    }

    async fn coin_markets(&self, id: &str) -> Result<Vec<CoinMarketEntry>, MarketProviderError> {
        self.gate(match id {
            "ethereum" => vec![CoinMarketEntry {
                id: "ethereum".to_string(),
                market_cap: Some(240_000_000_000.0),
            }],
            "mysterycoin" => vec![CoinMarketEntry {
                id: "mysterycoin".to_string(),
                market_cap: None,
            }],
            _ => Vec::new(),
        })
    }

    async fn top_coins(&self, _count: u32) -> Result<Vec<CoinMarketEntry>, MarketProviderError> {
        self.gate(vec![
            CoinMarketEntry {
                id: "bitcoin".to_string(),
                market_cap: Some(1_000_000_000_000.0),
            },
            CoinMarketEntry {
                id: "ethereum".to_string(),
                market_cap: Some(240_000_000_000.0),
            },
        ])
    }

    async fn total_volume(&self, id: &str) -> Result<Option<f64>, MarketProviderError> {
        self.gate(match id {
            "bitcoin" => Some(31_000_000_000.0),
            _ => None,
        })
    }

    async fn market_chart(
        &self,
        id: &str,
        _days: u32,
    ) -> Result<Option<Vec<PricePoint>>, MarketProviderError> {
        self.gate(match id {
            "bitcoin" => Some(vec![
                PricePoint {
                    timestamp_ms: 0.0,
                    price: 100.0,
                },
                PricePoint {
                    timestamp_ms: 1.0,
                    price: 102.0,
                },
                PricePoint {
                    timestamp_ms: 2.0,
                    price: 104.0,
                },
            ]),
            "newcoin" => Some(vec![PricePoint {
                timestamp_ms: 0.0,
                price: 1.0,
            }]),
            _ => None,
        })
    }

    async fn ohlc(&self, id: &str, _days: u32) -> Result<Vec<OhlcCandle>, MarketProviderError> {
        self.gate(match id {
            "bitcoin" => vec![OhlcCandle {
                timestamp_ms: 0.0,
                open: 64000.0,
                high: 65000.5,
                low: 63500.25,
                close: 64750.75,
            }],
            _ => Vec::new(),
        })
    }

    async fn top_gainers_losers(&self) -> Result<TopMovers, MarketProviderError> {
        self.gate(self.movers.clone())
    }
}

fn responder() -> PatternResponder {
    PatternResponder::with_default_rules().unwrap()
}

async fn route(provider: &StubProvider, input: &str) -> String {
    chat_service::respond(provider, &responder(), input).await
}

#[tokio::test]
async fn price_of_bitcoin_formats_the_exact_reply() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "price of bitcoin").await;
    assert_eq!(reply, "The price of Bitcoin in USD is $50000");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn unknown_coin_price_is_not_found() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "price of dogecoin").await;
    assert_eq!(reply, "Sorry, I could not find the price for dogecoin.");
}

#[tokio::test]
async fn price_failure_maps_to_the_generic_reply() {
    let provider = StubProvider::failing(503);
    let reply = route(&provider, "price of bitcoin").await;
    assert_eq!(reply, "Failed to retrieve data from the API.");
}

#[tokio::test]
async fn market_cap_formats_with_thousands_separators() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "market cap of ethereum").await;
    assert_eq!(
        reply,
        "The market cap of Ethereum in USD is $240,000,000,000"
    );
}

#[tokio::test]
async fn market_cap_on_404_is_the_generic_reply() {
    let provider = StubProvider::failing(404);
    let reply = route(&provider, "market cap of ethereum").await;
    assert_eq!(reply, "Failed to retrieve data from the API.");
}

#[tokio::test]
async fn market_cap_missing_field_is_not_found() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "market cap of mysterycoin").await;
    assert_eq!(
        reply,
        "Sorry, I could not find the market cap for mysterycoin."
    );
}

#[tokio::test]
async fn trading_volume_formats_with_thousands_separators() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "trading volume of bitcoin").await;
    assert_eq!(
        reply,
        "The trading volume of Bitcoin in USD is $31,000,000,000"
    );
}

#[tokio::test]
async fn recommendation_names_the_top_coin() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "recommend a coin").await;
    assert_eq!(
        reply,
        "I recommend considering Bitcoin as it has the highest market cap and trading volume."
    );
}

#[tokio::test]
async fn prediction_extrapolates_the_linear_trend() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "predict price of bitcoin").await;
    assert_eq!(
        reply,
        "The predicted price of Bitcoin for the next day is $106.00"
    );
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn prediction_needs_at_least_two_points() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "predict price of newcoin").await;
    assert_eq!(
        reply,
        "Sorry, I could not find enough data to make a prediction for newcoin."
    );
}

#[tokio::test]
async fn ohlc_renders_the_most_recent_candle() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "ohlc of bitcoin").await;
    assert_eq!(
        reply,
        "OHLC for Bitcoin (USD):\nOpen: $64000.00, High: $65000.50, Low: $63500.25, Close: $64750.75"
    );
}

#[tokio::test]
async fn ohlc_for_unknown_coin_is_not_found() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "ohlc of dogecoin").await;
    assert_eq!(reply, "Sorry, I could not find OHLC data for dogecoin.");
}

#[tokio::test]
async fn movers_render_ranked_sections_with_signs() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "show me the top gainers and losers").await;
    assert_eq!(
        reply,
        "### Top Gainers:\n1. Pepe (+25.50%)\n2. Bonk (+11.25%)\n\n\
         ### Top Losers:\n1. Luna (-18.75%)"
    );
}

#[tokio::test]
async fn movers_without_data_render_placeholders() {
    let provider = StubProvider::without_mover_data();
    let reply = route(&provider, "top gainers and losers").await;
    assert_eq!(
        reply,
        "### Top Gainers:\nNo data available for top gainers.\n\n\
         ### Top Losers:\nNo data available for top losers."
    );
}

#[tokio::test]
async fn movers_disambiguate_http_statuses() {
    let cases = [
        (
            401,
            "Failed to retrieve data: Unauthorized. Please check your API key.",
        ),
        (404, "Failed to retrieve data: Endpoint not found."),
        (
            500,
            "Failed to retrieve data: Internal server error at CoinGecko.",
        ),
        (418, "Failed to retrieve data: HTTP 418."),
    ];

    for (status, expected) in cases {
        let provider = StubProvider::failing(status);
        let reply = route(&provider, "top gainers and losers").await;
        assert_eq!(reply, expected);
    }
}

#[tokio::test]
async fn unmatched_text_goes_to_canned_chat_without_network_calls() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "hello").await;
    assert!(["Hello!", "Hi there!", "Hey!"].contains(&reply.as_str()));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn every_intent_routes_exactly_one_outbound_call() {
    let utterances = [
        "price of bitcoin",
        "market cap of ethereum",
        "trading volume of bitcoin",
        "recommend a coin",
        "predict price of bitcoin",
        "top gainers and losers",
        "ohlc of bitcoin",
    ];

    for utterance in utterances {
        let provider = StubProvider::healthy();
        route(&provider, utterance).await;
        assert_eq!(provider.calls(), 1, "one call expected for {utterance:?}");
    }
}

#[tokio::test]
async fn identical_upstream_data_yields_identical_replies() {
    let provider = StubProvider::healthy();
    let first = route(&provider, "price of bitcoin").await;
    let second = route(&provider, "price of bitcoin").await;
    assert_eq!(first, second);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn empty_entity_short_circuits_to_not_found() {
    let provider = StubProvider::healthy();
    let reply = route(&provider, "price of").await;
    assert_eq!(reply, "Sorry, I could not find the price for .");
    assert_eq!(provider.calls(), 0);
}
