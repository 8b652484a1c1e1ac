use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::external::market_provider::{
    CoinMarketEntry, MarketMover, MarketProvider, MarketProviderError, OhlcCandle, PricePoint,
    TopMovers,
};

const API_BASE: &str = "https://api.coingecko.com/api/v3";
// The gainers/losers ranking is only served from the pro host.
const PRO_API_BASE: &str = "https://pro-api.coingecko.com/api/v3";

const API_KEY_HEADER: &str = "x-cg-pro-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct CoinGeckoProvider {
    client: reqwest::Client,
    api_key: String,
}

impl CoinGeckoProvider {
    pub fn from_env() -> Result<Self, MarketProviderError> {
        let api_key = std::env::var("COINGECKO_API_KEY")
            .map_err(|_| MarketProviderError::Config("COINGECKO_API_KEY not set".into()))?;
        Self::new(api_key)
    }

    pub fn new(api_key: String) -> Result<Self, MarketProviderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MarketProviderError::Network(e.to_string()))?;

        Ok(Self { client, api_key })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MarketProviderError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .header("accept", "application/json")
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await
            .map_err(|e| MarketProviderError::Network(e.to_string()))?;

        // Status is checked before the body is touched so callers can
        // tell a 401/404/500 apart from a malformed 200.
        let status = resp.status();
        if !status.is_success() {
            return Err(MarketProviderError::Http(status.as_u16()));
        }

        resp.json::<T>()
            .await
            .map_err(|e| MarketProviderError::Parse(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct SimplePriceEntry {
    usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MarketsEntry {
    id: String,
    market_cap: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CoinDetailResponse {
    market_data: Option<CoinMarketData>,
}

#[derive(Debug, Deserialize)]
struct CoinMarketData {
    total_volume: Option<CurrencyFigure>,
}

#[derive(Debug, Deserialize)]
struct CurrencyFigure {
    usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Option<Vec<[f64; 2]>>,
}

#[derive(Debug, Deserialize)]
struct TopMoversResponse {
    top_gainers: Option<Vec<MoverEntry>>,
    top_losers: Option<Vec<MoverEntry>>,
}

#[derive(Debug, Deserialize)]
struct MoverEntry {
    name: String,
    usd_24h_change: f64,
}

impl From<MoverEntry> for MarketMover {
    fn from(entry: MoverEntry) -> Self {
        MarketMover {
            name: entry.name,
            usd_24h_change: entry.usd_24h_change,
        }
    }
}

#[async_trait]
impl MarketProvider for CoinGeckoProvider {
    async fn simple_price(&self, id: &str) -> Result<Option<f64>, MarketProviderError> {
        let url = format!("{API_BASE}/simple/price");
        let body: HashMap<String, SimplePriceEntry> = self
            .get_json(&url, &[("ids", id), ("vs_currencies", "usd")])
            .await?;

        Ok(body.get(id).and_then(|entry| entry.usd))
    }

    async fn coin_markets(&self, id: &str) -> Result<Vec<CoinMarketEntry>, MarketProviderError> {
        let url = format!("{API_BASE}/coins/markets");
        let body: Vec<MarketsEntry> = self
            .get_json(&url, &[("vs_currency", "usd"), ("ids", id)])
            .await?;

        Ok(body
            .into_iter()
            .map(|entry| CoinMarketEntry {
                id: entry.id,
                market_cap: entry.market_cap,
            })
            .collect())
    }

    async fn top_coins(&self, count: u32) -> Result<Vec<CoinMarketEntry>, MarketProviderError> {
        let url = format!("{API_BASE}/coins/markets");
        let per_page = count.to_string();
        let body: Vec<MarketsEntry> = self
            .get_json(
                &url,
                &[
                    ("vs_currency", "usd"),
                    ("order", "market_cap_desc"),
                    ("per_page", per_page.as_str()),
                    ("page", "1"),
                ],
            )
            .await?;

        Ok(body
            .into_iter()
            .map(|entry| CoinMarketEntry {
                id: entry.id,
                market_cap: entry.market_cap,
            })
            .collect())
    }

    async fn total_volume(&self, id: &str) -> Result<Option<f64>, MarketProviderError> {
        let url = format!("{API_BASE}/coins/{id}");
        let body: CoinDetailResponse = self.get_json(&url, &[]).await?;

        Ok(body
            .market_data
            .and_then(|market| market.total_volume)
            .and_then(|volume| volume.usd))
    }

    async fn market_chart(
        &self,
        id: &str,
        days: u32,
    ) -> Result<Option<Vec<PricePoint>>, MarketProviderError> {
        let url = format!("{API_BASE}/coins/{id}/market_chart");
        let days = days.to_string();
        let body: MarketChartResponse = self
            .get_json(
                &url,
                &[
                    ("vs_currency", "usd"),
                    ("days", days.as_str()),
                    ("interval", "daily"),
                ],
            )
            .await?;

        Ok(body.prices.map(|rows| {
            rows.into_iter()
                .map(|[timestamp_ms, price]| PricePoint {
                    timestamp_ms,
                    price,
                })
                .collect()
        }))
    }

    async fn ohlc(&self, id: &str, days: u32) -> Result<Vec<OhlcCandle>, MarketProviderError> {
        let url = format!("{API_BASE}/coins/{id}/ohlc");
        let days = days.to_string();
        let body: Vec<[f64; 5]> = self
            .get_json(&url, &[("vs_currency", "usd"), ("days", days.as_str())])
            .await?;

        Ok(body
            .into_iter()
            .map(|[timestamp_ms, open, high, low, close]| OhlcCandle {
                timestamp_ms,
                open,
                high,
                low,
                close,
            })
            .collect())
    }

    async fn top_gainers_losers(&self) -> Result<TopMovers, MarketProviderError> {
        let url = format!("{PRO_API_BASE}/coins/top_gainers_losers");
        let body: TopMoversResponse = self.get_json(&url, &[("vs_currency", "usd")]).await?;

        Ok(TopMovers {
            gainers: body
                .top_gainers
                .map(|list| list.into_iter().map(MarketMover::from).collect()),
            losers: body
                .top_losers
                .map(|list| list.into_iter().map(MarketMover::from).collect()),
        })
    }
}
