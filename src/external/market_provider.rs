use async_trait::async_trait;
use thiserror::Error;

/// One sample from a market chart. Timestamps are epoch milliseconds as
/// delivered by the API; no calendar conversion happens anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp_ms: f64,
    pub price: f64,
}

/// One row of a `/coins/markets` listing.
#[derive(Debug, Clone)]
pub struct CoinMarketEntry {
    pub id: String,
    pub market_cap: Option<f64>,
}

/// One daily OHLC candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OhlcCandle {
    pub timestamp_ms: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// One entry of the gainers/losers ranking.
#[derive(Debug, Clone)]
pub struct MarketMover {
    pub name: String,
    pub usd_24h_change: f64,
}

/// Ranked mover lists. Either side may be absent from the upstream payload.
#[derive(Debug, Clone, Default)]
pub struct TopMovers {
    pub gainers: Option<Vec<MarketMover>>,
    pub losers: Option<Vec<MarketMover>>,
}

#[derive(Debug, Error)]
pub enum MarketProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status: {0}")]
    Http(u16),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("missing configuration: {0}")]
    Config(String),
}

/// Market-data source, one method per upstream endpoint shape.
///
/// Absent keys and empty listings are data outcomes (`None` / empty vec),
/// not errors; the error enum is reserved for transport, status, and
/// decoding failures.
#[async_trait]
pub trait MarketProvider: Send + Sync {
    /// Current spot price in USD, or `None` when the id is unknown upstream.
    async fn simple_price(&self, id: &str) -> Result<Option<f64>, MarketProviderError>;

    /// Market listing filtered to a single coin id.
    async fn coin_markets(&self, id: &str) -> Result<Vec<CoinMarketEntry>, MarketProviderError>;

    /// The top `count` coins ordered by market cap descending.
    async fn top_coins(&self, count: u32) -> Result<Vec<CoinMarketEntry>, MarketProviderError>;

    /// 24h trading volume in USD from the coin detail payload, or `None`
    /// when the payload carries no market data.
    async fn total_volume(&self, id: &str) -> Result<Option<f64>, MarketProviderError>;

    /// Daily (timestamp, price) history over the trailing `days` window, or
    /// `None` when the payload carries no price series.
    async fn market_chart(
        &self,
        id: &str,
        days: u32,
    ) -> Result<Option<Vec<PricePoint>>, MarketProviderError>;

    /// OHLC candles over the trailing `days` window, oldest first.
    async fn ohlc(&self, id: &str, days: u32) -> Result<Vec<OhlcCandle>, MarketProviderError>;

    /// Ranked top gainers and losers over the last 24h.
    async fn top_gainers_losers(&self) -> Result<TopMovers, MarketProviderError>;
}
