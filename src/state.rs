use std::sync::Arc;

use crate::external::market_provider::MarketProvider;
use crate::services::pattern_responder::PatternResponder;

/// Shared, read-only application state. Both members are immutable after
/// startup, so concurrent requests need no coordination.
#[derive(Clone)]
pub struct AppState {
    pub market: Arc<dyn MarketProvider>,
    pub responder: Arc<PatternResponder>,
}
