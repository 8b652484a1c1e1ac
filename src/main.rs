use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use coinchat_backend::external::coingecko::CoinGeckoProvider;
use coinchat_backend::logging::{self, LoggingConfig};
use coinchat_backend::services::pattern_responder::PatternResponder;
use coinchat_backend::state::AppState;
use coinchat_backend::app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    logging::init_logging(&LoggingConfig::from_env())?;

    // Fail fast on a missing API key rather than degrading every call.
    let provider = CoinGeckoProvider::from_env()
        .expect("Failed to create CoinGeckoProvider (check COINGECKO_API_KEY)");
    let responder = PatternResponder::with_default_rules()
        .expect("Built-in chat rules failed to compile");

    let state = AppState {
        market: Arc::new(provider),
        responder: Arc::new(responder),
    };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Coinchat backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
