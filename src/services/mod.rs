pub mod chat_service;
pub mod forecasting_service;
pub mod market_service;
pub mod pattern_responder;
