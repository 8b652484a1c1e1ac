use serde::{Deserialize, Serialize};

/// Inbound chat form body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_input: String,
}

/// Reply envelope returned by the chat endpoint.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}
