mod chat;
mod intent;

pub use chat::{ChatRequest, ChatResponse};
pub use intent::Intent;
