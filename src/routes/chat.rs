use axum::extract::State;
use axum::routing::post;
use axum::{Form, Json, Router};
use tracing::info;

use crate::models::{ChatRequest, ChatResponse};
use crate::services::chat_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/get_response", post(get_response))
}

/// POST /get_response
///
/// Takes the form field `user_input` and replies with
/// `{"response": <string>}`. Infallible by contract: market failures come
/// back as reply text, not as error statuses.
async fn get_response(
    State(state): State<AppState>,
    Form(request): Form<ChatRequest>,
) -> Json<ChatResponse> {
    info!("POST /get_response - {}", request.user_input);

    let response = chat_service::respond(
        state.market.as_ref(),
        state.responder.as_ref(),
        &request.user_input,
    )
    .await;

    Json(ChatResponse { response })
}
