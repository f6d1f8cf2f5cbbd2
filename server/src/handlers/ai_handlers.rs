use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use content_service_cli::ai::{validate_messages, ChatOptions};

use crate::state::AppState;

/// `messages` stays a raw `Value` so a missing, non-list, or empty field is
/// ours to report as a 400 instead of a serde rejection.
#[derive(Deserialize, Default)]
pub struct ChatPayload {
    pub messages: Option<Value>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub num_predict: Option<i64>,
}

/// POST /api/ai/chat: forward a conversation to the local model endpoint
/// and hand back `{message: {content}}`. Payload problems are a 400 before
/// anything goes upstream; upstream trouble is a 502.
pub async fn chat(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ChatPayload>,
) -> (StatusCode, Json<Value>) {
    let messages = match validate_messages(payload.messages.as_ref()) {
        Ok(m) => m,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid payload", "detail": e.to_string() })),
            );
        }
    };

    let opts = ChatOptions {
        model: payload.model,
        temperature: payload.temperature,
        top_p: payload.top_p,
        num_predict: payload.num_predict,
    };

    match state.chat.chat(&messages, &opts).await {
        Ok(content) => (
            StatusCode::OK,
            Json(json!({ "message": { "content": content } })),
        ),
        Err(e) => {
            error!(error = %e, "chat proxy failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "upstream error", "detail": e.to_string() })),
            )
        }
    }
}
