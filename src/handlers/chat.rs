// src/handlers/chat.rs
use crate::groq_client::extract_reply;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::Extension,
    http::{Method, StatusCode},
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn chat_routes() -> Router {
    Router::new().route("/api/chat", post(relay_chat).fallback(method_not_allowed))
}

async fn method_not_allowed(method: Method) -> (StatusCode, Json<Value>) {
    tracing::warn!("Rejected {} /api/chat", method);
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "message": "Method not allowed" })),
    )
}

/// `message` from a JSON object body, untouched. Anything else yields `None`.
fn extract_message(body: &[u8]) -> Option<Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut fields)) => fields.remove("message"),
        _ => None,
    }
}

fn server_error(error: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Server Error", "error": error.to_string() })),
    )
}

/// Forwards one message to the completion API and relays the reply.
async fn relay_chat(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let message = extract_message(&body);
    let shown = message.as_ref().map(|m| m.to_string()).unwrap_or_default();
    tracing::info!("💬 User message: {}", shown);

    let Some(completion) = state.completion.as_ref() else {
        tracing::error!("Error in /api/chat: completion API is not configured");
        return server_error("GROQ_API_KEY is not configured");
    };

    let data = match completion.complete(message).await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("Error in /api/chat: {}", e);
            return server_error(e);
        }
    };
    tracing::debug!("Groq response: {}", data);

    match extract_reply(&data) {
        Some(reply) => (StatusCode::OK, Json(json!({ "reply": reply }))),
        None => {
            tracing::warn!(model = %completion.model(), "Invalid response from Groq: {}", data);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Invalid response from Groq", "data": data })),
            )
        }
    }
}
