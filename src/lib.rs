// lib.rs - LearnMate: a topic-to-lesson relay and the learning session that drives it
pub mod config;
pub mod export;
pub mod groq_client;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod progress;
pub mod session;
pub mod speech;

use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared, read-only server state. The relay keeps nothing between calls.
pub struct AppState {
    pub completion: Option<Arc<dyn groq_client::CompletionApi>>,
}

/// Every route the server exposes, with logging and shared state attached.
///
/// CORS covers the status and export routes only. `/api/chat` answers every
/// method but POST with 405, preflight included.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cross_origin = Router::new()
        .merge(handlers::export::export_routes())
        .route("/api/status", axum::routing::get(api_status))
        .layer(CorsLayer::permissive());

    Router::new()
        .merge(handlers::ui::ui_routes())
        .merge(handlers::chat::chat_routes())
        .merge(cross_origin)
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(Extension(state))
}

// API Status endpoint
async fn api_status(Extension(state): Extension<Arc<AppState>>) -> axum::response::Json<serde_json::Value> {
    use serde_json::json;

    let groq_status = if state.completion.is_some() { "configured" } else { "not_configured" };
    let model = state.completion.as_ref().map(|c| c.model().to_string());

    axum::response::Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "groq": groq_status
        },
        "model": model,
        "endpoints": {
            "chat": "/api/chat",
            "export": "/api/export/pdf",
            "readme": "/api/export/readme",
            "status": "/api/status"
        }
    }))
}
