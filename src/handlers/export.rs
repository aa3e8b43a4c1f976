// src/handlers/export.rs
use crate::export::{render_pdf, TextDocument, README_FILE_NAME, RESPONSE_FILE_NAME};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct ExportRequest {
    pub text: String,
}

pub fn export_routes() -> Router {
    Router::new()
        .route("/api/export/pdf", post(export_reply_pdf))
        .route("/api/export/readme", get(export_readme_pdf))
}

/// Download the given reply text as a PDF
async fn export_reply_pdf(Json(request): Json<ExportRequest>) -> Response {
    pdf_download(TextDocument::response(&request.text), RESPONSE_FILE_NAME).await
}

/// Download the feature README as a PDF
async fn export_readme_pdf() -> Response {
    pdf_download(TextDocument::readme(), README_FILE_NAME).await
}

async fn pdf_download(document: TextDocument, filename: &'static str) -> Response {
    let rendered = tokio::task::spawn_blocking(move || render_pdf(&document)).await;

    let bytes = match rendered {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            tracing::error!("Failed to render {}: {}", filename, e);
            return pdf_error(e.to_string());
        }
        Err(e) => {
            tracing::error!("PDF render task failed: {}", e);
            return pdf_error(e.to_string());
        }
    };

    tracing::debug!("📄 Rendered {} ({} bytes)", filename, bytes.len());
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn pdf_error(error: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Failed to export PDF", "error": error })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_reply_pdf_download() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/export/pdf")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text":"Mitochondria are the powerhouse of the cell."}"#))
            .unwrap();

        let response = export_routes().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"ai-response.pdf\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_readme_download() {
        let request = Request::builder()
            .uri("/api/export/readme")
            .body(Body::empty())
            .unwrap();

        let response = export_routes().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"AI-LearnMate-README.pdf\""
        );
    }
}
