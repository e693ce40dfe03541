use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::documents::dtos::MULTIPART_OVERHEAD;
use crate::features::documents::handlers::{list_documents, upload_document};
use crate::features::documents::services::DocumentService;

/// Create routes for the documents JSON API
pub fn routes(document_service: Arc<DocumentService>, max_upload_size: usize) -> Router {
    Router::new()
        .route("/api/documents", get(list_documents))
        .route(
            "/api/documents/upload",
            post(upload_document).layer(DefaultBodyLimit::max(max_upload_size + MULTIPART_OVERHEAD)),
        )
        .with_state(document_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{sample_row, InMemoryRegistry};
    use crate::modules::registry::DocumentKind;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use chrono::FixedOffset;
    use serde_json::Value;

    fn server_with_limit(registry: Arc<InMemoryRegistry>, max_upload_size: usize) -> TestServer {
        let service = Arc::new(DocumentService::new(
            registry,
            FixedOffset::east_opt(0).unwrap(),
        ));
        TestServer::new(routes(service, max_upload_size)).unwrap()
    }

    fn server(registry: Arc<InMemoryRegistry>) -> TestServer {
        server_with_limit(registry, 1024 * 1024)
    }

    #[tokio::test]
    async fn test_list_documents_returns_envelope() {
        let registry = Arc::new(InMemoryRegistry::with_rows(vec![
            sample_row("a", "first.pdf", DocumentKind::Pdf, 0),
            sample_row("b", "second.mp4", DocumentKind::Video, 10),
        ]));

        let response = server(registry).get("/api/documents").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"][0]["id"], "b");
        assert_eq!(body["data"][0]["kind"], "video");
        assert_eq!(body["data"][1]["upload_date"], "3/1/2024");
    }

    #[tokio::test]
    async fn test_list_documents_registry_failure_is_bad_gateway() {
        let registry = Arc::new(InMemoryRegistry::new());
        registry.set_fail_list(true);

        let response = server(registry).get("/api/documents").await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_upload_document_creates_processing_record() {
        let registry = Arc::new(InMemoryRegistry::new());
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"%PDF-1.7".to_vec())
                .file_name("report.pdf")
                .mime_type("application/pdf"),
        );

        let response = server(registry.clone())
            .post("/api/documents/upload")
            .multipart(form)
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["name"], "report.pdf");
        assert_eq!(body["data"]["kind"], "pdf");
        assert_eq!(body["data"]["status"], "processing");
        assert_eq!(registry.inserts(), 1);
    }

    #[tokio::test]
    async fn test_upload_document_too_large_is_payload_too_large() {
        let registry = Arc::new(InMemoryRegistry::new());
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![0u8; 3 * 1024 * 1024])
                .file_name("huge.mp4")
                .mime_type("video/mp4"),
        );

        let response = server_with_limit(registry.clone(), 16)
            .post("/api/documents/upload")
            .multipart(form)
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(registry.uploads(), 0);
    }

    #[tokio::test]
    async fn test_upload_document_without_file_is_bad_request() {
        let registry = Arc::new(InMemoryRegistry::new());
        let form = MultipartForm::new().add_text("note", "no file here");

        let response = server(registry.clone())
            .post("/api/documents/upload")
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(registry.uploads(), 0);
    }

    #[tokio::test]
    async fn test_upload_document_insert_failure_is_bad_gateway() {
        let registry = Arc::new(InMemoryRegistry::new());
        registry.set_fail_insert(true);
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![0u8; 32])
                .file_name("clip.mp4")
                .mime_type("video/mp4"),
        );

        let response = server(registry.clone())
            .post("/api/documents/upload")
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(registry.stored_objects().len(), 1);
    }
}
