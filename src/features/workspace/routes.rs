use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::documents::dtos::MULTIPART_OVERHEAD;
use crate::features::workspace::handlers::{index, select_file, upload_file};
use crate::features::workspace::services::WorkspaceSessions;

/// Create routes for the document screen
pub fn routes(sessions: Arc<WorkspaceSessions>, max_upload_size: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/files/{id}", get(select_file))
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(max_upload_size + MULTIPART_OVERHEAD)),
        )
        .with_state(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::documents::DocumentService;
    use crate::modules::registry::DocumentKind;
    use crate::shared::test_helpers::{sample_row, InMemoryRegistry};
    use axum::http::header;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::{TestResponse, TestServer};
    use chrono::FixedOffset;
    use std::time::Duration;

    fn server_with_limit(registry: Arc<InMemoryRegistry>, max_upload_size: usize) -> TestServer {
        let documents = Arc::new(DocumentService::new(
            registry,
            FixedOffset::east_opt(0).unwrap(),
        ));
        let sessions = Arc::new(WorkspaceSessions::new(
            documents,
            Duration::from_secs(3600),
        ));
        TestServer::new(routes(sessions, max_upload_size)).unwrap()
    }

    fn server(registry: Arc<InMemoryRegistry>) -> TestServer {
        server_with_limit(registry, 1024 * 1024)
    }

    /// `name=value` pair from the session cookie a response set
    fn session_cookie_of(response: &TestResponse) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("response should start a session")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("docdesk_session="));
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn pdf_form(name: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(b"%PDF-1.7".to_vec())
                .file_name(name.to_string())
                .mime_type("application/pdf"),
        )
    }

    #[tokio::test]
    async fn test_index_with_empty_registry_shows_welcome() {
        let registry = Arc::new(InMemoryRegistry::new());

        let response = server(registry.clone()).get("/").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Welcome to AI DocManager"));
        assert!(html.contains("Upload file or video"));
        assert_eq!(registry.lists(), 1);
    }

    #[tokio::test]
    async fn test_index_lists_newest_first() {
        let registry = Arc::new(InMemoryRegistry::with_rows(vec![
            sample_row("old", "Q1_Financial_Report.pdf", DocumentKind::Pdf, 0),
            sample_row("new", "Product_Demo.mp4", DocumentKind::Video, 30),
        ]));

        let html = server(registry).get("/").await.text();

        let newer = html.find("Product_Demo.mp4").unwrap();
        let older = html.find("Q1_Financial_Report.pdf").unwrap();
        assert!(newer < older);
        // Auto-escaping writes '/' as an entity
        assert!(html.contains("3&#x2f;1&#x2f;2024"));
    }

    #[tokio::test]
    async fn test_session_cookie_is_set_once() {
        let server = server(Arc::new(InMemoryRegistry::new()));

        let first = server.get("/").await;
        let cookie = session_cookie_of(&first);

        let second = server.get("/").add_header(header::COOKIE, cookie).await;
        assert!(second.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_select_file_makes_no_registry_call() {
        let registry = Arc::new(InMemoryRegistry::with_rows(vec![sample_row(
            "q1",
            "Q1_Financial_Report.pdf",
            DocumentKind::Pdf,
            0,
        )]));
        let server = server(registry.clone());

        let cookie = session_cookie_of(&server.get("/").await);
        let response = server
            .get("/files/q1")
            .add_header(header::COOKIE, cookie)
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains(r#"data-file-id="q1" data-selected="true""#));
        assert!(html.contains("Analyzing content..."));
        assert_eq!(registry.lists(), 1);
    }

    #[tokio::test]
    async fn test_selection_belongs_to_one_browser() {
        let registry = Arc::new(InMemoryRegistry::with_rows(vec![sample_row(
            "q1",
            "Q1_Financial_Report.pdf",
            DocumentKind::Pdf,
            0,
        )]));
        let server = server(registry);

        let alice = session_cookie_of(&server.get("/").await);
        server
            .get("/files/q1")
            .add_header(header::COOKIE, alice.clone())
            .await
            .assert_status_ok();

        let bob = server.get("/").await;
        let bob_cookie = session_cookie_of(&bob);
        assert_ne!(bob_cookie, alice);
        let html = bob.text();
        assert!(html.contains("Welcome to AI DocManager"));
        assert!(html.contains(r#"data-file-id="q1" data-selected="false""#));

        let html = server
            .get("/")
            .add_header(header::COOKIE, alice)
            .await
            .text();
        assert!(html.contains(r#"data-file-id="q1" data-selected="true""#));
    }

    #[tokio::test]
    async fn test_upload_notice_is_not_shown_to_other_browsers() {
        let registry = Arc::new(InMemoryRegistry::new());
        let server = server(registry);

        let alice = session_cookie_of(&server.get("/").await);
        let bob = session_cookie_of(&server.get("/").await);

        let html = server
            .post("/upload")
            .add_header(header::COOKIE, alice)
            .multipart(pdf_form("report.pdf"))
            .await
            .text();
        assert!(html.contains("Uploaded report.pdf"));

        let html = server
            .get("/")
            .add_header(header::COOKIE, bob)
            .await
            .text();
        assert!(!html.contains("Uploaded report.pdf"));
        assert!(!html.contains("data-notice"));
        // The shared registry still shows the file to everyone after a refresh
        assert!(html.contains("report.pdf"));
    }

    #[tokio::test]
    async fn test_select_unknown_file_keeps_welcome() {
        let registry = Arc::new(InMemoryRegistry::new());
        let server = server(registry);

        let cookie = session_cookie_of(&server.get("/").await);
        let response = server
            .get("/files/missing")
            .add_header(header::COOKIE, cookie)
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Welcome to AI DocManager"));
    }

    #[tokio::test]
    async fn test_upload_shows_notice_and_new_file() {
        let registry = Arc::new(InMemoryRegistry::new());
        let server = server(registry.clone());
        let cookie = session_cookie_of(&server.get("/").await);

        let response = server
            .post("/upload")
            .add_header(header::COOKIE, cookie.clone())
            .multipart(pdf_form("report.pdf"))
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Uploaded report.pdf"));
        assert!(html.contains(r#"data-file-id="doc-1""#));
        assert!(html.contains(r#"data-uploading="false""#));
        assert_eq!(registry.lists(), 2);
        assert_eq!(registry.inserts(), 1);

        // The notice is shown once
        let html = server
            .get("/")
            .add_header(header::COOKIE, cookie)
            .await
            .text();
        assert!(!html.contains("Uploaded report.pdf"));
    }

    #[tokio::test]
    async fn test_upload_storage_failure_shows_notice() {
        let registry = Arc::new(InMemoryRegistry::new());
        registry.set_fail_upload(true);

        let response = server(registry.clone())
            .post("/upload")
            .multipart(pdf_form("report.pdf"))
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains(r#"data-notice="failure""#));
        assert!(html.contains("Upload failed"));
        assert_eq!(registry.inserts(), 0);
        assert_eq!(registry.lists(), 0);
    }

    #[tokio::test]
    async fn test_oversized_upload_shows_failure_notice() {
        let registry = Arc::new(InMemoryRegistry::new());
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![0u8; 3 * 1024 * 1024])
                .file_name("huge.mp4")
                .mime_type("video/mp4"),
        );

        let response = server_with_limit(registry.clone(), 16)
            .post("/upload")
            .multipart(form)
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains(r#"data-notice="failure""#));
        assert!(html.contains("Upload failed"));
        assert_eq!(registry.uploads(), 0);
    }

    #[tokio::test]
    async fn test_upload_without_file_asks_for_one() {
        let registry = Arc::new(InMemoryRegistry::new());
        let form = MultipartForm::new().add_text("note", "nothing attached");

        let response = server(registry.clone()).post("/upload").multipart(form).await;

        response.assert_status_ok();
        assert!(response.text().contains("Please choose a file to upload"));
        assert_eq!(registry.uploads(), 0);
    }

    #[tokio::test]
    async fn test_file_names_are_escaped() {
        let registry = Arc::new(InMemoryRegistry::with_rows(vec![sample_row(
            "x",
            "<img src=x onerror=alert(1)>.pdf",
            DocumentKind::Pdf,
            0,
        )]));

        let html = server(registry).get("/").await.text();

        assert!(!html.contains("<img src=x"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;.pdf"));
    }
}
