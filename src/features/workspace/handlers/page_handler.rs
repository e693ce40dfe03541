use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::documents::handlers::read_upload;
use crate::features::workspace::services::{
    session_cookie, session_id_from_headers, Notice, SessionHandle, UploadOutcome,
    WorkspaceSessions,
};
use crate::features::workspace::views;

/// Open the document screen and load the file list
pub async fn index(
    State(sessions): State<Arc<WorkspaceSessions>>,
    headers: HeaderMap,
) -> Result<Response> {
    let session = sessions.resolve(session_id_from_headers(&headers)).await;
    session.workspace.mount().await;
    render(&session).await
}

/// Show a file from the session's current list in the main pane
pub async fn select_file(
    State(sessions): State<Arc<WorkspaceSessions>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response> {
    let session = sessions.resolve(session_id_from_headers(&headers)).await;
    session.workspace.select(&id).await;
    render(&session).await
}

/// Upload a file picked or dropped onto the upload zone
///
/// Always answers with the page; failures show up as a notice.
pub async fn upload_file(
    State(sessions): State<Arc<WorkspaceSessions>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response> {
    let session = sessions.resolve(session_id_from_headers(&headers)).await;
    let workspace = &session.workspace;

    match read_upload(&mut multipart).await {
        Ok(file) => match workspace.upload(file).await {
            UploadOutcome::Completed(record) => debug!("Rendering after upload of {}", record.id),
            UploadOutcome::Failed(e) => debug!("Rendering after failed upload: {}", e),
            UploadOutcome::Ignored => {
                debug!("Upload request ignored while another upload is running")
            }
        },
        Err(AppError::BadRequest(_)) => {
            workspace
                .notify(Notice::failure("Please choose a file to upload"))
                .await;
        }
        Err(e) => {
            workspace
                .notify(Notice::failure(format!("Upload failed: {}", e)))
                .await;
        }
    }

    render(&session).await
}

async fn render(session: &SessionHandle) -> Result<Response> {
    let snapshot = session.workspace.take_snapshot().await;
    let html = views::render_page(&snapshot).map_err(|e| AppError::Internal(e.to_string()))?;

    if session.is_new {
        Ok(([(header::SET_COOKIE, session_cookie(&session.id))], Html(html)).into_response())
    } else {
        Ok(Html(html).into_response())
    }
}
