use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::documents::dtos::{
    DocumentRecord, UploadDocumentDto, UploadedFile, DEFAULT_CONTENT_TYPE,
};
use crate::features::documents::services::DocumentService;
use crate::shared::types::{ApiResponse, Meta};

/// List documents, newest first
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "documents",
    responses(
        (status = 200, description = "Documents ordered by upload time, newest first", body = ApiResponse<Vec<DocumentRecord>>),
        (status = 502, description = "Registry unavailable")
    )
)]
pub async fn list_documents(
    State(service): State<Arc<DocumentService>>,
) -> Result<Json<ApiResponse<Vec<DocumentRecord>>>> {
    let records = service.list_records().await?;
    let total = records.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(records),
        None,
        Some(Meta { total }),
    )))
}

/// Upload a document
///
/// Accepts multipart/form-data with a single `file` field. The stored document
/// starts in `processing` status with an empty summary.
#[utoipa::path(
    post,
    path = "/api/documents/upload",
    tag = "documents",
    request_body(
        content = UploadDocumentDto,
        content_type = "multipart/form-data",
        description = "PDF or video file",
    ),
    responses(
        (status = 201, description = "Document stored and registered", body = ApiResponse<DocumentRecord>),
        (status = 400, description = "Missing or unreadable file"),
        (status = 413, description = "File too large"),
        (status = 502, description = "Storage write or registry insert failed")
    )
)]
pub async fn upload_document(
    State(service): State<Arc<DocumentService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<DocumentRecord>>)> {
    let upload = read_upload(&mut multipart).await?;
    let record = service.upload_and_register(upload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(record),
            Some("Document uploaded".to_string()),
            None,
        )),
    ))
}

/// Pull the `file` field out of an upload form
///
/// Other fields and any further files are ignored. A missing media type falls back to
/// `application/octet-stream`.
pub async fn read_upload(multipart: &mut Multipart) -> Result<UploadedFile> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "multipart data"))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name != "file" {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        // Only the first file of a multi-file drop is uploaded
        if upload.is_some() {
            debug!("Ignoring additional file in upload form");
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_default();

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "file data"))?;

        upload = Some(UploadedFile {
            data: data.to_vec(),
            file_name,
            content_type,
        });
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    // Browsers send an empty part when the picker was dismissed
    if upload.file_name.is_empty() {
        return Err(AppError::BadRequest("File is required".to_string()));
    }

    Ok(upload)
}

fn multipart_error(e: MultipartError, what: &str) -> AppError {
    debug!("Failed to read {}: {}", what, e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the size limit: {}", e))
    } else {
        AppError::BadRequest(format!("Failed to read {}: {}", what, e))
    }
}
