use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::modules::registry::{DocumentKind, DocumentStatus};
use crate::modules::registry::DocumentRow;

/// Media types offered by the upload picker
pub const ACCEPTED_UPLOAD_TYPES: &str = ".pdf,video/mp4";

/// Media type assumed when the client does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extra room for multipart framing on top of the configured upload size
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// One uploaded document as shown to users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentRecord {
    /// Registry-assigned identifier
    pub id: String,
    /// Original file name
    pub name: String,
    pub kind: DocumentKind,
    /// Public URL of the stored blob
    pub location_url: String,
    /// Creation timestamp assigned by the registry
    pub uploaded_at: DateTime<Utc>,
    /// `uploaded_at` formatted for display (M/D/YYYY)
    pub upload_date: String,
    /// Generated summary, absent until the summarization job has run
    pub summary: Option<String>,
    pub status: DocumentStatus,
}

impl DocumentRecord {
    /// Shape a registry row for display.
    ///
    /// Returns `None` for rows without a usable URL; those must never be listed.
    pub fn from_row(row: DocumentRow, offset: FixedOffset) -> Option<Self> {
        let location_url = row.url.filter(|url| !url.trim().is_empty())?;

        Some(Self {
            upload_date: format_upload_date(row.created_at, offset),
            id: row.id,
            name: row.name,
            kind: row.kind,
            location_url,
            uploaded_at: row.created_at,
            summary: row.summary.filter(|summary| !summary.is_empty()),
            status: row.status,
        })
    }
}

/// Format a timestamp the way a browser's default locale date reads (`10/27/2023`)
pub fn format_upload_date(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format("%-m/%-d/%Y")
        .to_string()
}

/// A file received from an upload form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// Upload request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadDocumentDto {
    /// The PDF or video to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Extension used for the randomized storage path.
///
/// Taken from the file name when it has one, otherwise guessed from the media type.
pub fn object_extension(file_name: &str, content_type: &str) -> String {
    if let Some((stem, ext)) = file_name.rsplit_once('.') {
        if !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return ext.to_ascii_lowercase();
        }
    }

    get_extension_from_content_type(content_type)
        .unwrap_or("bin")
        .to_string()
}

/// Get file extension from content type
pub fn get_extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "application/pdf" => Some("pdf"),
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        "video/quicktime" => Some("mov"),
        "video/x-matroska" => Some("mkv"),
        _ => None,
    }
}
