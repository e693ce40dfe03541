use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Media kind of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Video,
}

impl DocumentKind {
    /// Anything whose declared media type mentions `pdf` is a PDF; everything else is video.
    pub fn from_media_type(media_type: &str) -> Self {
        if media_type.contains("pdf") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Video
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Video => "video",
        }
    }
}

/// Processing status, advanced only by the external summarization job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    Ready,
    Error,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Ready => "ready",
            DocumentStatus::Error => "error",
        }
    }
}

/// Row of the `documents` table as returned by the registry
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRow {
    #[serde(deserialize_with = "deserialize_opaque_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    #[serde(default)]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub summary: Option<String>,
    pub status: DocumentStatus,
}

/// Insert payload for the `documents` table
///
/// `id` and `created_at` are assigned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDocumentRow {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub url: String,
    pub summary: String,
    pub status: DocumentStatus,
}

impl NewDocumentRow {
    /// A freshly uploaded document waiting for its summary
    pub fn processing(name: impl Into<String>, kind: DocumentKind, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            url: url.into(),
            summary: String::new(),
            status: DocumentStatus::Processing,
        }
    }
}

/// Registry ids may be text (uuid) or integer (identity column) depending on the schema.
fn deserialize_opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}
