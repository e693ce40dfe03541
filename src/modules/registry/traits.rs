//! Registry abstraction trait
//!
//! The hosted backend and the in-memory test double both implement [`RegistryClient`].

use async_trait::async_trait;
use thiserror::Error;

use super::models::{DocumentRow, NewDocumentRow};

/// Registry operation errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Listing rows failed; callers keep whatever they displayed before.
    #[error("Failed to list documents: {0}")]
    List(String),

    /// The blob write failed; nothing was registered.
    #[error("Failed to store object '{path}': {message}")]
    Upload { path: String, message: String },

    /// The blob was stored but the row insert failed, leaving an orphaned object.
    #[error("Failed to register document: {0}")]
    Insert(String),
}

#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// All document rows, newest first
    async fn select_documents(&self) -> Result<Vec<DocumentRow>, RegistryError>;

    /// Store a blob under `path` in the documents bucket
    async fn upload_object(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), RegistryError>;

    /// Publicly resolvable URL for a stored object
    fn public_url(&self, path: &str) -> String;

    /// Insert a row and return it as stored (with registry-assigned id and timestamp)
    async fn insert_document(&self, row: &NewDocumentRow) -> Result<DocumentRow, RegistryError>;
}
