use chrono::FixedOffset;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::features::documents::dtos::{object_extension, DocumentRecord, UploadedFile};
use crate::modules::registry::{DocumentKind, NewDocumentRow, RegistryClient, RegistryError};

/// Service for document registry operations
pub struct DocumentService {
    registry: Arc<dyn RegistryClient>,
    display_offset: FixedOffset,
}

impl DocumentService {
    pub fn new(registry: Arc<dyn RegistryClient>, display_offset: FixedOffset) -> Self {
        Self {
            registry,
            display_offset,
        }
    }

    /// List all documents, newest first
    ///
    /// Rows without a URL are skipped.
    pub async fn list_records(&self) -> Result<Vec<DocumentRecord>, RegistryError> {
        let rows = self.registry.select_documents().await?;
        let total = rows.len();

        let mut records: Vec<DocumentRecord> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                let record = DocumentRecord::from_row(row, self.display_offset);
                if record.is_none() {
                    warn!("Skipping document {} without a storage URL", id);
                }
                record
            })
            .collect();

        records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

        debug!("Listed {} documents ({} rows)", records.len(), total);
        Ok(records)
    }

    /// Store the blob, resolve its public URL, and register a `processing` row
    ///
    /// A failed insert leaves the stored object in place; nothing cleans it up.
    pub async fn upload_and_register(
        &self,
        upload: UploadedFile,
    ) -> Result<DocumentRecord, RegistryError> {
        let UploadedFile {
            data,
            file_name,
            content_type,
        } = upload;

        let kind = DocumentKind::from_media_type(&content_type);
        let path = format!(
            "{}.{}",
            Uuid::new_v4(),
            object_extension(&file_name, &content_type)
        );
        let size = data.len();

        self.registry
            .upload_object(&path, data, &content_type)
            .await
            .inspect_err(|e| error!("Upload of '{}' failed: {}", file_name, e))?;

        debug!("Stored '{}' as '{}' ({} bytes)", file_name, path, size);

        let url = self.registry.public_url(&path);
        let new_row = NewDocumentRow::processing(file_name, kind, url);

        let row = self
            .registry
            .insert_document(&new_row)
            .await
            .inspect_err(|e| {
                error!(
                    "Object '{}' stored but not registered, left orphaned: {}",
                    path, e
                )
            })?;

        info!(
            "Document registered: id={}, name={}, kind={}, status={}, path={}",
            row.id,
            row.name,
            kind.as_str(),
            row.status.as_str(),
            path
        );

        DocumentRecord::from_row(row, self.display_offset)
            .ok_or_else(|| RegistryError::Insert("registered row has no URL".to_string()))
    }
}
