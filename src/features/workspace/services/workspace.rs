//! View state for the two-pane document screen.
//!
//! Three slots drive rendering: the file list, the selected file, and the
//! uploading flag. A pending notice carries the result of the last upload to the
//! next render.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::features::documents::dtos::{DocumentRecord, UploadedFile};
use crate::features::documents::services::DocumentService;
use crate::modules::registry::RegistryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// One-shot message shown on the next render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
struct ViewState {
    files: Vec<DocumentRecord>,
    /// Snapshot taken at selection time; not reconciled against later refreshes
    selected: Option<DocumentRecord>,
    notice: Option<Notice>,
}

/// Everything a render needs
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub files: Vec<DocumentRecord>,
    pub selected: Option<DocumentRecord>,
    pub uploading: bool,
    pub notice: Option<Notice>,
}

#[derive(Debug)]
pub enum UploadOutcome {
    Completed(DocumentRecord),
    Failed(RegistryError),
    /// Another upload was already in flight
    Ignored,
}

/// Claimed uploading flag; released on drop, whatever path the upload took
struct UploadSlot<'a>(&'a AtomicBool);

impl<'a> UploadSlot<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for UploadSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Workspace {
    documents: Arc<DocumentService>,
    state: RwLock<ViewState>,
    uploading: AtomicBool,
}

impl Workspace {
    pub fn new(documents: Arc<DocumentService>) -> Self {
        Self {
            documents,
            state: RwLock::new(ViewState::default()),
            uploading: AtomicBool::new(false),
        }
    }

    /// Screen opened: load the file list
    pub async fn mount(&self) {
        self.refresh().await;
    }

    /// Replace the file list wholesale. On failure the previous list stays.
    async fn refresh(&self) {
        match self.documents.list_records().await {
            Ok(records) => self.state.write().await.files = records,
            Err(e) => warn!("Keeping previous file list: {}", e),
        }
    }

    /// Select a row from the current file list. No registry call is made.
    ///
    /// Unknown ids leave the selection as it was.
    pub async fn select(&self, id: &str) -> Option<DocumentRecord> {
        let mut state = self.state.write().await;
        let record = state.files.iter().find(|file| file.id == id).cloned();

        match record {
            Some(record) => {
                state.selected = Some(record.clone());
                Some(record)
            }
            None => {
                debug!("Ignoring selection of unknown document {}", id);
                None
            }
        }
    }

    /// Upload a file, unless one is already uploading
    ///
    /// The uploading flag stays set through the follow-up refresh and is cleared
    /// on every exit path.
    pub async fn upload(&self, file: UploadedFile) -> UploadOutcome {
        let Some(_slot) = UploadSlot::claim(&self.uploading) else {
            debug!("Upload of '{}' ignored, another upload is in progress", file.file_name);
            return UploadOutcome::Ignored;
        };

        let name = file.file_name.clone();

        match self.documents.upload_and_register(file).await {
            Ok(record) => {
                self.refresh().await;
                info!("Upload of '{}' completed as {}", name, record.id);
                self.notify(Notice::success(format!("Uploaded {}", name)))
                    .await;
                UploadOutcome::Completed(record)
            }
            Err(e) => {
                let message = match &e {
                    RegistryError::Insert(_) => {
                        format!("Upload stored but could not be registered: {}", e)
                    }
                    _ => format!("Upload failed: {}", e),
                };
                self.notify(Notice::failure(message)).await;
                UploadOutcome::Failed(e)
            }
        }
    }

    pub async fn notify(&self, notice: Notice) {
        self.state.write().await.notice = Some(notice);
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    /// Current state, leaving any pending notice in place
    #[cfg(test)]
    pub async fn snapshot(&self) -> ViewSnapshot {
        let state = self.state.read().await;
        ViewSnapshot {
            files: state.files.clone(),
            selected: state.selected.clone(),
            uploading: self.is_uploading(),
            notice: state.notice.clone(),
        }
    }

    /// Current state for rendering; the pending notice is consumed
    pub async fn take_snapshot(&self) -> ViewSnapshot {
        let mut state = self.state.write().await;
        ViewSnapshot {
            files: state.files.clone(),
            selected: state.selected.clone(),
            uploading: self.is_uploading(),
            notice: state.notice.take(),
        }
    }
}
