//! Registry module for document persistence
//!
//! The registry is an external backend-as-a-service: a `documents` table plus an
//! object storage bucket holding the uploaded blobs. Everything this application
//! persists goes through [`RegistryClient`].

mod models;
mod supabase_client;
mod traits;

pub use models::{DocumentKind, DocumentRow, DocumentStatus, NewDocumentRow};
pub use supabase_client::SupabaseClient;
pub use traits::{RegistryClient, RegistryError};
