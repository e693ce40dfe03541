//! Supabase-compatible registry client
//!
//! Talks to the PostgREST endpoint (`/rest/v1`) for document rows and to the
//! storage endpoint (`/storage/v1`) for blobs. Every request carries the project
//! API key both as `apikey` and as a bearer token.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, error, info, warn};

use super::models::{DocumentRow, NewDocumentRow};
use super::traits::{RegistryClient, RegistryError};
use crate::core::config::RegistryConfig;
use crate::core::error::AppError;

pub struct SupabaseClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    bucket: String,
    table: String,
}

impl SupabaseClient {
    pub fn new(config: RegistryConfig) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let client = Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            bucket: config.bucket,
            table: config.table,
        };

        info!(
            "Registry client initialized for {}, table: {}, bucket: {}",
            client.base_url, client.table, client.bucket
        );

        Ok(client)
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> &str {
        &self.bucket
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            encode_object_path(path)
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Fold a non-success response into a readable message
    async fn failure_message(response: Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        format!("HTTP {} - {}", status, body)
    }
}

#[async_trait]
impl RegistryClient for SupabaseClient {
    async fn select_documents(&self) -> Result<Vec<DocumentRow>, RegistryError> {
        let url = format!("{}?select=*&order=created_at.desc", self.table_url());

        debug!("Listing documents: {}", url);

        let response = self
            .authorized(self.http_client.get(&url))
            .send()
            .await
            .map_err(|e| RegistryError::List(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RegistryError::List(Self::failure_message(response).await));
        }

        let raw_rows = response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|e| RegistryError::List(format!("failed to parse rows: {}", e)))?;

        // One malformed row must not hide the rest of the table
        let rows = raw_rows
            .into_iter()
            .filter_map(|raw| {
                let id = raw.get("id").map(|id| id.to_string());
                serde_json::from_value::<DocumentRow>(raw)
                    .inspect_err(|e| {
                        warn!(
                            "Skipping malformed document row {}: {}",
                            id.as_deref().unwrap_or("<no id>"),
                            e
                        )
                    })
                    .ok()
            })
            .collect();

        Ok(rows)
    }

    async fn upload_object(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), RegistryError> {
        let size = data.len();
        let upload_error = |message: String| RegistryError::Upload {
            path: path.to_string(),
            message,
        };

        let response = self
            .authorized(self.http_client.post(self.object_url(path)))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| upload_error(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let message = Self::failure_message(response).await;
            error!("Storage rejected '{}': {}", path, message);
            return Err(upload_error(message));
        }

        debug!(
            "Uploaded object '{}' ({} bytes) to bucket '{}'",
            path, size, self.bucket
        );
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            encode_object_path(path)
        )
    }

    async fn insert_document(&self, row: &NewDocumentRow) -> Result<DocumentRow, RegistryError> {
        let response = self
            .authorized(self.http_client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| RegistryError::Insert(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RegistryError::Insert(
                Self::failure_message(response).await,
            ));
        }

        let rows = response
            .json::<Vec<DocumentRow>>()
            .await
            .map_err(|e| RegistryError::Insert(format!("failed to parse inserted row: {}", e)))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| RegistryError::Insert("registry returned no row".to_string()))
    }
}

/// Percent-encode each path segment, keeping the `/` separators
fn encode_object_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
