use utoipa::{Modify, OpenApi};

use crate::features::documents::{dtos as documents_dtos, handlers as documents_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Documents
        documents_handlers::list_documents,
        documents_handlers::upload_document,
    ),
    components(
        schemas(
            Meta,
            documents_dtos::DocumentRecord,
            documents_dtos::DocumentKind,
            documents_dtos::DocumentStatus,
            documents_dtos::UploadDocumentDto,
            ApiResponse<documents_dtos::DocumentRecord>,
            ApiResponse<Vec<documents_dtos::DocumentRecord>>,
        )
    ),
    tags(
        (name = "documents", description = "Document upload and listing"),
    ),
    info(
        title = "DocDesk API",
        version = "0.1.0",
        description = "API documentation for DocDesk",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
