pub mod document_handler;

pub use document_handler::{
    __path_list_documents, __path_upload_document, list_documents, read_upload, upload_document,
};
