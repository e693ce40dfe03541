//! Document registry feature.
//!
//! Lists uploaded documents and uploads new ones (store blob, resolve public URL,
//! insert a `processing` row). Summaries are filled in later by an external job.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/documents` | List documents, newest first |
//! | POST | `/api/documents/upload` | Upload a PDF or video and register it |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::DocumentService;
