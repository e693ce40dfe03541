//! Two-pane document screen.
//!
//! Server-rendered page: a sidebar with the upload zone and file list, and a
//! main pane with the selected file's preview and AI summary. View state lives
//! per browser session (see [`WorkspaceSessions`]).
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/` | Load the file list and render the screen |
//! | GET | `/files/{id}` | Select a listed file |
//! | POST | `/upload` | Upload a file, then refresh the list |

pub mod handlers;
pub mod routes;
pub mod services;
pub mod views;

pub use routes::routes;
pub use services::WorkspaceSessions;
