mod sessions;
mod workspace;

pub use sessions::{session_cookie, session_id_from_headers, SessionHandle, WorkspaceSessions};
pub use workspace::{Notice, UploadOutcome, ViewSnapshot};
