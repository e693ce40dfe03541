//! Per-browser view sessions.
//!
//! Each browser gets its own [`Workspace`], keyed by an opaque id carried in the
//! `docdesk_session` cookie. Ids are always minted here; a cookie naming an
//! unknown session (expired, or issued before a restart) starts a fresh one.

use axum::http::{header, HeaderMap};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::workspace::Workspace;
use crate::features::documents::services::DocumentService;

pub const SESSION_COOKIE: &str = "docdesk_session";

struct SessionEntry {
    workspace: Arc<Workspace>,
    last_seen: Instant,
}

/// The session a request belongs to
pub struct SessionHandle {
    pub id: String,
    pub workspace: Arc<Workspace>,
    /// Minted for this request; the response must set the cookie
    pub is_new: bool,
}

pub struct WorkspaceSessions {
    documents: Arc<DocumentService>,
    sessions: RwLock<HashMap<String, SessionEntry>>,
    idle_timeout: Duration,
}

impl WorkspaceSessions {
    pub fn new(documents: Arc<DocumentService>, idle_timeout: Duration) -> Self {
        Self {
            documents,
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Look up the session named by the request's cookie, or start a new one
    pub async fn resolve(&self, session_id: Option<&str>) -> SessionHandle {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = session_id {
            if let Some(entry) = sessions.get_mut(id) {
                entry.last_seen = Instant::now();
                return SessionHandle {
                    id: id.to_string(),
                    workspace: Arc::clone(&entry.workspace),
                    is_new: false,
                };
            }
            debug!("Unknown view session {}, starting a new one", id);
        }

        self.evict_idle(&mut sessions);

        let id = Uuid::new_v4().to_string();
        let workspace = Arc::new(Workspace::new(Arc::clone(&self.documents)));
        sessions.insert(
            id.clone(),
            SessionEntry {
                workspace: Arc::clone(&workspace),
                last_seen: Instant::now(),
            },
        );
        debug!("Started view session {} ({} active)", id, sessions.len());

        SessionHandle {
            id,
            workspace,
            is_new: true,
        }
    }

    /// Drop sessions idle past the timeout. A session with an upload in flight is kept.
    fn evict_idle(&self, sessions: &mut HashMap<String, SessionEntry>) {
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.last_seen.elapsed() < self.idle_timeout || entry.workspace.is_uploading()
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle view sessions", evicted);
        }
    }

    #[cfg(test)]
    pub async fn active(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Session id from the request's `Cookie` header, if present
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
        })
}

/// `Set-Cookie` value for a newly minted session
pub fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; SameSite=Lax; HttpOnly", SESSION_COOKIE, id)
}
