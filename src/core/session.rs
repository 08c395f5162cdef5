//! # Sessions
//!
//! In-memory conversation history for the lifetime of the process.
//! Nothing is written to disk.
//!
//! The history is ordered newest-first (new sessions are inserted at the
//! head), and exactly one session is active at a time once the app is
//! initialized.
//!
//! Switching sessions does not restore earlier messages into the thread.
//! The record is kept, but the visible thread starts empty.

use chrono::{DateTime, Local, Utc};
use log::debug;

use crate::core::message::Message;

/// Title every session starts with until its first user message.
pub const PLACEHOLDER_TITLE: &str = "New chat";
/// Character budget for derived titles (ellipsis not included).
pub const TITLE_MAX_CHARS: usize = 30;
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Local>,
    pub messages: Vec<Message>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: new_session_id(),
            title: PLACEHOLDER_TITLE.to_string(),
            created_at: Local::now(),
            messages: Vec::new(),
        }
    }

    pub fn has_placeholder_title(&self) -> bool {
        self.title == PLACEHOLDER_TITLE
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a session id: creation time plus a random suffix.
///
/// Format: `chat_<unix millis>_<8 hex chars>`.
pub fn new_session_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("chat_{}_{}", millis, &suffix[..8])
}

/// Derive a session title from the first user message.
///
/// Counts characters, not bytes, so multibyte text is never split.
pub fn derive_title(first_message: &str) -> String {
    if first_message.chars().count() > TITLE_MAX_CHARS {
        let head: String = first_message.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}{ELLIPSIS}")
    } else {
        first_message.to_string()
    }
}

#[derive(Debug, Default)]
pub struct SessionHistory {
    /// Newest first.
    sessions: Vec<Session>,
    active: Option<String>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh session at the head and make it active.
    pub fn create(&mut self) -> &Session {
        let session = Session::new();
        debug!("Created session {}", session.id);
        self.active = Some(session.id.clone());
        self.sessions.insert(0, session);
        &self.sessions[0]
    }

    /// Mark `id` active. Returns false (and changes nothing) if unknown.
    pub fn switch(&mut self, id: &str) -> bool {
        if self.sessions.iter().any(|s| s.id == id) {
            self.active = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn current(&self) -> Option<&Session> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Session> {
        let id = self.active.clone()?;
        self.get_mut(&id)
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn entries(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
