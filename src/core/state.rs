//! # Application State
//!
//! Core business state for Charla. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── sessions: SessionHistory            // all sessions, newest first
//! ├── thread: Thread                      // what the user currently sees
//! ├── pending: Option<PendingExchange>    // in-flight request (at most one)
//! ├── welcome_visible: bool               // welcome placeholder shown
//! ├── menu_open: bool                     // session sidebar toggled open
//! └── status_message: String              // title bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! `App::init` is the "page load": it creates the first session.
//! `App::dispose` is the teardown.

use log::{debug, info};

use crate::core::session::SessionHistory;
use crate::core::thread::{Thread, TypingHandle};

/// The open request for the current exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExchange {
    /// Matches the `ExchangeSettled` action that closes this exchange.
    pub ticket: u64,
    /// Session the user message was sent from.
    pub session_id: String,
    /// Placeholder to remove on settle.
    pub typing: TypingHandle,
}

#[derive(Debug)]
pub struct App {
    pub sessions: SessionHistory,
    pub thread: Thread,
    pub pending: Option<PendingExchange>,
    pub welcome_visible: bool,
    pub menu_open: bool,
    pub status_message: String,
    next_ticket: u64,
}

impl App {
    /// Build the controller and open the first session.
    pub fn init() -> Self {
        let mut app = Self {
            sessions: SessionHistory::new(),
            thread: Thread::new(),
            pending: None,
            welcome_visible: true,
            menu_open: false,
            status_message: String::from("Welcome to Charla!"),
            next_ticket: 1,
        };
        let id = app.sessions.create().id.clone();
        info!("App initialized with session {}", id);
        app
    }

    /// Close any open exchange. Returns its ticket so the caller can
    /// abort the request task.
    pub fn dispose(&mut self) -> Option<u64> {
        let pending = self.pending.take()?;
        self.thread.hide_typing(pending.typing);
        debug!("Disposed with exchange #{} still open", pending.ticket);
        Some(pending.ticket)
    }

    /// True while a reply is pending. New messages are rejected.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a send of `input` would be accepted right now.
    pub fn can_send(&self, input: &str) -> bool {
        !input.trim().is_empty() && !self.is_busy()
    }

    pub fn current_title(&self) -> &str {
        self.sessions
            .current()
            .map(|s| s.title.as_str())
            .unwrap_or("")
    }

    pub(crate) fn take_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }
}
