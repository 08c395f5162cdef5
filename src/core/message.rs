//! # Messages
//!
//! The unit of conversation. A `Message` is created by the orchestrator
//! (`action::update`) and never changes after it has been rendered.
//!
//! Error messages never carry server-provided text: they always use one of
//! the fixed templates below, chosen by category.

use crate::api::ErrorCategory;

/// Shown when the backend reports that its usage quota is exhausted.
pub const QUOTA_EXCEEDED_TEXT: &str =
    "The assistant has reached its usage limit for now. Please try again in a little while.";

/// Shown when the backend reports a misconfigured upstream model/API.
pub const UPSTREAM_CONFIG_TEXT: &str =
    "The assistant is not configured correctly right now. Please contact the administrator.";

/// Shown for any other typed error reported by the backend.
pub const GENERIC_ERROR_TEXT: &str =
    "Something went wrong while generating a reply. Please try again.";

/// Shown when the request fails or the reply can't be understood.
pub const CONNECTION_ERROR_TEXT: &str = "Sorry, an error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Normal,
    /// Degraded reply flagged by the backend; rendered with a marker.
    Fallback,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub content: String,
    pub sender: Sender,
    pub kind: MessageKind,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
            kind: MessageKind::Normal,
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Bot,
            kind: MessageKind::Normal,
        }
    }

    pub fn fallback(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Bot,
            kind: MessageKind::Fallback,
        }
    }

    /// Error message using the fixed template for `category`.
    pub fn typed_error(category: ErrorCategory) -> Self {
        let text = match category {
            ErrorCategory::QuotaExceeded => QUOTA_EXCEEDED_TEXT,
            ErrorCategory::UpstreamConfiguration => UPSTREAM_CONFIG_TEXT,
            ErrorCategory::General => GENERIC_ERROR_TEXT,
        };
        Self::error(text)
    }

    /// The generic connection-error message (transport or parse failure).
    pub fn connection_error() -> Self {
        Self::error(CONNECTION_ERROR_TEXT)
    }

    fn error(text: &str) -> Self {
        Self {
            content: text.to_string(),
            sender: Sender::Bot,
            kind: MessageKind::Error,
        }
    }

    /// Only plain bot replies are interpreted as markup.
    pub fn is_markup(&self) -> bool {
        self.sender == Sender::Bot && self.kind == MessageKind::Normal
    }
}
