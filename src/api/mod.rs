//! # Chat Endpoint
//!
//! The network collaborator. Everything the app knows about the backend
//! goes through `ChatBackend::send`, which yields a `Reply` or a
//! `BackendError`.

pub mod client;
pub mod types;

pub use client::{ChatBackend, HttpBackend};
pub use types::{BackendError, ErrorCategory, PayloadField, Reply, ReplyPayload, parse_reply};
