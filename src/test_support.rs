//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{BackendError, ChatBackend, Reply};
use crate::core::state::App;

/// A backend that answers every request with a preset outcome and
/// records what it was sent.
pub struct ScriptedBackend {
    outcome: Result<Reply, BackendError>,
    pub received: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(outcome: Result<Reply, BackendError>) -> Self {
        Self {
            outcome,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(text: &str) -> Self {
        Self::new(Ok(Reply::Answer(text.to_string())))
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(&self, text: &str) -> Result<Reply, BackendError> {
        if let Ok(mut received) = self.received.lock() {
            received.push(text.to_string());
        }
        self.outcome.clone()
    }
}

/// Creates an initialized App with one empty session.
pub fn test_app() -> App {
    App::init()
}
