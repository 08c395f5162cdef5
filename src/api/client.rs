use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::{Map, Value};

use super::types::{BackendError, PayloadField, Reply, parse_reply};

/// The chat endpoint as seen by the app: text in, `Reply` out.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Send one user message and wait for the reply.
    async fn send(&self, text: &str) -> Result<Reply, BackendError>;
}

/// JSON-over-HTTP chat endpoint.
///
/// `POST <endpoint>` with `{ "<field>": text }`, expecting a JSON reply.
/// No timeout is configured: a request that never completes keeps the
/// exchange open until the task is aborted.
pub struct HttpBackend {
    endpoint: String,
    field: PayloadField,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(endpoint: String, field: PayloadField) -> Self {
        Self {
            endpoint,
            field,
            client: reqwest::Client::new(),
        }
    }

    fn request_body(&self, text: &str) -> Value {
        let mut body = Map::new();
        body.insert(self.field.key().to_string(), Value::String(text.to_string()));
        Value::Object(body)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, text: &str) -> Result<Reply, BackendError> {
        info!(
            "POST {} (field={}, len={})",
            self.endpoint,
            self.field.key(),
            text.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Endpoint response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!("Endpoint error: {} - {}", status, body);
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply = parse_reply(&body);
        match &reply {
            Ok(r) => debug!("Parsed reply: {:?}", r),
            Err(e) => warn!("Unusable reply body ({}): {}", e, body),
        }
        reply
    }
}
