use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

/// Name of the JSON field that carries the user's text in the request body.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PayloadField {
    /// `{ "message": text }`
    #[default]
    Message,
    /// `{ "mensaje": text }`, used by the minimal backend.
    Mensaje,
}

impl PayloadField {
    pub fn key(self) -> &'static str {
        match self {
            PayloadField::Message => "message",
            PayloadField::Mensaje => "mensaje",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "message" => Some(PayloadField::Message),
            "mensaje" => Some(PayloadField::Mensaje),
            _ => None,
        }
    }
}

/// Category of a typed backend error; selects the user-facing template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    QuotaExceeded,
    UpstreamConfiguration,
    General,
}

impl ErrorCategory {
    /// Map the wire `error_type`. Unknown or missing values are `General`.
    pub fn from_wire(error_type: Option<&str>) -> Self {
        match error_type {
            Some("quota_exceeded") => ErrorCategory::QuotaExceeded,
            Some("api_error") => ErrorCategory::UpstreamConfiguration,
            _ => ErrorCategory::General,
        }
    }
}

/// A well-formed reply from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Answer(String),
    Fallback(String),
    Failed(ErrorCategory),
}

/// Errors on the transport path. All of them render the same
/// connection-error message; the variants exist for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// Endpoint answered with a non-2xx status.
    Status { status: u16, body: String },
    /// Body was not valid JSON.
    Parse(String),
    /// Valid JSON, but none of the recognised reply shapes.
    Malformed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Status { status, body } => {
                write!(f, "endpoint error (HTTP {status}): {body}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
            BackendError::Malformed(msg) => write!(f, "malformed reply: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// Raw response body. Every field is optional; `into_reply` decides which
/// shape it is.
#[derive(Deserialize, Debug, Default)]
pub struct ReplyPayload {
    pub response: Option<String>,
    pub is_fallback: Option<bool>,
    pub respuesta: Option<String>,
    pub error: Option<String>,
    pub error_type: Option<String>,
}

impl ReplyPayload {
    /// Interpret the payload. `error` takes precedence over `response`,
    /// which takes precedence over `respuesta`.
    pub fn into_reply(self) -> Result<Reply, BackendError> {
        if let Some(error) = self.error {
            log::warn!(
                "Endpoint reported error (type={:?}): {}",
                self.error_type,
                error
            );
            return Ok(Reply::Failed(ErrorCategory::from_wire(
                self.error_type.as_deref(),
            )));
        }
        if let Some(text) = self.response {
            return Ok(if self.is_fallback.unwrap_or(false) {
                Reply::Fallback(text)
            } else {
                Reply::Answer(text)
            });
        }
        if let Some(text) = self.respuesta {
            return Ok(Reply::Answer(text));
        }
        Err(BackendError::Malformed(
            "expected one of `response`, `respuesta` or `error`".to_string(),
        ))
    }
}

/// Parse a response body into a `Reply`.
pub fn parse_reply(body: &str) -> Result<Reply, BackendError> {
    let payload: ReplyPayload =
        serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))?;
    payload.into_reply()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_response_is_answer() {
        assert_eq!(
            parse_reply(r#"{"response": "Hello!"}"#),
            Ok(Reply::Answer("Hello!".to_string()))
        );
    }

    #[test]
    fn test_fallback_flag() {
        assert_eq!(
            parse_reply(r#"{"response": "Cached", "is_fallback": true}"#),
            Ok(Reply::Fallback("Cached".to_string()))
        );
        assert_eq!(
            parse_reply(r#"{"response": "Fresh", "is_fallback": false}"#),
            Ok(Reply::Answer("Fresh".to_string()))
        );
    }

    #[test]
    fn test_legacy_respuesta_shape() {
        assert_eq!(
            parse_reply(r#"{"respuesta": "Hola"}"#),
            Ok(Reply::Answer("Hola".to_string()))
        );
    }

    #[test]
    fn test_typed_errors_map_to_categories() {
        assert_eq!(
            parse_reply(r#"{"error": "x", "error_type": "quota_exceeded"}"#),
            Ok(Reply::Failed(ErrorCategory::QuotaExceeded))
        );
        assert_eq!(
            parse_reply(r#"{"error": "x", "error_type": "api_error"}"#),
            Ok(Reply::Failed(ErrorCategory::UpstreamConfiguration))
        );
        assert_eq!(
            parse_reply(r#"{"error": "x", "error_type": "general_error"}"#),
            Ok(Reply::Failed(ErrorCategory::General))
        );
        assert_eq!(
            parse_reply(r#"{"error": "x", "error_type": "something_new"}"#),
            Ok(Reply::Failed(ErrorCategory::General))
        );
        assert_eq!(
            parse_reply(r#"{"error": "x"}"#),
            Ok(Reply::Failed(ErrorCategory::General))
        );
    }

    #[test]
    fn test_error_wins_over_response() {
        assert_eq!(
            parse_reply(r#"{"response": "hi", "error": "boom", "error_type": "api_error"}"#),
            Ok(Reply::Failed(ErrorCategory::UpstreamConfiguration))
        );
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            parse_reply("<html>502 Bad Gateway</html>"),
            Err(BackendError::Parse(_))
        ));
    }

    #[test]
    fn test_unrecognised_object_is_malformed() {
        assert!(matches!(
            parse_reply(r#"{"answer": "hi"}"#),
            Err(BackendError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_field_type_is_parse_error() {
        assert!(matches!(
            parse_reply(r#"{"response": 42}"#),
            Err(BackendError::Parse(_))
        ));
    }

    #[test]
    fn test_payload_field_parse() {
        assert_eq!(PayloadField::parse("Mensaje"), Some(PayloadField::Mensaje));
        assert_eq!(PayloadField::parse(" message "), Some(PayloadField::Message));
        assert_eq!(PayloadField::parse("body"), None);
        assert_eq!(PayloadField::Mensaje.key(), "mensaje");
    }
}
