//! Error types for the Parley core library.
//!
//! Only `send_message` failures ever reach the chat controller; status polling
//! swallows its errors at the client boundary and keeps the last-known map.

use thiserror::Error;

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    /// The request never produced an HTTP response (connect failure, timeout, reset).
    #[error("network failure: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {body}")]
    BackendStatus { status: u16, body: String },

    /// The backend answered 2xx but the body does not match the chat contract.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// Builds a status error, falling back to the status code when the body is blank.
    pub fn backend_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let body = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };
        Self::BackendStatus { status, body }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Network(_) => "network",
            ChatError::BackendStatus { .. } => "backend_status",
            ChatError::MalformedResponse(_) => "malformed_response",
            ChatError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_status_keeps_body() {
        let err = ChatError::backend_status(502, "upstream down");
        assert_eq!(err.to_string(), "backend returned 502: upstream down");
        assert_eq!(err.kind(), "backend_status");
    }

    #[test]
    fn test_backend_status_blank_body_uses_code() {
        let err = ChatError::backend_status(500, "  ");
        match err {
            ChatError::BackendStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "HTTP 500");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_error_is_malformed() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ChatError = parse_err.into();
        assert_eq!(err.kind(), "malformed_response");
    }
}
