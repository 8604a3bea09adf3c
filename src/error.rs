//! Error types for the SwapSpec client

use serde::Deserialize;
use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Unified failure surface for every client operation.
///
/// Callers branch on [`status`](ApiError::status): `None` means the request
/// never completed (or never left the process), `Some(401)` means the
/// session has already been torn down, anything else is a server rejection.
/// The `Display` impl is the user-facing message and is never empty.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A local precondition failed; no request was issued
    #[error("{0}")]
    Validation(String),

    /// The server rejected the credential (HTTP 401)
    #[error("{message}")]
    Auth { message: String },

    /// The server answered with a non-2xx status other than 401
    #[error("{message}")]
    Request { status: u16, message: String },

    /// No usable response: connection failure, timeout, or a success body
    /// that could not be decoded
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    /// HTTP status carried by this failure, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Auth { .. } => Some(401),
            ApiError::Request { status, .. } => Some(*status),
            ApiError::Validation(_) | ApiError::Transport(_) => None,
        }
    }

    /// True when this failure tore the session down (HTTP 401).
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }
}

/// Error body convention used by every endpoint: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Extracts a display message from an error response body, falling back to
/// a status-derived message when the body is not the expected shape.
pub(crate) fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_optional() {
        assert_eq!(ApiError::Validation("vin must be 17 characters".into()).status(), None);
        assert_eq!(
            ApiError::Auth { message: "Could not validate credentials".into() }.status(),
            Some(401)
        );
        assert_eq!(
            ApiError::Request { status: 404, message: "Vehicle not found".into() }.status(),
            Some(404)
        );
        assert_eq!(ApiError::Transport("connection refused".into()).status(), None);
    }

    #[test]
    fn test_display_is_the_bare_message() {
        let err = ApiError::Request { status: 409, message: "Build already exists".into() };
        assert_eq!(err.to_string(), "Build already exists");
    }

    #[test]
    fn test_detail_field_surfaces_verbatim() {
        let body = br#"{"detail": "Incorrect email or password"}"#;
        assert_eq!(error_message(401, body), "Incorrect email or password");
    }

    #[test]
    fn test_non_json_body_falls_back_to_status_message() {
        let msg = error_message(502, b"<html>Bad Gateway</html>");
        assert_eq!(msg, "request failed with status 502");
    }

    #[test]
    fn test_empty_detail_falls_back_too() {
        assert_eq!(error_message(500, br#"{"detail": ""}"#), "request failed with status 500");
        assert_eq!(error_message(500, br#"{"other": 1}"#), "request failed with status 500");
    }

    #[test]
    fn test_messages_are_never_empty() {
        for err in [
            ApiError::Validation("bad input".into()),
            ApiError::Auth { message: error_message(401, b"") },
            ApiError::Request { status: 500, message: error_message(500, b"{}") },
            ApiError::Transport("timed out".into()),
        ] {
            assert!(!err.to_string().is_empty());
        }
    }
}
