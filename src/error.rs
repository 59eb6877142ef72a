//! Unified request error model and failure-message resolution.
//! Every gateway call resolves to `ApiResult<T>`; expected failures carry a
//! user-facing message instead of panicking past the gateway boundary.

use reqwest::StatusCode;
use thiserror::Error;

/// Message for protected calls attempted with an empty credential store.
pub const MISSING_TOKEN_MESSAGE: &str = "Authentication token not available";

/// Last-resort message when a failure carries nothing usable of its own.
pub const FALLBACK_MESSAGE: &str = "Something went wrong with the request";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// A protected call found no credential in the store. Raised locally,
    /// before any connection is attempted.
    #[error("{}", MISSING_TOKEN_MESSAGE)]
    MissingToken,
    /// The call never produced a usable HTTP response: connect failure,
    /// timeout, or a body that would not decode.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    pub fn transport<S: Into<String>>(msg: S) -> Self { ApiError::Transport(msg.into()) }
    pub fn server<S: Into<String>>(status: u16, msg: S) -> Self { ApiError::Server { status, message: msg.into() } }

    /// User-facing message for this failure.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status of the response, when one was received at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Resolve the most specific human-readable message out of a failed
/// response, in priority order: a non-empty `error` string in the body,
/// then the body's `errors` list joined with ", ", then the HTTP status
/// line, then [`FALLBACK_MESSAGE`].
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(s) = v.get("error").and_then(|e| e.as_str()) {
            if !s.is_empty() {
                return s.to_string();
            }
        }
        if let Some(list) = v.get("errors").and_then(|e| e.as_array()) {
            let parts: Vec<&str> = list.iter().filter_map(|e| e.as_str()).collect();
            if !parts.is_empty() {
                return parts.join(", ");
            }
        }
    }
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {}: {}", status.as_u16(), reason),
        None => FALLBACK_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_string_wins_over_everything() {
        let body = r#"{"error":"Patient not found","errors":["ignored"]}"#;
        assert_eq!(extract_error_message(StatusCode::NOT_FOUND, body), "Patient not found");
    }

    #[test]
    fn errors_list_joined_with_comma_space() {
        let body = r#"{"errors":["email is required","phone number is invalid"]}"#;
        assert_eq!(
            extract_error_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "email is required, phone number is invalid"
        );
    }

    #[test]
    fn empty_error_string_falls_through_to_errors_list() {
        let body = r#"{"error":"","errors":["too many visits"]}"#;
        assert_eq!(extract_error_message(StatusCode::BAD_REQUEST, body), "too many visits");
    }

    #[test]
    fn non_json_body_falls_back_to_status_line() {
        assert_eq!(
            extract_error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>"),
            "HTTP 500: Internal Server Error"
        );
    }

    #[test]
    fn empty_errors_list_falls_back_to_status_line() {
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, r#"{"errors":[]}"#),
            "HTTP 400: Bad Request"
        );
    }

    #[test]
    fn unknown_status_uses_fixed_fallback() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(extract_error_message(status, "{}"), FALLBACK_MESSAGE);
    }

    #[test]
    fn variant_messages() {
        assert_eq!(ApiError::MissingToken.message(), MISSING_TOKEN_MESSAGE);
        assert_eq!(ApiError::transport("Network error: refused").message(), "Network error: refused");
        let e = ApiError::server(401, "Token expired");
        assert_eq!(e.message(), "Token expired");
        assert_eq!(e.status(), Some(401));
        assert_eq!(ApiError::MissingToken.status(), None);
    }
}
