//! Error taxonomy for platform API calls.

use serde::Deserialize;
use thiserror::Error;

use crate::auth::AuthError;

/// Errors that can occur when talking to the platform's table API.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// HTTP request failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform returned an error response.
    #[error("platform API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Machine-readable error code, when the platform provides one.
        code: Option<String>,
        /// Human-readable message from the error body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A single-row lookup or targeted write matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the platform.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// An auth-service call embedded in a data operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}

/// Error body shape returned by the table API.
///
/// The platform is not entirely consistent about field names across
/// services, so every field is optional and [`ApiErrorBody::message`]
/// picks the first one present.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct ApiErrorBody {
    pub message: Option<String>,
    pub msg: Option<String>,
    pub error_description: Option<String>,
    pub error: Option<String>,
    pub code: Option<String>,
}

impl ApiErrorBody {
    /// Decode an error body, falling back to an empty body on junk.
    pub(crate) fn decode(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Best-effort human-readable message.
    pub(crate) fn into_message(self) -> String {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or_else(|| "(no error details provided)".to_owned())
    }
}

/// Map a non-success table API response to a [`PlatformError`].
pub(crate) fn api_error(status: reqwest::StatusCode, raw_body: &str) -> PlatformError {
    let body = ApiErrorBody::decode(raw_body);
    PlatformError::Api {
        status: status.as_u16(),
        code: body.code.clone(),
        message: body.into_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_display() {
        let err = PlatformError::NotFound("profile for user 123".to_owned());
        assert_eq!(err.to_string(), "not found: profile for user 123");

        let err = PlatformError::RateLimited(30);
        assert_eq!(err.to_string(), "rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_api_error_prefers_message_field() {
        let err = api_error(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"message":"duplicate key value","code":"23505"}"#,
        );
        match err {
            PlatformError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code.as_deref(), Some("23505"));
                assert_eq!(message, "duplicate key value");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_across_field_names() {
        let err = api_error(
            reqwest::StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"error_description":"signup disabled"}"#,
        );
        assert!(err.to_string().contains("signup disabled"));
    }

    #[test]
    fn test_api_error_tolerates_junk_body() {
        let err = api_error(reqwest::StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(err.to_string().contains("no error details provided"));
    }
}
