//! Error types for auth-service operations.

use thiserror::Error;

/// Errors that can occur when talking to the platform's auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Email/password pair rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Access or refresh token rejected or expired.
    ///
    /// Callers must clear any cached credential when they see this.
    #[error("invalid or expired token")]
    InvalidToken,

    /// An account with this email already exists.
    #[error("account already exists")]
    UserAlreadyExists,

    /// The auth service rejected the password.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Any other error response from the auth service.
    #[error("auth API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An admin operation was attempted without a service-role key.
    #[error("admin operation requires a service-role key")]
    MissingServiceKey,
}
