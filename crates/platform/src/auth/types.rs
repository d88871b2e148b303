//! Wire types for the platform's auth service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_core::{Sector, UserId};

/// An authenticated subject as tracked by the auth service.
///
/// The application holds a read-only, possibly-stale cached copy; the auth
/// service owns the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Opaque subject id.
    pub id: UserId,
    /// Email registered with the auth service.
    pub email: Option<String>,
    /// When the email was confirmed, if it has been.
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    /// Free-form metadata captured at sign-up.
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Sign-up metadata stored on the identity.
///
/// The requested sector lives here only; the authoritative sector is the one
/// on the profile row, which an admin controls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserMetadata {
    /// Sector requested on the sign-up form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<Sector>,
    /// Contact phone supplied at sign-up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// An issued credential pair with its expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token for API calls on behalf of the user.
    pub access_token: String,
    /// Token used to mint a fresh access token.
    pub refresh_token: String,
    /// Unix timestamp at which the access token expires.
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// The identity the credential was issued for.
    pub user: Identity,
}

/// Outcome of a self-service sign-up.
///
/// The auth service may require email confirmation before issuing a
/// credential, in which case `session` is `None` and the caller must show
/// "check your email" messaging rather than assume login.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpOutcome {
    /// Credential, when the account is immediately active.
    #[serde(default)]
    pub session: Option<AuthSession>,
    /// The created identity, when the service reports it.
    #[serde(default)]
    pub user: Option<Identity>,
}

impl SignUpOutcome {
    /// True when the account was created but must confirm its email before
    /// it can sign in.
    #[must_use]
    pub const fn needs_confirmation(&self) -> bool {
        self.user.is_some() && self.session.is_none()
    }
}

/// Identity change notifications delivered to session resolvers.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// A credential was issued for this identity.
    SignedIn(Identity),
    /// The credential was refreshed; the identity may carry newer claims.
    TokenRefreshed(Identity),
    /// The credential was revoked or discarded.
    SignedOut,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_deserializes_without_metadata() {
        let identity: Identity = serde_json::from_str(
            r#"{"id":"7f8a1c9e-0b4d-4f6a-9c3e-2d5b8a7f1e0c","email":"a@b.c"}"#,
        )
        .unwrap();
        assert_eq!(identity.email.as_deref(), Some("a@b.c"));
        assert_eq!(identity.user_metadata, UserMetadata::default());
    }

    #[test]
    fn test_signup_outcome_needs_confirmation() {
        let pending: SignUpOutcome = serde_json::from_str(
            r#"{"user":{"id":"7f8a1c9e-0b4d-4f6a-9c3e-2d5b8a7f1e0c","email":"a@b.c"}}"#,
        )
        .unwrap();
        assert!(pending.needs_confirmation());

        let none: SignUpOutcome = serde_json::from_str("{}").unwrap();
        assert!(!none.needs_confirmation());
    }

    #[test]
    fn test_metadata_skips_absent_fields() {
        let json = serde_json::to_string(&UserMetadata::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
