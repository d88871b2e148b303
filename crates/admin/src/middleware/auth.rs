//! Authentication middleware and extractors for the back-office.
//!
//! Every route behind [`RequireAdmin`] positively checks `is_admin` on the
//! resolved profile - absence of a profile is never treated as privilege.
//! This gate is a convenience; the platform's row-level policy on the
//! `is_admin` claim is the authorization boundary.

use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;

use vitrine_platform::auth::Identity;
use vitrine_platform::records::Profile;
use vitrine_platform::session::BearerIdentity;

use crate::state::AppState;

/// Session keys used by the back-office.
pub mod session_keys {
    /// Platform credential for the signed-in operator.
    pub const CREDENTIAL: &str = "vitrine_admin.credential";
}

/// The platform credential stored in the operator's browser session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Resolver key for this browser session.
    pub sid: String,
    /// Bearer token for platform calls on behalf of the operator.
    pub access_token: String,
    /// Token used to mint a fresh access token.
    pub refresh_token: String,
}

/// Extractor that requires an administrator.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin { profile, .. }: RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", profile.email)
/// }
/// ```
pub struct RequireAdmin {
    pub identity: Identity,
    pub profile: Profile,
}

/// Error returned when admin access is required.
pub enum AdminRejection {
    /// Not signed in.
    Unauthorized,
    /// Signed in but not an administrator.
    Forbidden,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Authentication required" })),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Administrator access required" })),
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminRejection::Unauthorized)?;

        let credential: StoredCredential = session
            .get(session_keys::CREDENTIAL)
            .await
            .ok()
            .flatten()
            .ok_or(AdminRejection::Unauthorized)?;

        let resolver = state.obtain_resolver(
            &credential.sid,
            Arc::new(BearerIdentity::new(
                state.auth().clone(),
                credential.access_token,
            )),
        );
        let snapshot = resolver.resolved().await;

        let Some(identity) = snapshot.identity else {
            return Err(AdminRejection::Unauthorized);
        };
        match snapshot.profile {
            Some(profile) if profile.is_admin => Ok(Self { identity, profile }),
            _ => Err(AdminRejection::Forbidden),
        }
    }
}

/// Helper to store the operator credential in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_credential(
    session: &Session,
    credential: &StoredCredential,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CREDENTIAL, credential).await
}

/// Helper to read the operator credential from the session.
pub async fn get_credential(session: &Session) -> Option<StoredCredential> {
    session
        .get(session_keys::CREDENTIAL)
        .await
        .ok()
        .flatten()
}

/// Helper to clear the operator credential from the session (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_credential(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<StoredCredential>(session_keys::CREDENTIAL)
        .await?;
    Ok(())
}
