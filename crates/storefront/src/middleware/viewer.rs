//! Viewer extractors.
//!
//! Route handlers see the current session as a [`SessionSnapshot`]: identity
//! and profile when known, guest otherwise. The snapshot comes from the
//! session's resolver in the registry; extraction waits until the resolving
//! phase has ended, which the resolver bounds by its timeout, so a hung
//! backend can never hang a request.

use std::convert::Infallible;
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
use vitrine_platform::session::{BearerIdentity, ProfileGateway, SessionSnapshot};

use crate::state::AppState;

/// Session keys used by the storefront.
pub mod session_keys {
    /// Platform credential for the signed-in user.
    pub const CREDENTIAL: &str = "vitrine.credential";
}

/// The platform credential stored in the browser session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Resolver key for this browser session.
    pub sid: String,
    /// Bearer token for platform calls on behalf of the user.
    pub access_token: String,
    /// Token used to mint a fresh access token.
    pub refresh_token: String,
}

/// Extractor that resolves the current viewer, guest or signed in.
///
/// Never rejects: an anonymous request, a missing session layer, and a
/// failed resolution all yield the guest snapshot.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentViewer(viewer): CurrentViewer) -> impl IntoResponse {
///     match viewer.sector() {
///         Some(sector) => format!("pricing tier: {sector}"),
///         None => "guest pricing".to_string(),
///     }
/// }
/// ```
pub struct CurrentViewer(pub SessionSnapshot);

impl FromRequestParts<AppState> for CurrentViewer {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(SessionSnapshot::default()));
        };

        let credential: Option<StoredCredential> = session
            .get(session_keys::CREDENTIAL)
            .await
            .ok()
            .flatten();

        let Some(credential) = credential else {
            return Ok(Self(SessionSnapshot::default()));
        };

        let resolver = state.resolvers().obtain(
            &credential.sid,
            Arc::new(BearerIdentity::new(
                state.auth().clone(),
                credential.access_token,
            )),
            Arc::clone(state.profiles()) as Arc<dyn ProfileGateway>,
        );

        Ok(Self(resolver.resolved().await))
    }
}

/// Extractor that requires a signed-in viewer.
///
/// Rejects with 401 when no identity is established. The profile may still
/// be absent (resolution failed open); handlers must positively check any
/// privilege they need.
pub struct RequireViewer {
    pub identity: Identity,
    pub profile: Option<Profile>,
}

/// Error returned when authentication is required but not present.
pub struct ViewerRejection;

impl IntoResponse for ViewerRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Authentication required" })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireViewer {
    type Rejection = ViewerRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentViewer(snapshot) = CurrentViewer::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        match snapshot.identity {
            Some(identity) => Ok(Self {
                identity,
                profile: snapshot.profile,
            }),
            None => Err(ViewerRejection),
        }
    }
}

/// Helper to store the platform credential in the session.
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

/// Helper to read the platform credential from the session.
pub async fn get_credential(session: &Session) -> Option<StoredCredential> {
    session
        .get(session_keys::CREDENTIAL)
        .await
        .ok()
        .flatten()
}

/// Helper to clear the platform credential from the session (sign-out).
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
