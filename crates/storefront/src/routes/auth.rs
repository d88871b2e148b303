//! Authentication route handlers.
//!
//! All credential work is delegated to the platform's auth service; these
//! handlers translate between HTTP, the browser session, and the session
//! resolver for the signed-in user.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use vitrine_core::{Email, Sector};
use vitrine_platform::auth::{AuthEvent, AuthSession, Identity};
use vitrine_platform::records::Profile;
use vitrine_platform::session::{BearerIdentity, ProfileGateway};

use crate::error::{AppError, Result};
use crate::middleware::{StoredCredential, clear_credential, get_credential, set_credential};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Requested pricing tier; recorded as metadata, not granted.
    pub sector: Option<Sector>,
    pub phone: Option<String>,
}

/// Registration response body.
#[derive(Debug, Serialize)]
pub struct RegisterPayload {
    /// True when the account must confirm its email before signing in; the
    /// client shows "check your email" instead of treating this as a login.
    pub confirmation_required: bool,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session response body.
#[derive(Debug, Serialize)]
pub struct SessionPayload {
    pub identity: Identity,
    pub profile: Option<Profile>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an account.
///
/// The requested sector is stored as sign-up metadata only; the profile row
/// is created with the retail default on first sign-in and an admin promotes
/// resellers explicitly.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterPayload>> {
    let email = parse_email(&request.email)?;
    let outcome = state
        .auth()
        .sign_up(
            &email,
            &request.password,
            request.sector.unwrap_or_default(),
            request.phone.as_deref(),
        )
        .await?;

    Ok(Json(RegisterPayload {
        confirmation_required: outcome.needs_confirmation(),
    }))
}

/// Sign in with an email/password pair.
///
/// Stores the platform credential in the browser session and routes the
/// sign-in through the session's resolver so the profile (created lazily on
/// first sign-in) is part of the response.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionPayload>> {
    let email = parse_email(&request.email)?;
    let auth_session = state
        .auth()
        .sign_in_with_password(&email, &request.password)
        .await?;

    let snapshot = install_session(&state, &session, &auth_session).await?;

    Ok(Json(SessionPayload {
        identity: auth_session.user,
        profile: snapshot,
    }))
}

/// Refresh the platform credential.
///
/// An invalid refresh token clears the cached credential and tears the
/// resolver down: the session is over, the client signs in again.
pub async fn refresh(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SessionPayload>> {
    let credential = get_credential(&session)
        .await
        .ok_or_else(|| AppError::Unauthorized("No active session".to_owned()))?;

    let refreshed = match state
        .auth()
        .refresh_session(&credential.refresh_token)
        .await
    {
        Ok(refreshed) => refreshed,
        Err(error) => {
            // Invalid token: drop the cached credential before surfacing.
            state.resolvers().notify(&credential.sid, AuthEvent::SignedOut);
            state.resolvers().remove(&credential.sid);
            let _ = clear_credential(&session).await;
            return Err(error.into());
        }
    };

    set_credential(
        &session,
        &StoredCredential {
            sid: credential.sid.clone(),
            access_token: refreshed.access_token.clone(),
            refresh_token: refreshed.refresh_token.clone(),
        },
    )
    .await
    .map_err(|e| AppError::Internal(format!("session store: {e}")))?;

    state.resolvers().notify(
        &credential.sid,
        AuthEvent::TokenRefreshed(refreshed.user.clone()),
    );

    Ok(Json(SessionPayload {
        identity: refreshed.user,
        profile: None,
    }))
}

/// Sign out.
///
/// Revocation at the platform is best-effort; the local credential and the
/// session's resolver always go away.
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Json<()>> {
    if let Some(credential) = get_credential(&session).await {
        state.resolvers().notify(&credential.sid, AuthEvent::SignedOut);
        state.resolvers().remove(&credential.sid);

        if let Err(error) = state.auth().sign_out(&credential.access_token).await {
            tracing::warn!(error = %error, "platform sign-out failed, credential cleared locally");
        }
    }

    clear_credential(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session store: {e}")))?;

    Ok(Json(()))
}

/// Redirect to an external provider's consent page.
pub async fn oauth_start(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Redirect> {
    let url = state
        .auth()
        .authorize_url(&provider, &state.config().base_url)
        .map_err(|e| AppError::Internal(format!("authorize URL: {e}")))?;

    Ok(Redirect::to(url.as_str()))
}

// =============================================================================
// Helpers
// =============================================================================

/// Store the credential and run the sign-in through the session's resolver.
///
/// Returns the resolved profile, which may be `None` when profile
/// resolution failed open.
async fn install_session(
    state: &AppState,
    session: &Session,
    auth_session: &AuthSession,
) -> Result<Option<Profile>> {
    // Signing in over an existing session replaces its resolver.
    if let Some(previous) = get_credential(session).await {
        state.resolvers().remove(&previous.sid);
    }

    let sid = Uuid::new_v4().to_string();

    set_credential(
        session,
        &StoredCredential {
            sid: sid.clone(),
            access_token: auth_session.access_token.clone(),
            refresh_token: auth_session.refresh_token.clone(),
        },
    )
    .await
    .map_err(|e| AppError::Internal(format!("session store: {e}")))?;

    let resolver = state.resolvers().obtain(
        &sid,
        Arc::new(BearerIdentity::new(
            state.auth().clone(),
            auth_session.access_token.clone(),
        )),
        Arc::clone(state.profiles()) as Arc<dyn ProfileGateway>,
    );
    resolver.notify(AuthEvent::SignedIn(auth_session.user.clone()));

    Ok(resolver.resolved().await.profile)
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw).map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))
}
