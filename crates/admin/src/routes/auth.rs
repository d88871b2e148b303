//! Operator authentication.
//!
//! Only accounts whose profile carries `is_admin` may hold a back-office
//! session; everyone else is rejected at login even with valid credentials.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use vitrine_core::Email;
use vitrine_platform::auth::AuthEvent;
use vitrine_platform::records::Profile;
use vitrine_platform::session::BearerIdentity;

use crate::error::{AppError, Result};
use crate::middleware::{StoredCredential, clear_credential, get_credential, set_credential};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct OperatorPayload {
    pub profile: Profile,
}

/// Operator sign-in.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<OperatorPayload>> {
    let email = Email::parse(&request.email)
        .map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))?;
    let auth_session = state
        .auth()
        .sign_in_with_password(&email, &request.password)
        .await?;

    let sid = Uuid::new_v4().to_string();
    let resolver = state.obtain_resolver(
        &sid,
        Arc::new(BearerIdentity::new(
            state.auth().clone(),
            auth_session.access_token.clone(),
        )),
    );
    resolver.notify(AuthEvent::SignedIn(auth_session.user.clone()));
    let snapshot = resolver.resolved().await;

    let Some(profile) = snapshot.profile.filter(|p| p.is_admin) else {
        // Valid credentials, but not an operator. Drop everything.
        state.remove_resolver(&sid);
        let _ = state.auth().sign_out(&auth_session.access_token).await;
        return Err(AppError::Forbidden(
            "Administrator access required".to_owned(),
        ));
    };

    set_credential(
        &session,
        &StoredCredential {
            sid,
            access_token: auth_session.access_token,
            refresh_token: auth_session.refresh_token,
        },
    )
    .await
    .map_err(|e| AppError::Internal(format!("session store: {e}")))?;

    Ok(Json(OperatorPayload { profile }))
}

/// Operator sign-out.
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Json<()>> {
    if let Some(credential) = get_credential(&session).await {
        state.notify_resolver(&credential.sid, AuthEvent::SignedOut);
        state.remove_resolver(&credential.sid);

        if let Err(error) = state.auth().sign_out(&credential.access_token).await {
            tracing::warn!(error = %error, "platform sign-out failed, credential cleared locally");
        }
    }

    clear_credential(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session store: {e}")))?;

    Ok(Json(()))
}
