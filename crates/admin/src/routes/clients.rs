//! Client management.
//!
//! Mirrors what an operator does day-to-day: list accounts, create one for a
//! client over the phone, block a bad payer, promote a shop to reseller
//! pricing, and delete an account on request.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use vitrine_core::{Email, Sector, UserId};
use vitrine_platform::auth::UserMetadata;
use vitrine_platform::records::{NewProfile, Profile};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Client creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub email: String,
    pub password: String,
    /// Admin-created accounts get their sector directly.
    pub sector: Option<Sector>,
    pub phone: Option<String>,
}

/// Block toggle request body.
#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    pub blocked: bool,
}

/// Sector change request body.
#[derive(Debug, Deserialize)]
pub struct SectorRequest {
    pub sector: Sector,
}

/// List client profiles, newest first.
pub async fn index(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<Profile>>> {
    Ok(Json(state.profiles().list().await?))
}

/// Create a client account.
///
/// The identity is created through the auth admin surface (no confirmation
/// email), and the profile row is written immediately with the requested
/// sector - an operator creating an account is the approval.
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Profile>)> {
    let email = Email::parse(&request.email)
        .map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))?;
    let sector = request.sector.unwrap_or_default();

    let identity = state
        .auth()
        .admin_create_user(
            &email,
            &request.password,
            &UserMetadata {
                sector: Some(sector),
                phone: request.phone.clone(),
            },
        )
        .await?;

    let profile = state
        .profiles()
        .create(&NewProfile {
            user_id: identity.id,
            email,
            phone: request.phone,
            sector,
            is_admin: false,
            is_blocked: false,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Block or unblock a client.
pub async fn set_blocked(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(user_id): Path<UserId>,
    Json(request): Json<BlockRequest>,
) -> Result<Json<Profile>> {
    guard_self_demotion(&admin, user_id)?;
    let profile = state
        .profiles()
        .set_blocked(user_id, request.blocked)
        .await?;
    Ok(Json(profile))
}

/// Change a client's pricing sector.
///
/// The new sector applies to the client's next fetch; nothing already
/// rendered for them is revisited.
pub async fn set_sector(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(user_id): Path<UserId>,
    Json(request): Json<SectorRequest>,
) -> Result<Json<Profile>> {
    let profile = state
        .profiles()
        .set_sector(user_id, request.sector)
        .await?;
    Ok(Json(profile))
}

/// Delete a client account: identity and profile.
pub async fn destroy(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(user_id): Path<UserId>,
) -> Result<StatusCode> {
    guard_self_demotion(&admin, user_id)?;
    state.profiles().delete_account(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Operators cannot block or delete themselves.
fn guard_self_demotion(admin: &RequireAdmin, target: UserId) -> Result<()> {
    if admin.identity.id == target {
        return Err(AppError::BadRequest(
            "Operators cannot block or delete their own account".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use chrono::Utc;
    use vitrine_core::ProfileId;
    use vitrine_platform::auth::Identity;

    fn admin_for(user_id: UserId) -> RequireAdmin {
        RequireAdmin {
            identity: Identity {
                id: user_id,
                email: Some("ops@example.com".to_owned()),
                email_confirmed_at: None,
                user_metadata: UserMetadata::default(),
            },
            profile: Profile {
                id: ProfileId::generate(),
                user_id,
                email: Email::parse("ops@example.com").unwrap(),
                phone: None,
                sector: Sector::Retail,
                is_admin: true,
                is_blocked: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_operator_cannot_target_own_account() {
        let user_id = UserId::generate();
        let admin = admin_for(user_id);
        assert!(guard_self_demotion(&admin, user_id).is_err());
        assert!(guard_self_demotion(&admin, UserId::generate()).is_ok());
    }
}
