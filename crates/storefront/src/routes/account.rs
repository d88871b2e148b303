//! Account route handlers (requires auth).

use axum::{Json, extract::State};
use serde::Deserialize;

use vitrine_platform::records::{Profile, ProfilePatch};

use crate::error::Result;
use crate::middleware::RequireViewer;
use crate::routes::auth::SessionPayload;
use crate::state::AppState;

/// Self-service profile update body.
///
/// Sector, admin, and block flags are admin-only; the only field an account
/// may change about itself is its contact phone.
#[derive(Debug, Deserialize)]
pub struct AccountUpdateRequest {
    pub phone: Option<String>,
}

/// Viewer snapshot: identity plus profile when known.
pub async fn show(viewer: RequireViewer) -> Json<SessionPayload> {
    Json(SessionPayload {
        identity: viewer.identity,
        profile: viewer.profile,
    })
}

/// Update the viewer's own profile.
pub async fn update(
    State(state): State<AppState>,
    viewer: RequireViewer,
    Json(request): Json<AccountUpdateRequest>,
) -> Result<Json<Profile>> {
    let profile = state
        .profiles()
        .update(
            viewer.identity.id,
            &ProfilePatch {
                phone: request.phone,
                ..Default::default()
            },
        )
        .await?;

    Ok(Json(profile))
}
