//! Profile facade: reads and targeted writes keyed by `user_id`.
//!
//! Each operation is a single request; there are no batch semantics. The
//! admin-only operations here are route-gated in the binaries, but the
//! platform's row-level policy is the actual authorization boundary.

use async_trait::async_trait;
use tracing::instrument;

use vitrine_core::{Email, Sector, UserId};

use crate::auth::{AuthClient, Identity};
use crate::error::PlatformError;
use crate::records::{NewProfile, Profile, ProfilePatch};
use crate::rest::{Order, RestClient};
use crate::session::ProfileGateway;

/// Typed access to the `profiles` collection.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    rest: RestClient,
    auth: AuthClient,
}

impl ProfileStore {
    /// Create a profile facade.
    ///
    /// The auth client is needed for [`ProfileStore::delete_account`], which
    /// removes the identity as well as the row.
    #[must_use]
    pub const fn new(rest: RestClient, auth: AuthClient) -> Self {
        Self { rest, auth }
    }

    /// Fetch the profile for an identity, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    #[instrument(skip(self))]
    pub async fn find_by_user(&self, user_id: UserId) -> Result<Option<Profile>, PlatformError> {
        self.rest
            .table("profiles")
            .select("*")
            .eq("user_id", &user_id.to_string())
            .fetch_optional()
            .await
    }

    /// Fetch a profile by email.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<Profile>, PlatformError> {
        self.rest
            .table("profiles")
            .select("*")
            .eq("email", email.as_str())
            .fetch_optional()
            .await
    }

    /// List all profiles, newest first.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Profile>, PlatformError> {
        self.rest
            .table("profiles")
            .select("*")
            .order("created_at", Order::Desc)
            .fetch()
            .await
    }

    /// Insert a profile row.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure; a
    /// unique-violation on `user_id` surfaces as `PlatformError::Api`.
    #[instrument(skip(self, profile), fields(user_id = %profile.user_id))]
    pub async fn create(&self, profile: &NewProfile) -> Result<Profile, PlatformError> {
        self.rest.table("profiles").insert(profile).await
    }

    /// Apply a patch to the profile of one identity.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::NotFound` if the identity has no profile row.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        user_id: UserId,
        patch: &ProfilePatch,
    ) -> Result<Profile, PlatformError> {
        let mut rows: Vec<Profile> = self
            .rest
            .table("profiles")
            .eq("user_id", &user_id.to_string())
            .update(patch)
            .await?;
        if rows.is_empty() {
            return Err(PlatformError::NotFound(format!("profile for user {user_id}")));
        }
        Ok(rows.swap_remove(0))
    }

    /// Change the pricing sector of one account.
    ///
    /// Takes effect on the account's next fetch; nothing already rendered is
    /// revisited.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::NotFound` if the identity has no profile row.
    pub async fn set_sector(&self, user_id: UserId, sector: Sector) -> Result<Profile, PlatformError> {
        self.update(
            user_id,
            &ProfilePatch {
                sector: Some(sector),
                ..Default::default()
            },
        )
        .await
    }

    /// Block or unblock one account.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::NotFound` if the identity has no profile row.
    pub async fn set_blocked(
        &self,
        user_id: UserId,
        blocked: bool,
    ) -> Result<Profile, PlatformError> {
        self.update(
            user_id,
            &ProfilePatch {
                is_blocked: Some(blocked),
                ..Default::default()
            },
        )
        .await
    }

    /// Grant or revoke back-office access.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::NotFound` if the identity has no profile row.
    pub async fn set_admin(&self, user_id: UserId, is_admin: bool) -> Result<Profile, PlatformError> {
        self.update(
            user_id,
            &ProfilePatch {
                is_admin: Some(is_admin),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete an account: the identity first, then its profile row.
    ///
    /// The row is removed explicitly rather than relying on a cascade, so a
    /// fetch immediately afterwards finds neither identity nor profile.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Auth` if the identity deletion is rejected,
    /// `PlatformError` for the row deletion.
    #[instrument(skip(self))]
    pub async fn delete_account(&self, user_id: UserId) -> Result<(), PlatformError> {
        self.auth.admin_delete_user(user_id).await?;
        self.rest
            .table("profiles")
            .eq("user_id", &user_id.to_string())
            .delete()
            .await
    }
}

#[async_trait]
impl ProfileGateway for ProfileStore {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Profile>, PlatformError> {
        Self::find_by_user(self, user_id).await
    }

    async fn create_default(&self, identity: &Identity) -> Result<Profile, PlatformError> {
        self.create(&NewProfile::default_for(identity)).await
    }
}
