//! Operator account management.

use vitrine_core::{Email, Sector};
use vitrine_platform::auth::{AuthClient, UserMetadata};
use vitrine_platform::records::NewProfile;
use vitrine_platform::rest::RestClient;
use vitrine_platform::ProfileStore;

use super::platform_from_env;

/// Create an operator account: identity plus an admin profile row.
pub async fn create(
    email: &str,
    password: &str,
    phone: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = platform_from_env()?;
    let auth = AuthClient::new(&config);
    let profiles = ProfileStore::new(RestClient::new(&config), auth.clone());

    let email = Email::parse(email)?;
    let identity = auth
        .admin_create_user(
            &email,
            password,
            &UserMetadata {
                sector: Some(Sector::Retail),
                phone: phone.map(ToOwned::to_owned),
            },
        )
        .await?;

    let profile = profiles
        .create(&NewProfile {
            user_id: identity.id,
            email,
            phone: phone.map(ToOwned::to_owned),
            sector: Sector::Retail,
            is_admin: true,
            is_blocked: false,
        })
        .await?;

    tracing::info!(user_id = %profile.user_id, email = %profile.email, "operator account created");
    Ok(())
}

/// Grant back-office access to an existing account.
pub async fn promote(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = platform_from_env()?;
    let auth = AuthClient::new(&config);
    let profiles = ProfileStore::new(RestClient::new(&config), auth);

    let email = Email::parse(email)?;
    let profile = profiles
        .find_by_email(&email)
        .await?
        .ok_or_else(|| format!("no profile found for {email}"))?;

    let updated = profiles.set_admin(profile.user_id, true).await?;
    tracing::info!(user_id = %updated.user_id, "account promoted to operator");
    Ok(())
}
