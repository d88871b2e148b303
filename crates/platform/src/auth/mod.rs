//! Auth-service client.
//!
//! Wraps the platform's auth HTTP API: password and refresh grants, sign-up
//! with metadata, bearer-token user lookup, sign-out, the OAuth authorize
//! redirect, and the service-role admin surface (create/delete user).
//!
//! Admin operations are gated server-side by the service-role key; the
//! route-level gating in the binaries is a convenience, never the
//! authorization boundary.

mod error;
mod types;

pub use error::AuthError;
pub use types::{AuthEvent, AuthSession, Identity, SignUpOutcome, UserMetadata};

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, instrument, warn};
use url::Url;

use vitrine_core::{Email, Sector, UserId};

use crate::config::PlatformConfig;
use crate::error::ApiErrorBody;

/// Client for the platform's auth service.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    http: reqwest::Client,
    endpoint: String,
    anon_key: String,
    service_key: Option<SecretString>,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("endpoint", &self.inner.endpoint)
            .field("anon_key", &self.inner.anon_key)
            .field(
                "service_key",
                &self.inner.service_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl AuthClient {
    /// Create a new auth client.
    #[must_use]
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            inner: Arc::new(AuthClientInner {
                http: reqwest::Client::new(),
                endpoint: config.auth_endpoint(),
                anon_key: config.anon_key().to_owned(),
                service_key: config.service_key().cloned(),
            }),
        }
    }

    /// Liveness probe of the auth service.
    ///
    /// Used by the binaries' readiness endpoints; transport errors are
    /// reported as "not ready" rather than propagated.
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.inner.endpoint);
        match self.inner.http.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                warn!(error = %error, "auth health probe failed");
                false
            }
        }
    }

    /// Exchange an email/password pair for a credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the pair is rejected,
    /// `AuthError::Http`/`Api` for transport and service failures.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let url = format!("{}/token?grant_type=password", self.inner.endpoint);
        let response = self
            .request(self.inner.http.post(url))
            .json(&json!({ "email": email.as_str(), "password": password }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            debug!(status = %status, "password grant rejected");
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Mint a fresh credential from a refresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` when the refresh token is expired
    /// or revoked; callers must clear their cached credential in that case.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let url = format!("{}/token?grant_type=refresh_token", self.inner.endpoint);
        let response = self
            .request(self.inner.http.post(url))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Create an account.
    ///
    /// The requested sector and phone are recorded as sign-up metadata only;
    /// the application profile is created separately with the retail default
    /// and an admin promotes resellers explicitly.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` or `AuthError::WeakPassword`
    /// when the service rejects the sign-up, transport/API errors otherwise.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        sector: Sector,
        phone: Option<&str>,
    ) -> Result<SignUpOutcome, AuthError> {
        let url = format!("{}/signup", self.inner.endpoint);
        let metadata = UserMetadata {
            sector: Some(sector),
            phone: phone.map(ToOwned::to_owned),
        };
        let response = self
            .request(self.inner.http.post(url))
            .json(&json!({
                "email": email.as_str(),
                "password": password,
                "data": metadata,
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = ApiErrorBody::decode(&body).into_message();
            let lowered = message.to_lowercase();
            if lowered.contains("already") && lowered.contains("register") {
                return Err(AuthError::UserAlreadyExists);
            }
            if lowered.contains("password") {
                return Err(AuthError::WeakPassword(message));
            }
            return Err(api_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Look up the identity behind an access token.
    ///
    /// Returns `Ok(None)` when the token is rejected - a stale credential is
    /// indistinguishable from "signed out" for resolution purposes.
    ///
    /// # Errors
    ///
    /// Returns transport and unexpected-status errors only.
    #[instrument(skip(self, access_token))]
    pub async fn current_user(&self, access_token: &str) -> Result<Option<Identity>, AuthError> {
        let url = format!("{}/user", self.inner.endpoint);
        let response = self
            .request(self.inner.http.get(url))
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("access token rejected, treating as signed out");
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Revoke a credential.
    ///
    /// # Errors
    ///
    /// Returns transport errors; an already-invalid token is not an error.
    #[instrument(skip(self, access_token))]
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = format!("{}/logout", self.inner.endpoint);
        let response = self
            .request(self.inner.http.post(url))
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::UNAUTHORIZED {
            let body = response.text().await?;
            return Err(api_error(status, &body));
        }

        Ok(())
    }

    /// Build the OAuth authorize URL for an external provider.
    ///
    /// The caller redirects the browser there; the provider calls back to
    /// `redirect_to` with a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint does not form a valid URL.
    pub fn authorize_url(&self, provider: &str, redirect_to: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}/authorize", self.inner.endpoint))?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to);
        Ok(url)
    }

    // =========================================================================
    // Admin surface (service-role key required)
    // =========================================================================

    /// Create a user directly, bypassing email confirmation.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingServiceKey` when no service-role key is
    /// configured; service rejections otherwise.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn admin_create_user(
        &self,
        email: &Email,
        password: &str,
        metadata: &UserMetadata,
    ) -> Result<Identity, AuthError> {
        let service_key = self.service_key()?;
        let url = format!("{}/admin/users", self.inner.endpoint);
        let response = self
            .request(self.inner.http.post(url))
            .bearer_auth(service_key.expose_secret())
            .json(&json!({
                "email": email.as_str(),
                "password": password,
                "email_confirm": true,
                "user_metadata": metadata,
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::CONFLICT {
            return Err(AuthError::UserAlreadyExists);
        }
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Delete a user and everything keyed to it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingServiceKey` without a service-role key;
    /// service rejections otherwise. Deleting an unknown user is not an
    /// error - the end state is the same.
    #[instrument(skip(self))]
    pub async fn admin_delete_user(&self, user_id: UserId) -> Result<(), AuthError> {
        let service_key = self.service_key()?;
        let url = format!("{}/admin/users/{user_id}", self.inner.endpoint);
        let response = self
            .request(self.inner.http.delete(url))
            .bearer_auth(service_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let body = response.text().await?;
            return Err(api_error(status, &body));
        }

        Ok(())
    }

    /// Attach the publishable key header every auth request carries.
    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.header("apikey", &self.inner.anon_key)
    }

    fn service_key(&self) -> Result<&SecretString, AuthError> {
        self.inner
            .service_key
            .as_ref()
            .ok_or(AuthError::MissingServiceKey)
    }
}

/// Map a non-success auth response to `AuthError::Api`.
fn api_error(status: StatusCode, raw_body: &str) -> AuthError {
    AuthError::Api {
        status: status.as_u16(),
        message: ApiErrorBody::decode(raw_body).into_message(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> AuthClient {
        let config = PlatformConfig::new("https://db.example.com", "anon".to_owned(), None)
            .expect("valid config");
        AuthClient::new(&config)
    }

    #[test]
    fn test_authorize_url_shape() {
        let url = client()
            .authorize_url("google", "https://shop.example.com/auth/callback")
            .unwrap();

        assert_eq!(url.path(), "/auth/v1/authorize");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("provider".to_owned(), "google".to_owned())));
        assert!(pairs.contains(&(
            "redirect_to".to_owned(),
            "https://shop.example.com/auth/callback".to_owned()
        )));
    }

    #[test]
    fn test_admin_calls_require_service_key() {
        let err = client().service_key().unwrap_err();
        assert!(matches!(err, AuthError::MissingServiceKey));
    }

    #[test]
    fn test_debug_redacts_service_key() {
        let config = PlatformConfig::new(
            "https://db.example.com",
            "anon".to_owned(),
            Some(SecretString::from("service-role-secret")),
        )
        .unwrap();
        let debug_output = format!("{:?}", AuthClient::new(&config));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("service-role-secret"));
    }
}
