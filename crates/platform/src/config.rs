//! Connection settings for the hosted platform.
//!
//! The binaries load these values from their own environment (see each
//! binary's `config.rs`); this module only defines the validated shape.

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Errors constructing a [`PlatformConfig`].
#[derive(Debug, Error)]
pub enum PlatformConfigError {
    /// The base URL could not be parsed.
    #[error("invalid platform URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The base URL must use http or https.
    #[error("platform URL must be http(s), got {0:?}")]
    UnsupportedScheme(String),
}

/// Connection settings for the platform's auth and table APIs.
///
/// Implements `Debug` manually to redact the service-role key. The anon key
/// is a publishable client key and is not treated as a secret.
#[derive(Clone)]
pub struct PlatformConfig {
    base_url: Url,
    anon_key: String,
    service_key: Option<SecretString>,
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("base_url", &self.base_url.as_str())
            .field("anon_key", &self.anon_key)
            .field(
                "service_key",
                &self.service_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl PlatformConfig {
    /// Create a config from a base URL and API keys.
    ///
    /// The service-role key is optional: the public storefront runs without
    /// one, the admin binary and CLI require it for the auth admin surface.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid http(s) URL.
    pub fn new(
        base_url: &str,
        anon_key: String,
        service_key: Option<SecretString>,
    ) -> Result<Self, PlatformConfigError> {
        let base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            other => return Err(PlatformConfigError::UnsupportedScheme(other.to_owned())),
        }

        Ok(Self {
            base_url,
            anon_key,
            service_key,
        })
    }

    /// Root endpoint of the auth service (`{base}/auth/v1`).
    #[must_use]
    pub fn auth_endpoint(&self) -> String {
        format!("{}auth/v1", self.base_url)
    }

    /// Root endpoint of the table API (`{base}/rest/v1`).
    #[must_use]
    pub fn rest_endpoint(&self) -> String {
        format!("{}rest/v1", self.base_url)
    }

    /// The publishable client key, sent as `apikey` on every request.
    #[must_use]
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// The service-role key, if configured.
    #[must_use]
    pub fn service_key(&self) -> Option<&SecretString> {
        self.service_key.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_join_cleanly() {
        let config =
            PlatformConfig::new("https://db.example.com/", "anon".to_owned(), None).unwrap();
        assert_eq!(config.auth_endpoint(), "https://db.example.com/auth/v1");
        assert_eq!(config.rest_endpoint(), "https://db.example.com/rest/v1");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = PlatformConfig::new("ftp://db.example.com", "anon".to_owned(), None);
        assert!(matches!(
            result,
            Err(PlatformConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_debug_redacts_service_key() {
        let config = PlatformConfig::new(
            "https://db.example.com",
            "anon-key-value".to_owned(),
            Some(SecretString::from("super-secret-service-key")),
        )
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("anon-key-value"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-service-key"));
    }
}
