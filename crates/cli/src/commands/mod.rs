//! CLI command implementations.

pub mod admin;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

use vitrine_platform::PlatformConfig;
use vitrine_platform::config::PlatformConfigError;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid platform configuration: {0}")]
    Platform(#[from] PlatformConfigError),
}

/// Platform connection from the environment; the service-role key is
/// required for everything the CLI does.
pub fn platform_from_env() -> Result<PlatformConfig, CommandError> {
    let _ = dotenvy::dotenv();

    let url = required("PLATFORM_URL")?;
    let anon_key = required("PLATFORM_ANON_KEY")?;
    let service_key = SecretString::from(required("PLATFORM_SERVICE_KEY")?);

    Ok(PlatformConfig::new(&url, anon_key, Some(service_key))?)
}

fn required(key: &str) -> Result<String, CommandError> {
    std::env::var(key).map_err(|_| CommandError::MissingEnvVar(key.to_owned()))
}
