//! Application state shared across handlers.

use std::sync::Arc;

use vitrine_platform::auth::AuthClient;
use vitrine_platform::rest::RestClient;
use vitrine_platform::{Catalog, ProfileStore};

use crate::config::StorefrontConfig;
use crate::services::resolvers::ResolverRegistry;
use crate::services::whatsapp::WhatsAppHandoff;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the platform clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    auth: AuthClient,
    catalog: Catalog,
    profiles: Arc<ProfileStore>,
    resolvers: ResolverRegistry,
    whatsapp: WhatsAppHandoff,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let auth = AuthClient::new(&config.platform);
        let rest = RestClient::new(&config.platform);
        let catalog = Catalog::new(rest.clone());
        let profiles = Arc::new(ProfileStore::new(rest, auth.clone()));
        let resolvers = ResolverRegistry::new(config.resolve_timeout);
        let whatsapp = WhatsAppHandoff::new(&config.whatsapp_number, &config.whatsapp_greeting);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                catalog,
                profiles,
                resolvers,
                whatsapp,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the auth-service client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the catalog facade.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the profile facade.
    #[must_use]
    pub fn profiles(&self) -> &Arc<ProfileStore> {
        &self.inner.profiles
    }

    /// Get a reference to the per-session resolver registry.
    #[must_use]
    pub fn resolvers(&self) -> &ResolverRegistry {
        &self.inner.resolvers
    }

    /// Get a reference to the WhatsApp handoff link builder.
    #[must_use]
    pub fn whatsapp(&self) -> &WhatsAppHandoff {
        &self.inner.whatsapp
    }
}
