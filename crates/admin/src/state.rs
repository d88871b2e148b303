//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::time::Instant;
use tracing::debug;

use vitrine_platform::auth::{AuthClient, AuthEvent};
use vitrine_platform::rest::RestClient;
use vitrine_platform::session::{IdentityGateway, ProfileGateway, SessionResolver};
use vitrine_platform::{Catalog, ProfileStore};

use crate::config::AdminConfig;

/// Idle time after which an operator's resolver is torn down.
const IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// How often the sweeper looks for idle resolvers.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the platform clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    auth: AuthClient,
    catalog: Catalog,
    profiles: Arc<ProfileStore>,
    resolvers: Mutex<HashMap<String, ResolverEntry>>,
}

struct ResolverEntry {
    resolver: Arc<SessionResolver>,
    last_seen: Instant,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let auth = AuthClient::new(&config.platform);
        let rest = RestClient::new(&config.platform);
        let catalog = Catalog::new(rest.clone());
        let profiles = Arc::new(ProfileStore::new(rest, auth.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                catalog,
                profiles,
                resolvers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
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

    /// Get the resolver for an operator session, spawning one on first sight.
    ///
    /// # Panics
    ///
    /// Panics if the resolver map lock is poisoned.
    #[must_use]
    pub fn obtain_resolver(
        &self,
        key: &str,
        identity: Arc<dyn IdentityGateway>,
    ) -> Arc<SessionResolver> {
        let mut entries = self.inner.resolvers.lock().expect("resolver map poisoned");
        let entry = entries.entry(key.to_owned()).or_insert_with(|| {
            debug!(session = %key, "spawning operator session resolver");
            ResolverEntry {
                resolver: Arc::new(SessionResolver::spawn(
                    identity,
                    Arc::clone(&self.inner.profiles) as Arc<dyn ProfileGateway>,
                    self.inner.config.resolve_timeout,
                )),
                last_seen: Instant::now(),
            }
        });
        entry.last_seen = Instant::now();
        Arc::clone(&entry.resolver)
    }

    /// Deliver an auth transition to an operator session's resolver.
    ///
    /// # Panics
    ///
    /// Panics if the resolver map lock is poisoned.
    pub fn notify_resolver(&self, key: &str, event: AuthEvent) {
        let entries = self.inner.resolvers.lock().expect("resolver map poisoned");
        if let Some(entry) = entries.get(key) {
            entry.resolver.notify(event);
        }
    }

    /// Tear down and forget an operator session's resolver.
    ///
    /// # Panics
    ///
    /// Panics if the resolver map lock is poisoned.
    pub fn remove_resolver(&self, key: &str) {
        let removed = self
            .inner
            .resolvers
            .lock()
            .expect("resolver map poisoned")
            .remove(key);
        if let Some(entry) = removed {
            entry.resolver.teardown();
        }
    }

    /// Spawn the background task that evicts idle resolvers.
    pub fn start_resolver_sweeper(&self) {
        let state = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                let mut entries = state.inner.resolvers.lock().expect("resolver map poisoned");
                entries.retain(|key, entry| {
                    let keep = entry.last_seen.elapsed() < IDLE_TTL;
                    if !keep {
                        entry.resolver.teardown();
                        debug!(session = %key, "evicting idle operator resolver");
                    }
                    keep
                });
            }
        });
    }
}
