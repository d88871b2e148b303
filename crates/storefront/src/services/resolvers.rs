//! Per-browser-session resolver registry.
//!
//! Each browser session gets exactly one [`SessionResolver`], spawned on the
//! first request that carries that session's credential and torn down on
//! sign-out or after sitting idle. Handlers read snapshots from the registry
//! instead of re-running the resolution race themselves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use vitrine_platform::auth::AuthEvent;
use vitrine_platform::session::{IdentityGateway, ProfileGateway, SessionResolver};

/// How often the sweeper looks for idle resolvers.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Idle time after which a resolver is torn down.
const IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct Entry {
    resolver: Arc<SessionResolver>,
    last_seen: Instant,
}

/// Registry of live resolvers keyed by browser-session id.
#[derive(Clone)]
pub struct ResolverRegistry {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    resolve_timeout: Duration,
}

impl ResolverRegistry {
    /// Create an empty registry.
    ///
    /// `resolve_timeout` bounds each resolver's resolving phase.
    #[must_use]
    pub fn new(resolve_timeout: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            resolve_timeout,
        }
    }

    /// Get the resolver for a session, spawning one on first sight.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    #[must_use]
    pub fn obtain(
        &self,
        key: &str,
        identity: Arc<dyn IdentityGateway>,
        profiles: Arc<dyn ProfileGateway>,
    ) -> Arc<SessionResolver> {
        let mut entries = self.entries.lock().expect("resolver registry poisoned");
        let entry = entries.entry(key.to_owned()).or_insert_with(|| {
            debug!(session = %key, "spawning session resolver");
            Entry {
                resolver: Arc::new(SessionResolver::spawn(
                    identity,
                    profiles,
                    self.resolve_timeout,
                )),
                last_seen: Instant::now(),
            }
        });
        entry.last_seen = Instant::now();
        Arc::clone(&entry.resolver)
    }

    /// Deliver an auth transition to a session's resolver, if it is live.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    pub fn notify(&self, key: &str, event: AuthEvent) {
        let entries = self.entries.lock().expect("resolver registry poisoned");
        if let Some(entry) = entries.get(key) {
            entry.resolver.notify(event);
        }
    }

    /// Tear down and forget a session's resolver.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    pub fn remove(&self, key: &str) {
        let removed = self
            .entries
            .lock()
            .expect("resolver registry poisoned")
            .remove(key);
        if let Some(entry) = removed {
            entry.resolver.teardown();
            debug!(session = %key, "session resolver torn down");
        }
    }

    /// Number of live resolvers.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("resolver registry poisoned").len()
    }

    /// True when no resolver is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn the background task that evicts idle resolvers.
    pub fn start_sweeper(&self) {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                registry.sweep(IDLE_TTL);
            }
        });
    }

    fn sweep(&self, idle_ttl: Duration) {
        let mut entries = self.entries.lock().expect("resolver registry poisoned");
        let before = entries.len();
        entries.retain(|key, entry| {
            let keep = entry.last_seen.elapsed() < idle_ttl;
            if !keep {
                entry.resolver.teardown();
                debug!(session = %key, "evicting idle session resolver");
            }
            keep
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "resolver sweep complete");
        }
    }
}
