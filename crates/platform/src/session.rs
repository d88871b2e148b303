//! Session resolution with a bounded wait.
//!
//! A [`SessionResolver`] establishes the current identity/profile pair once
//! at spawn and again on every auth transition, and guarantees that
//! consumers are never left waiting on a slow or dead backend: the snapshot's
//! `resolving` flag drops to `false` within the configured timeout no matter
//! what.
//!
//! # The race
//!
//! Three triggers compete to end the resolving phase:
//!
//! 1. the initial identity fetch (followed by a profile fetch, creating the
//!    default profile row if the identity has none),
//! 2. the first auth event delivered through [`SessionResolver::notify`],
//! 3. the timeout.
//!
//! The first to complete wins and clears `resolving`. Later completions
//! still update identity/profile data but never flip `resolving` back - the
//! flag is monotonic for the lifetime of a resolver. In particular, an
//! identity fetch that loses to the timeout keeps running and its result is
//! applied when it lands.
//!
//! # Failure policy
//!
//! Backend failures during resolution degrade to the signed-out view instead
//! of surfacing. Callers that need privileges must positively check
//! `profile.is_admin` or `profile.sector` on the snapshot; an absent profile
//! means "guest", never "trusted".
//!
//! # Teardown
//!
//! Dropping the resolver (or calling [`SessionResolver::teardown`]) cancels
//! the timer, the event subscription, and any in-flight fetch. A backend
//! response that arrives afterwards is discarded; the snapshot is never
//! written again.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use vitrine_core::{Sector, UserId};

use crate::auth::{AuthClient, AuthError, AuthEvent, Identity};
use crate::error::PlatformError;
use crate::records::Profile;

/// Default bound on the resolving phase.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_millis(2500);

/// Point-in-time view of the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// The authenticated identity, when one is known.
    pub identity: Option<Identity>,
    /// The identity's application profile, when one is known.
    pub profile: Option<Profile>,
    /// True until the first of the three resolution triggers completes.
    pub resolving: bool,
}

impl SessionSnapshot {
    /// True when an identity has been established.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Positive admin check; an absent profile is never an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.profile.as_ref().is_some_and(|p| p.is_admin)
    }

    /// The viewer's pricing sector, when a profile is known.
    #[must_use]
    pub fn sector(&self) -> Option<Sector> {
        self.profile.as_ref().map(|p| p.sector)
    }
}

/// Source of the current identity for one session.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Fetch the currently-authenticated identity, if any.
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError>;
}

/// Profile reads and lazy default creation used during resolution.
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    /// Fetch the profile for an identity, if one exists.
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Profile>, PlatformError>;

    /// Create the default (retail, unprivileged) profile for an identity.
    async fn create_default(&self, identity: &Identity) -> Result<Profile, PlatformError>;
}

/// An [`IdentityGateway`] bound to one bearer token.
///
/// This is what the binaries hand to a resolver for a browser session whose
/// tokens they hold.
#[derive(Debug, Clone)]
pub struct BearerIdentity {
    auth: AuthClient,
    access_token: String,
}

impl BearerIdentity {
    /// Bind an auth client to an access token.
    #[must_use]
    pub const fn new(auth: AuthClient, access_token: String) -> Self {
        Self { auth, access_token }
    }
}

#[async_trait]
impl IdentityGateway for BearerIdentity {
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        self.auth.current_user(&self.access_token).await
    }
}

/// Resolves and tracks one session's identity/profile pair.
///
/// Consumers read snapshots; they never re-run the resolution race
/// themselves. The resolver owns a single background task that is the only
/// writer of the snapshot.
#[derive(Debug)]
pub struct SessionResolver {
    snapshot: watch::Receiver<SessionSnapshot>,
    events: broadcast::Sender<AuthEvent>,
    task: JoinHandle<()>,
}

impl SessionResolver {
    /// Spawn a resolver.
    ///
    /// Resolution starts immediately; `timeout` bounds how long snapshots
    /// can report `resolving = true`.
    #[must_use]
    pub fn spawn(
        identity: Arc<dyn IdentityGateway>,
        profiles: Arc<dyn ProfileGateway>,
        timeout: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(SessionSnapshot {
            resolving: true,
            ..SessionSnapshot::default()
        });
        let (events_tx, events_rx) = broadcast::channel(16);

        let task = tokio::spawn(run(tx, events_rx, identity, profiles, timeout));

        Self {
            snapshot: rx,
            events: events_tx,
            task,
        }
    }

    /// The current snapshot, without waiting.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Watch snapshot updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }

    /// Wait until the resolving phase has ended and return the snapshot.
    ///
    /// Bounded by the spawn timeout: this never waits longer than the
    /// configured maximum, even when the backend never answers.
    pub async fn resolved(&self) -> SessionSnapshot {
        let mut rx = self.snapshot.clone();
        loop {
            {
                let snap = rx.borrow_and_update();
                if !snap.resolving {
                    return snap.clone();
                }
            }
            if rx.changed().await.is_err() {
                // Resolver torn down mid-wait; report what we have.
                return rx.borrow().clone();
            }
        }
    }

    /// Deliver an auth transition to this resolver.
    ///
    /// Sign-in and token-refresh events re-resolve the profile for the new
    /// identity (creating the default row on first sign-in); sign-out clears
    /// both identity and profile.
    pub fn notify(&self, event: AuthEvent) {
        // An error here means the task is gone (torn down); nothing to do.
        let _ = self.events.send(event);
    }

    /// Stop the resolver: cancel the timer and the event subscription and
    /// discard any in-flight fetch. The snapshot is never written after
    /// this returns.
    pub fn teardown(&self) {
        self.task.abort();
    }
}

impl Drop for SessionResolver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The resolver task: single writer of the snapshot.
async fn run(
    state: watch::Sender<SessionSnapshot>,
    mut events: broadcast::Receiver<AuthEvent>,
    identity: Arc<dyn IdentityGateway>,
    profiles: Arc<dyn ProfileGateway>,
    timeout: Duration,
) {
    let initial = initial_resolution(identity, Arc::clone(&profiles));
    tokio::pin!(initial);
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    let mut initial_pending = true;
    let mut deadline_pending = true;

    loop {
        tokio::select! {
            (ident, profile) = &mut initial, if initial_pending => {
                initial_pending = false;
                state.send_modify(|snap| {
                    snap.identity = ident;
                    snap.profile = profile;
                    snap.resolving = false;
                });
            }
            () = &mut deadline, if deadline_pending => {
                deadline_pending = false;
                if state.borrow().resolving {
                    warn!(
                        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        "session resolution timed out, proceeding as signed out"
                    );
                    state.send_modify(|snap| snap.resolving = false);
                }
            }
            event = events.recv() => {
                match event {
                    Ok(AuthEvent::SignedOut) => {
                        state.send_modify(|snap| {
                            snap.identity = None;
                            snap.profile = None;
                            snap.resolving = false;
                        });
                    }
                    Ok(AuthEvent::SignedIn(ident) | AuthEvent::TokenRefreshed(ident)) => {
                        let profile = ensure_profile(profiles.as_ref(), &ident).await;
                        state.send_modify(|snap| {
                            snap.identity = Some(ident);
                            snap.profile = profile;
                            snap.resolving = false;
                        });
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session resolver lagged behind auth events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

/// The identity-fetch path: credential, then profile.
///
/// Failures degrade to the signed-out view.
async fn initial_resolution(
    identity: Arc<dyn IdentityGateway>,
    profiles: Arc<dyn ProfileGateway>,
) -> (Option<Identity>, Option<Profile>) {
    let ident = match identity.current_identity().await {
        Ok(ident) => ident,
        Err(error) => {
            warn!(error = %error, "identity fetch failed, treating as signed out");
            None
        }
    };

    match ident {
        Some(ident) => {
            let profile = ensure_profile(profiles.as_ref(), &ident).await;
            (Some(ident), profile)
        }
        None => (None, None),
    }
}

/// Fetch the profile for an identity, creating the default row if absent.
///
/// Creating the row here keeps a permanently missing profile from
/// re-triggering creation attempts on every later resolution.
async fn ensure_profile(profiles: &dyn ProfileGateway, identity: &Identity) -> Option<Profile> {
    match profiles.find_by_user(identity.id).await {
        Ok(Some(profile)) => Some(profile),
        Ok(None) => match profiles.create_default(identity).await {
            Ok(profile) => Some(profile),
            Err(error) => {
                warn!(error = %error, user_id = %identity.id, "default profile creation failed");
                None
            }
        },
        Err(error) => {
            warn!(error = %error, user_id = %identity.id, "profile fetch failed");
            None
        }
    }
}
