use crate::app::{Effect, MutationKind, Msg};
use crate::domain::TaskId;
use crate::store::{RemoteStore, StoreError};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How the subscription is re-established after it drops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectPolicy {
    /// Resubscribe attempts before giving up (0 disables reconnecting)
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_ms: 250,
            max_backoff_ms: 8000,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based), doubling each time
    /// up to the cap. None once attempts are exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_attempts {
            return None;
        }
        let factor = 1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Some(Duration::from_millis(ms))
    }
}

/// Bridges the store and the UI thread.
///
/// Snapshots and failure reports travel to the UI as `Msg`s over `events`;
/// the UI never waits on the store.
pub struct SyncLayer {
    store: Arc<dyn RemoteStore>,
    events: mpsc::Sender<Msg>,
    policy: ReconnectPolicy,
}

impl SyncLayer {
    pub fn new(store: Arc<dyn RemoteStore>, events: mpsc::Sender<Msg>, policy: ReconnectPolicy) -> Self {
        Self { store, events, policy }
    }

    /// Open the one long-lived subscription on a background thread
    pub fn start(&self) -> io::Result<JoinHandle<()>> {
        let store = Arc::clone(&self.store);
        let events = self.events.clone();
        let policy = self.policy.clone();

        thread::Builder::new()
            .name("sync-subscription".to_string())
            .spawn(move || run_subscription(store.as_ref(), &events, &policy))
    }

    /// Run one mutation in the background; the UI learns the outcome from the next snapshot
    pub fn execute(&self, effect: Effect) -> io::Result<JoinHandle<()>> {
        let store = Arc::clone(&self.store);
        let events = self.events.clone();
        debug!(?effect, "dispatching mutation");

        thread::Builder::new()
            .name("sync-mutation".to_string())
            .spawn(move || run_effect(store.as_ref(), effect, &events))
    }
}

/// Mutation threads started by the UI that have not been joined yet
#[derive(Default)]
pub struct PendingMutations {
    handles: Vec<JoinHandle<()>>,
}

impl PendingMutations {
    pub fn push(&mut self, handle: JoinHandle<()>) {
        self.handles.push(handle);
    }

    /// Forget threads that already finished
    pub fn prune(&mut self) {
        self.handles.retain(|h| !h.is_finished());
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Block until every outstanding mutation settles; returns how many threads panicked
    pub fn join_all(self) -> usize {
        let mut panicked = 0;
        for handle in self.handles {
            if handle.join().is_err() {
                error!("mutation thread panicked");
                panicked += 1;
            }
        }
        panicked
    }
}

/// Forward snapshots until the subscription is lost and reconnects are exhausted
fn run_subscription(store: &dyn RemoteStore, events: &mpsc::Sender<Msg>, policy: &ReconnectPolicy) {
    let mut attempt = 0u32;
    let mut last_error = StoreError::Closed.to_string();

    loop {
        match store.subscribe() {
            Ok(stream) => {
                info!(attempt, "subscription open");
                last_error = StoreError::Closed.to_string();
                for item in stream {
                    match item {
                        Ok(snapshot) => {
                            attempt = 0;
                            debug!(tasks = snapshot.len(), "snapshot received");
                            if events.send(Msg::SnapshotReceived(snapshot)).is_err() {
                                // UI is gone
                                return;
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "subscription failed");
                            last_error = e.to_string();
                            break;
                        }
                    }
                }
                warn!("subscription dropped");
            }
            Err(e) => {
                error!(error = %e, attempt, "failed to subscribe");
                last_error = e.to_string();
            }
        }

        attempt += 1;
        match policy.delay_for(attempt) {
            Some(delay) => {
                info!(attempt, ?delay, "resubscribing");
                thread::sleep(delay);
            }
            None => {
                error!(
                    attempts = attempt - 1,
                    reason = %last_error,
                    "subscription lost, list will no longer update"
                );
                let _ = events.send(Msg::SubscriptionLost { reason: last_error });
                return;
            }
        }
    }
}

fn run_effect(store: &dyn RemoteStore, effect: Effect, events: &mpsc::Sender<Msg>) {
    match effect {
        Effect::Create(record) => match store.create(record) {
            Ok(id) => debug!(%id, "created task"),
            Err(e) => report_failure(events, MutationKind::Create, None, &e),
        },
        Effect::Update { id, patch } => match store.update(&id, &patch) {
            Ok(()) => debug!(%id, ?patch, "updated task"),
            Err(e) => report_failure(events, MutationKind::Update, Some(id), &e),
        },
        Effect::Delete(id) => match store.delete(&id) {
            Ok(()) => debug!(%id, "deleted task"),
            Err(e) => report_failure(events, MutationKind::Delete, Some(id), &e),
        },
        Effect::DeleteAll(ids) => {
            // Each delete targets a distinct id, so they run unordered
            thread::scope(|s| {
                for id in &ids {
                    s.spawn(move || match store.delete(id) {
                        Ok(()) => debug!(%id, "deleted task"),
                        Err(e) => report_failure(events, MutationKind::Delete, Some(id.clone()), &e),
                    });
                }
            });
            info!(count = ids.len(), "clear completed settled");
        }
    }
}

fn report_failure(events: &mpsc::Sender<Msg>, kind: MutationKind, id: Option<TaskId>, e: &StoreError) {
    error!(op = ?kind, id = ?id, error = %e, "store mutation failed");
    let _ = events.send(Msg::MutationFailed { kind, id });
}
