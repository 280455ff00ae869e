//! Shared application state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::OwnedMutexGuard;
use tracing::debug;
use unilife_content::domain::story_book::StoryBook;
use unilife_core::clock::Clock;
use unilife_core::repository::EventRepository;
use unilife_progression::domain::presentation::{DeferredCommand, PresentationCommand};
use uuid::Uuid;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for event timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Session event streams.
    pub event_repository: Arc<dyn EventRepository>,
    /// The compiled story, immutable after startup.
    pub story: Arc<StoryBook>,
    /// Commands waiting for their delay to pass or for the client to collect.
    pub outbox: Arc<DeferredOutbox>,
    /// Serializes commands per session.
    pub session_locks: Arc<SessionLocks>,
}

impl AppState {
    /// Create new application state with an empty outbox.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        event_repository: Arc<dyn EventRepository>,
        story: Arc<StoryBook>,
    ) -> Self {
        Self {
            clock,
            event_repository,
            story,
            outbox: Arc::new(DeferredOutbox::default()),
            session_locks: Arc::new(SessionLocks::default()),
        }
    }
}

/// One async lock per session, so a session's events are handled one at a
/// time and in arrival order.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionLocks {
    /// Waits until no other command holds `session_id`. The session is
    /// released when the guard drops.
    pub async fn acquire(&self, session_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(
            self.locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(session_id)
                .or_default(),
        );
        lock.lock_owned().await
    }
}

/// How long an uncollected command stays queued.
pub const OUTBOX_RETENTION: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct Pending {
    queued_at: Instant,
    commands: Vec<PresentationCommand>,
}

/// Per-session queue of presentation commands delivered after a delay.
///
/// Commands nobody collects within the retention window are dropped the next
/// time anything is queued.
#[derive(Debug)]
pub struct DeferredOutbox {
    pending: Mutex<HashMap<Uuid, Pending>>,
    retention: Duration,
}

impl Default for DeferredOutbox {
    fn default() -> Self {
        Self::with_retention(OUTBOX_RETENTION)
    }
}

impl DeferredOutbox {
    /// An empty outbox that keeps uncollected commands for `retention`.
    #[must_use]
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            retention,
        }
    }

    /// Queues `command` for `session_id` immediately.
    pub fn push(&self, session_id: Uuid, command: PresentationCommand) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let before = pending.len();
        pending.retain(|_, entry| entry.queued_at.elapsed() <= self.retention);
        if pending.len() < before {
            debug!(pruned = before - pending.len(), "dropped uncollected commands");
        }

        let entry = pending.entry(session_id).or_insert_with(|| Pending {
            queued_at: Instant::now(),
            commands: Vec::new(),
        });
        entry.queued_at = Instant::now();
        entry.commands.push(command);
    }

    /// Removes and returns everything queued for `session_id`.
    pub fn drain(&self, session_id: Uuid) -> Vec<PresentationCommand> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&session_id)
            .map(|entry| entry.commands)
            .unwrap_or_default()
    }

    /// Number of sessions with commands waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no session has commands waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queues `deferred.command` once `deferred.delay` has elapsed. Must be
    /// called from within a Tokio runtime.
    pub fn schedule(self: &Arc<Self>, session_id: Uuid, deferred: DeferredCommand) {
        let outbox = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(deferred.delay).await;
            debug!(%session_id, "delivering deferred command");
            outbox.push(session_id, deferred.command);
        });
    }
}
