//! Aggregate roots for the Progression context.

use unilife_content::domain::stage::{EndingPath, Stage};
use unilife_core::aggregate::AggregateRoot;
use unilife_core::clock::Clock;
use unilife_core::event::EventMetadata;
use uuid::Uuid;

use super::events::{
    BooksStudied, EndingReached, ProgressReset, ProgressionEvent, ProgressionEventKind,
    SessionStarted, StageCompleted,
};
use super::state::ProgressState;

/// The aggregate root for one player's progression session.
///
/// Owns exactly one [`ProgressState`]; every mutation is recorded as an event
/// and applied to the state immediately, so the engine always reads current
/// progress.
#[derive(Debug)]
pub struct ProgressSession {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Number of persisted events replayed.
    pub(crate) version: i64,
    state: ProgressState,
    uncommitted_events: Vec<ProgressionEvent>,
}

impl ProgressSession {
    /// Creates a session with creation-default progress.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            state: ProgressState::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Current progress.
    #[must_use]
    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    fn record(&mut self, kind: ProgressionEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = ProgressionEvent {
            metadata: EventMetadata::record(
                self.id,
                kind.event_type(),
                self.next_sequence_number(),
                correlation_id,
                clock.now(),
            ),
            kind,
        };

        mutate(&mut self.state, &event.kind);
        self.uncommitted_events.push(event);
    }

    /// Records the creation of this session.
    pub fn start(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        let kind = ProgressionEventKind::SessionStarted(SessionStarted {
            session_id: self.id,
        });
        self.record(kind, correlation_id, clock);
    }

    /// Marks `stage` complete.
    pub fn complete_stage(&mut self, stage: Stage, correlation_id: Uuid, clock: &dyn Clock) {
        let kind = ProgressionEventKind::StageCompleted(StageCompleted {
            session_id: self.id,
            stage,
        });
        self.record(kind, correlation_id, clock);
    }

    /// Records that the books side quest was visited.
    pub fn study_books(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        let kind = ProgressionEventKind::BooksStudied(BooksStudied {
            session_id: self.id,
        });
        self.record(kind, correlation_id, clock);
    }

    /// Records the chosen ending.
    pub fn reach_ending(&mut self, path: EndingPath, correlation_id: Uuid, clock: &dyn Clock) {
        let kind = ProgressionEventKind::EndingReached(EndingReached {
            session_id: self.id,
            path,
        });
        self.record(kind, correlation_id, clock);
    }

    /// Clears all progress.
    pub fn reset(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        let kind = ProgressionEventKind::ProgressReset(ProgressReset {
            session_id: self.id,
        });
        self.record(kind, correlation_id, clock);
    }
}

fn mutate(state: &mut ProgressState, kind: &ProgressionEventKind) {
    match kind {
        ProgressionEventKind::SessionStarted(_) => {}
        ProgressionEventKind::StageCompleted(payload) => {
            state.mark_stage_complete(payload.stage.index());
        }
        ProgressionEventKind::BooksStudied(_) => state.set_studied_books(true),
        ProgressionEventKind::EndingReached(payload) => {
            state.set_ending_path(Some(payload.path));
        }
        ProgressionEventKind::ProgressReset(_) => state.reset(),
    }
}

impl AggregateRoot for ProgressSession {
    type Event = ProgressionEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        mutate(&mut self.state, &event.kind);
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }
}
