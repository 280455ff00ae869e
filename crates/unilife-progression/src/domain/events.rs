//! Domain events for the Progression context.

use serde::{Deserialize, Serialize};
use unilife_content::domain::stage::{EndingPath, Stage};
use unilife_core::event::{DomainEvent, EventMetadata};
use uuid::Uuid;

/// Emitted when a session is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStarted {
    /// The session identifier.
    pub session_id: Uuid,
}

/// Emitted when a scanned stage is admitted and marked complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCompleted {
    /// The session identifier.
    pub session_id: Uuid,
    /// The completed stage.
    pub stage: Stage,
}

/// Emitted together with the books `StageCompleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooksStudied {
    /// The session identifier.
    pub session_id: Uuid,
}

/// Emitted once per run when the beer stage resolves the ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingReached {
    /// The session identifier.
    pub session_id: Uuid,
    /// The chosen ending.
    pub path: EndingPath,
}

/// Emitted when the player restarts the story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReset {
    /// The session identifier.
    pub session_id: Uuid,
}

/// Event payload variants for the Progression context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionEventKind {
    /// A session has been created.
    SessionStarted(SessionStarted),
    /// A stage has been completed.
    StageCompleted(StageCompleted),
    /// The books side quest has been visited.
    BooksStudied(BooksStudied),
    /// The ending path has been chosen.
    EndingReached(EndingReached),
    /// All progress has been cleared.
    ProgressReset(ProgressReset),
}

impl ProgressionEventKind {
    /// Returns the event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted(_) => "progress.session_started",
            Self::StageCompleted(_) => "progress.stage_completed",
            Self::BooksStudied(_) => "progress.books_studied",
            Self::EndingReached(_) => "progress.ending_reached",
            Self::ProgressReset(_) => "progress.reset",
        }
    }
}

/// Domain event envelope for the Progression context.
#[derive(Debug, Clone)]
pub struct ProgressionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ProgressionEventKind,
}

impl DomainEvent for ProgressionEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ProgressionEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
