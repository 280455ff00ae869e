//! Command handlers for the Progression context.
//!
//! Each handler loads the session's event history, replays it, runs the
//! engine for one command and appends whatever the engine recorded.

use unilife_content::domain::story_book::StoryBook;
use unilife_core::aggregate::AggregateRoot;
use unilife_core::clock::Clock;
use unilife_core::error::DomainError;
use unilife_core::event::EventMetadata;
use unilife_core::repository::{EventRepository, StoredEvent};
use uuid::Uuid;

use crate::domain::aggregates::ProgressSession;
use crate::domain::commands::{HandlePresentationEvent, StartSession};
use crate::domain::engine::ProgressionEngine;
use crate::domain::events::{ProgressionEvent, ProgressionEventKind};
use crate::domain::presentation::{DeferredCommand, PresentationCommand};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct ProgressionCommandResult {
    /// The session affected by the command.
    pub session_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
    /// Presentation commands to forward to the client, in order.
    pub commands: Vec<PresentationCommand>,
    /// A command to deliver after a delay, if any.
    pub deferred: Option<DeferredCommand>,
}

/// Reconstitutes a `ProgressSession` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    session_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<ProgressSession, DomainError> {
    let mut session = ProgressSession::new(session_id);
    for stored in existing_events {
        let kind: ProgressionEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        let event = ProgressionEvent {
            metadata: EventMetadata::from(stored),
            kind,
        };
        session.apply(&event);
    }
    Ok(session)
}

async fn persist(
    session: &ProgressSession,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events: Vec<StoredEvent> = session
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_domain)
        .collect();

    if !stored_events.is_empty() {
        repo.append_events(session.id, session.version(), &stored_events)
            .await?;
    }

    Ok(stored_events)
}

/// Handles the `StartSession` command: creates a session, syncs the
/// presentation to its initial state and persists the start event.
///
/// The handler generates the `session_id`.
///
/// # Errors
///
/// Returns `DomainError` if event appending fails.
pub async fn handle_start_session(
    command: &StartSession,
    story: &StoryBook,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<ProgressionCommandResult, DomainError> {
    let session_id = Uuid::new_v4();
    let mut engine = ProgressionEngine::new(
        ProgressSession::new(session_id),
        story,
        clock,
        command.correlation_id,
    );

    let mut commands = Vec::new();
    engine.begin(&mut commands);

    let session = engine.into_session();
    let stored_events = persist(&session, repo).await?;

    Ok(ProgressionCommandResult {
        session_id,
        stored_events,
        commands,
        deferred: None,
    })
}

/// Handles the `HandlePresentationEvent` command: reconstitutes the session,
/// runs the event through the engine and persists any recorded events.
///
/// Ignored scans succeed with no commands and no events.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the session has no history.
/// Returns `DomainError` if event loading, deserialization or appending fails.
pub async fn handle_presentation_event(
    command: &HandlePresentationEvent,
    story: &StoryBook,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<ProgressionCommandResult, DomainError> {
    let existing_events = repo.load_events(command.session_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(command.session_id));
    }
    let session = reconstitute(command.session_id, &existing_events)?;

    let mut engine = ProgressionEngine::new(session, story, clock, command.correlation_id);
    let mut commands = Vec::new();
    let deferred = engine.handle(command.event, &mut commands);

    let session = engine.into_session();
    let stored_events = persist(&session, repo).await?;

    Ok(ProgressionCommandResult {
        session_id: command.session_id,
        stored_events,
        commands,
        deferred,
    })
}
