//! Query handlers for the Progression context.

use serde::Serialize;
use unilife_content::domain::stage::{EndingPath, Stage};
use unilife_core::aggregate::AggregateRoot;
use unilife_core::error::DomainError;
use unilife_core::repository::EventRepository;
use uuid::Uuid;

use crate::application::command_handlers;

/// Read-only view of a progression session.
#[derive(Debug, Serialize)]
pub struct ProgressView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Step flags in stage order.
    pub steps: [bool; Stage::COUNT],
    /// Number of completed steps.
    pub completed_count: usize,
    /// Whether every step is complete.
    pub is_complete: bool,
    /// Whether the books stage was visited.
    pub studied_books: bool,
    /// The chosen ending, once reached.
    pub ending_path: Option<EndingPath>,
    /// Current version (event count).
    pub version: i64,
}

/// Retrieves a session's progress by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_progress_by_id(
    session_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<ProgressView, DomainError> {
    let stored_events = repo.load_events(session_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(session_id));
    }
    let session = command_handlers::reconstitute(session_id, &stored_events)?;
    let state = session.state();
    Ok(ProgressView {
        session_id,
        steps: state.steps(),
        completed_count: state.completed_count(),
        is_complete: state.is_complete(),
        studied_books: state.studied_books(),
        ending_path: state.ending_path(),
        version: session.version(),
    })
}
