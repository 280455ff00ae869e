//! Routes for the Progression bounded context.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use unilife_progression::application::command_handlers::{self, ProgressionCommandResult};
use unilife_progression::application::query_handlers::{self, ProgressView};
use unilife_progression::domain::commands;
use unilife_progression::domain::presentation::{PresentationCommand, PresentationEvent};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{session_id}/events.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventRequest {
    /// A marker was detected, identified by its stage index.
    Scan {
        /// Raw stage index.
        stage: i64,
    },
    /// A marker was detected, identified by its marker id.
    MarkerFound {
        /// The tracked marker identifier.
        marker_id: String,
    },
    /// The tracked marker left the camera view.
    ScanLost,
    /// The scene finished loading.
    SceneReady,
    /// The player asked to restart.
    Reset,
}

/// Response body returned after a session command is handled.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The session the commands belong to.
    pub session_id: Uuid,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
    /// Presentation commands to apply, in order.
    pub commands: Vec<PresentationCommand>,
}

/// Response body for GET /{session_id}/commands.
#[derive(Debug, Serialize)]
pub struct PendingCommandsResponse {
    /// Deferred commands that have come due.
    pub commands: Vec<PresentationCommand>,
}

fn respond(state: &AppState, result: ProgressionCommandResult) -> SessionResponse {
    let session_id = result.session_id;
    if let Some(deferred) = result.deferred {
        state.outbox.schedule(session_id, deferred);
    }

    let mut commands = state.outbox.drain(session_id);
    commands.extend(result.commands);

    SessionResponse {
        session_id,
        event_ids: result.stored_events.iter().map(|e| e.event_id).collect(),
        commands,
    }
}

async fn dispatch(
    state: &AppState,
    session_id: Uuid,
    event: PresentationEvent,
) -> Result<SessionResponse, ApiError> {
    let command = commands::HandlePresentationEvent {
        correlation_id: Uuid::new_v4(),
        session_id,
        event,
    };

    let _turn = state.session_locks.acquire(session_id).await;
    info!(correlation_id = %command.correlation_id, ?event, "handling presentation event");

    let result = command_handlers::handle_presentation_event(
        &command,
        &state.story,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(respond(state, result))
}

/// POST /
#[instrument(skip(state))]
async fn start_session(State(state): State<AppState>) -> Result<Json<SessionResponse>, ApiError> {
    let command = commands::StartSession {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling start_session command");

    let result = command_handlers::handle_start_session(
        &command,
        &state.story,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(respond(&state, result)))
}

/// GET /{session_id}
#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ProgressView>, ApiError> {
    let view = query_handlers::get_progress_by_id(session_id, &*state.event_repository).await?;
    Ok(Json(view))
}

/// POST /{session_id}/events
#[instrument(skip(state, request))]
async fn post_event(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<EventRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let event = match request {
        EventRequest::Scan { stage } => PresentationEvent::Scan { stage },
        EventRequest::MarkerFound { marker_id } => match state.story.stage_for_marker(&marker_id) {
            Some(stage) => PresentationEvent::Scan {
                stage: i64::try_from(stage.index()).unwrap_or(i64::MAX),
            },
            None => {
                query_handlers::get_progress_by_id(session_id, &*state.event_repository).await?;
                debug!(%marker_id, "unknown marker ignored");
                return Ok(Json(SessionResponse {
                    session_id,
                    event_ids: Vec::new(),
                    commands: state.outbox.drain(session_id),
                }));
            }
        },
        EventRequest::ScanLost => PresentationEvent::ScanLost,
        EventRequest::SceneReady => PresentationEvent::SceneReady,
        EventRequest::Reset => PresentationEvent::Reset,
    };

    Ok(Json(dispatch(&state, session_id, event).await?))
}

/// POST /{session_id}/reset
#[instrument(skip(state))]
async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    Ok(Json(
        dispatch(&state, session_id, PresentationEvent::Reset).await?,
    ))
}

/// GET /{session_id}/commands
#[instrument(skip(state))]
async fn pending_commands(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Json<PendingCommandsResponse> {
    Json(PendingCommandsResponse {
        commands: state.outbox.drain(session_id),
    })
}

/// Returns the router for the progression context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_session))
        .route("/{session_id}", get(get_session))
        .route("/{session_id}/events", post(post_event))
        .route("/{session_id}/reset", post(reset_session))
        .route("/{session_id}/commands", get(pending_commands))
}
