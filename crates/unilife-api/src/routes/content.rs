//! Routes for the Story Content bounded context.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use unilife_content::domain::story_book::{NarrativeUnit, StageSettings};

use crate::state::AppState;

/// The loaded story as the client needs it at startup.
#[derive(Debug, Serialize)]
pub struct StoryBookView {
    /// SHA-256 of the story source.
    pub version_hash: String,
    /// Delay before the loader hides once the scene is ready.
    pub loader_delay_ms: u64,
    /// Marker, indicator and label settings in scan order.
    pub stages: Vec<StageSettings>,
    /// All narrative units.
    pub units: Vec<NarrativeUnit>,
}

/// GET /
async fn get_story(State(state): State<AppState>) -> Json<StoryBookView> {
    let story = &state.story;
    Json(StoryBookView {
        version_hash: story.version_hash().to_owned(),
        loader_delay_ms: u64::try_from(story.loader_delay().as_millis()).unwrap_or(u64::MAX),
        stages: story.stages().to_vec(),
        units: story.units().to_vec(),
    })
}

/// Returns the router for the content context.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_story))
}
