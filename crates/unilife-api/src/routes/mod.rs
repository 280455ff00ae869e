//! Route modules.

use axum::Router;

use crate::state::AppState;

pub mod content;
pub mod health;
pub mod sessions;

/// Returns every route, nested under its public prefix.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/content", content::router())
        .nest("/api/v1/sessions", sessions::router())
}
