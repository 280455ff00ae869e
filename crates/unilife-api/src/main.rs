//! UniLife API server entry point.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use unilife_api::config::AppConfig;
use unilife_api::error::AppError;
use unilife_api::routes;
use unilife_api::state::AppState;
use unilife_content::application::compiler::{bundled_story_book, compile_story_book};
use unilife_core::clock::SystemClock;
use unilife_event_store::memory_event_repository::InMemoryEventRepository;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting UniLife API server");

    let config = AppConfig::from_env()?;

    // Load story content once; it is immutable from here on.
    let story = match &config.story_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading story from file");
            let source = tokio::fs::read_to_string(path).await?;
            compile_story_book(&source)?
        }
        None => bundled_story_book()?,
    };

    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(InMemoryEventRepository::new()),
        Arc::new(story),
    );

    // TODO: Replace CorsLayer::permissive() with the AR client's origin once it is hosted.
    let app = routes::app_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
