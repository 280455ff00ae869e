//! Shared test doubles for the UniLife story engine.

mod clock;
mod repository;

pub use clock::FixedClock;
pub use repository::{EmptyEventRepository, FailingEventRepository, RecordingEventRepository};
