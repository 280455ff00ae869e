//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Marker scans never fail; these errors come from loading story content and
/// from the event store surrounding a progression session.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No events exist for the requested session.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Two writers raced on the same session stream.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The version the writer loaded.
        expected: i64,
        /// The version found in the store.
        actual: i64,
    },

    /// Story content or request input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
