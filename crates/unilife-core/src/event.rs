//! Event envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope fields shared by every recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Time-ordered (v7) event id.
    pub event_id: Uuid,
    /// Dotted type name, e.g. `progress.stage_completed`.
    pub event_type: String,
    /// The session stream this event belongs to.
    pub aggregate_id: Uuid,
    /// 1-based position in the stream.
    pub sequence_number: i64,
    /// Id of the request that produced the event.
    pub correlation_id: Uuid,
    /// Id of the command that caused the event.
    pub causation_id: Uuid,
    /// When the event was recorded.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Metadata for a new event caused directly by the request
    /// `correlation_id`. The event id is a fresh v7 UUID.
    #[must_use]
    pub fn record(
        aggregate_id: Uuid,
        event_type: &str,
        sequence_number: i64,
        correlation_id: Uuid,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            event_type: event_type.to_owned(),
            aggregate_id,
            sequence_number,
            correlation_id,
            causation_id: correlation_id,
            occurred_at,
        }
    }
}

/// A typed event that can be stored as JSON.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Dotted type name stored next to the payload.
    fn event_type(&self) -> &'static str;

    /// JSON form of the payload, without the envelope.
    fn to_payload(&self) -> serde_json::Value;

    /// The envelope.
    fn metadata(&self) -> &EventMetadata;
}
