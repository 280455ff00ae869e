//! Event-sourced aggregates.
//!
//! A progression session is the only aggregate today. It is rebuilt by
//! replaying its stream and grows new events while a command runs.

use uuid::Uuid;

use crate::event::DomainEvent;

/// A state value rebuilt from, and extended by, its own event stream.
pub trait AggregateRoot: Send + Sync {
    /// Events recorded on and replayed onto this aggregate.
    type Event: DomainEvent;

    /// Stream identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Sequence number of the last replayed event; 0 for a new stream.
    fn version(&self) -> i64;

    /// Folds one persisted event into state and bumps the version.
    fn apply(&mut self, event: &Self::Event);

    /// Events recorded during the current command, not yet appended.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Sequence number the next recorded event must carry.
    fn next_sequence_number(&self) -> i64 {
        let pending = i64::try_from(self.uncommitted_events().len()).unwrap_or(i64::MAX);
        self.version().saturating_add(pending).saturating_add(1)
    }
}
