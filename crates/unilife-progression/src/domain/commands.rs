//! Commands for the Progression context.

use uuid::Uuid;

use super::presentation::PresentationEvent;

/// Command to create a new progression session.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// Command to feed one presentation event into an existing session.
#[derive(Debug, Clone)]
pub struct HandlePresentationEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session receiving the event.
    pub session_id: Uuid,
    /// The event raised by the rendering layer.
    pub event: PresentationEvent,
}
