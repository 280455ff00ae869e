//! Progression bounded context.
//!
//! Responsible for the scan-driven state machine: which marker scans are
//! admitted, how they advance the session's progress, which narrative unit
//! and ending they select, and what the presentation layer is told.

pub mod application;
pub mod domain;
