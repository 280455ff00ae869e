//! UniLife event store.
//!
//! Session streams live in process memory only; a restart starts every
//! player from scratch.

pub mod memory_event_repository;
