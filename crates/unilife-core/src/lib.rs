//! Shared domain abstractions for UniLife.
//!
//! This crate defines the traits and types that the content, progression and
//! storage crates depend on. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod event;
pub mod repository;
