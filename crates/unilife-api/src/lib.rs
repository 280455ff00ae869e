//! UniLife API: HTTP host for the marker-scan story engine.
//!
//! The browser client forwards marker and scene events here and renders the
//! presentation commands it gets back.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
