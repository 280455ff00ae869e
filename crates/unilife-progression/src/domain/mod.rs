pub mod aggregates;
pub mod commands;
pub mod engine;
pub mod events;
pub mod presentation;
pub mod rules;
pub mod selection;
pub mod state;
