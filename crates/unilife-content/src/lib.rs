//! Story Content bounded context.
//!
//! Responsible for the authored story: the closed set of scan stages and
//! narrative units, the per-stage marker settings, and compiling the YAML +
//! Markdown source into an immutable [`domain::story_book::StoryBook`].

pub mod application;
pub mod domain;
