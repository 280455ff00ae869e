//! Progress state store for a single session.

use serde::Serialize;
use unilife_content::domain::stage::{EndingPath, Stage};

/// Mutable progress of one session.
///
/// A completed step only reverts through [`ProgressState::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    steps: [bool; Stage::COUNT],
    studied_books: bool,
    ending_path: Option<EndingPath>,
}

impl ProgressState {
    /// Creates the state every session starts from.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every field to its creation default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Marks the step at `stage_index` complete. Indices outside `0..4` are
    /// ignored.
    pub fn mark_stage_complete(&mut self, stage_index: usize) {
        if let Some(step) = self.steps.get_mut(stage_index) {
            *step = true;
        }
    }

    /// Sets the side-quest flag.
    pub fn set_studied_books(&mut self, value: bool) {
        self.studied_books = value;
    }

    /// Sets the chosen ending.
    pub fn set_ending_path(&mut self, path: Option<EndingPath>) {
        self.ending_path = path;
    }

    /// Number of completed steps; doubles as the state-machine position.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.steps.iter().filter(|done| **done).count()
    }

    /// Whether all four steps are complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|done| *done)
    }

    /// Whether the step at `stage_index` is complete. Out-of-range indices
    /// report `false`.
    #[must_use]
    pub fn is_stage_complete(&self, stage_index: usize) -> bool {
        self.steps.get(stage_index).copied().unwrap_or(false)
    }

    /// Returns a copy of the step flags.
    #[must_use]
    pub fn steps(&self) -> [bool; Stage::COUNT] {
        self.steps
    }

    /// Whether the books stage was visited.
    #[must_use]
    pub fn studied_books(&self) -> bool {
        self.studied_books
    }

    /// The chosen ending, once the beer stage has completed.
    #[must_use]
    pub fn ending_path(&self) -> Option<EndingPath> {
        self.ending_path
    }
}
