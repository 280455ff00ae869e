//! The presentation boundary.
//!
//! Inbound, the rendering layer sends [`PresentationEvent`]s. Outbound, the
//! engine drives a [`PresentationPort`]. `Vec<PresentationCommand>` is the
//! in-memory port: it records every call so a host can forward the commands
//! to a client, and tests can assert on them without a rendering environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use unilife_content::domain::stage::{EndingPath, Stage};
use unilife_content::domain::story_book::NarrativeUnit;

/// Label shown once every stage is complete.
pub const COMPLETE_LABEL: &str = "COMPLETE";

/// Events raised by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationEvent {
    /// A marker was detected. `stage` is the raw marker index and may be out
    /// of range.
    Scan {
        /// Raw stage index.
        stage: i64,
    },
    /// The tracked marker left the camera view.
    ScanLost,
    /// The scene finished loading.
    SceneReady,
    /// The player asked to restart.
    Reset,
}

/// What the player should scan next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextTarget {
    /// The next stage, or `None` when the story is complete.
    pub stage: Option<Stage>,
    /// The stage's scan label, or [`COMPLETE_LABEL`].
    pub label: String,
}

impl NextTarget {
    /// Target for a stage with the given label.
    #[must_use]
    pub fn stage(stage: Stage, label: &str) -> Self {
        Self {
            stage: Some(stage),
            label: label.to_owned(),
        }
    }

    /// Target once every stage is complete.
    #[must_use]
    pub fn complete() -> Self {
        Self {
            stage: None,
            label: COMPLETE_LABEL.to_owned(),
        }
    }

    /// Whether this is the completion target.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stage.is_none()
    }
}

/// Outbound command sink implemented by the rendering layer.
pub trait PresentationPort {
    /// Show a narrative unit.
    fn display_narrative(&mut self, unit: &NarrativeUnit);

    /// Hide whatever narrative unit is showing.
    fn hide_narrative(&mut self);

    /// Refresh the progress indicators. `current_index` is the completed count.
    fn update_progress_indicator(&mut self, steps: [bool; Stage::COUNT], current_index: usize);

    /// Refresh the next scan target.
    fn update_next_target(&mut self, target: &NextTarget);

    /// Announce the ending.
    fn display_ending(&mut self, path: EndingPath);

    /// Reveal the scene content belonging to one ending.
    fn show_path_specific_content(&mut self, path: EndingPath);

    /// Hide both endings and their scene content.
    fn hide_all_ending_content(&mut self);

    /// Return the presentation to its initial look.
    fn reset_presentation(&mut self);

    /// Hide the loading indicator.
    fn hide_loader(&mut self);
}

/// A recorded [`PresentationPort`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PresentationCommand {
    /// See [`PresentationPort::display_narrative`].
    DisplayNarrative {
        /// The unit to show.
        unit: NarrativeUnit,
    },
    /// See [`PresentationPort::hide_narrative`].
    HideNarrative,
    /// See [`PresentationPort::update_progress_indicator`].
    UpdateProgressIndicator {
        /// Step flags in stage order.
        steps: [bool; Stage::COUNT],
        /// Completed count.
        current_index: usize,
    },
    /// See [`PresentationPort::update_next_target`].
    UpdateNextTarget {
        /// The next target.
        target: NextTarget,
    },
    /// See [`PresentationPort::display_ending`].
    DisplayEnding {
        /// The ending reached.
        path: EndingPath,
    },
    /// See [`PresentationPort::show_path_specific_content`].
    ShowPathSpecificContent {
        /// The ending whose content to reveal.
        path: EndingPath,
    },
    /// See [`PresentationPort::hide_all_ending_content`].
    HideAllEndingContent,
    /// See [`PresentationPort::reset_presentation`].
    ResetPresentation,
    /// See [`PresentationPort::hide_loader`].
    HideLoader,
}

impl PresentationPort for Vec<PresentationCommand> {
    fn display_narrative(&mut self, unit: &NarrativeUnit) {
        self.push(PresentationCommand::DisplayNarrative { unit: unit.clone() });
    }

    fn hide_narrative(&mut self) {
        self.push(PresentationCommand::HideNarrative);
    }

    fn update_progress_indicator(&mut self, steps: [bool; Stage::COUNT], current_index: usize) {
        self.push(PresentationCommand::UpdateProgressIndicator {
            steps,
            current_index,
        });
    }

    fn update_next_target(&mut self, target: &NextTarget) {
        self.push(PresentationCommand::UpdateNextTarget {
            target: target.clone(),
        });
    }

    fn display_ending(&mut self, path: EndingPath) {
        self.push(PresentationCommand::DisplayEnding { path });
    }

    fn show_path_specific_content(&mut self, path: EndingPath) {
        self.push(PresentationCommand::ShowPathSpecificContent { path });
    }

    fn hide_all_ending_content(&mut self) {
        self.push(PresentationCommand::HideAllEndingContent);
    }

    fn reset_presentation(&mut self) {
        self.push(PresentationCommand::ResetPresentation);
    }

    fn hide_loader(&mut self) {
        self.push(PresentationCommand::HideLoader);
    }
}

/// A command the host must deliver once `delay` has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredCommand {
    /// How long to wait before delivering.
    pub delay: Duration,
    /// The command to deliver.
    pub command: PresentationCommand,
}
