//! The compiled, immutable story book.

use std::time::Duration;

use serde::Serialize;

use super::stage::{EndingPath, Stage, StoryKey};

/// A titled block of story text shown when a stage completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeUnit {
    /// Which authored unit this is.
    pub key: StoryKey,
    /// Chapter title.
    pub title: String,
    /// Rich text body, compiled to HTML.
    pub body: String,
    /// The stage whose completion shows this unit.
    pub target: Stage,
    /// Set on the two beer endings only.
    pub ending: Option<EndingPath>,
}

/// Presentation identifiers for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSettings {
    /// The stage these settings describe.
    pub stage: Stage,
    /// Identifier of the physical marker tracked for this stage.
    pub marker_id: String,
    /// Identifier of the progress indicator for this stage.
    pub indicator_id: String,
    /// Label shown while this stage is the next scan target.
    pub scan_label: String,
}

/// All authored story content, loaded once at startup.
///
/// Stage settings are held in [`Stage::ALL`] order and units in
/// [`StoryKey::ALL`] order; the compiler guarantees both.
#[derive(Debug, Clone)]
pub struct StoryBook {
    version_hash: String,
    loader_delay: Duration,
    stages: Vec<StageSettings>,
    units: Vec<NarrativeUnit>,
}

impl StoryBook {
    pub(crate) fn new(
        version_hash: String,
        loader_delay: Duration,
        stages: Vec<StageSettings>,
        units: Vec<NarrativeUnit>,
    ) -> Self {
        debug_assert_eq!(stages.len(), Stage::COUNT);
        debug_assert_eq!(units.len(), StoryKey::COUNT);
        Self {
            version_hash,
            loader_delay,
            stages,
            units,
        }
    }

    /// SHA-256 of the source text, as lowercase hex.
    #[must_use]
    pub fn version_hash(&self) -> &str {
        &self.version_hash
    }

    /// Delay between the scene signalling readiness and the loader hiding.
    #[must_use]
    pub fn loader_delay(&self) -> Duration {
        self.loader_delay
    }

    /// Stage settings in scan order.
    #[must_use]
    pub fn stages(&self) -> &[StageSettings] {
        &self.stages
    }

    /// Narrative units in authoring order.
    #[must_use]
    pub fn units(&self) -> &[NarrativeUnit] {
        &self.units
    }

    /// Returns the settings for `stage`.
    #[must_use]
    pub fn stage(&self, stage: Stage) -> &StageSettings {
        &self.stages[stage.index()]
    }

    /// Returns the label shown while `stage` is the next scan target.
    #[must_use]
    pub fn scan_label(&self, stage: Stage) -> &str {
        &self.stage(stage).scan_label
    }

    /// Returns the unit identified by `key`.
    #[must_use]
    pub fn unit(&self, key: StoryKey) -> &NarrativeUnit {
        &self.units[key.index()]
    }

    /// Maps a tracked marker identifier back to its stage.
    #[must_use]
    pub fn stage_for_marker(&self, marker_id: &str) -> Option<Stage> {
        self.stages
            .iter()
            .find(|settings| settings.marker_id == marker_id)
            .map(|settings| settings.stage)
    }
}
