//! The progression engine.
//!
//! Consumes presentation events one at a time, checks each scan against the
//! stage rule table, records the resulting state changes on the session and
//! drives the presentation port. Inadmissible scans are dropped without a
//! trace in state or presentation.

use tracing::{debug, info};
use unilife_content::domain::stage::{EndingPath, Stage};
use unilife_content::domain::story_book::StoryBook;
use unilife_core::clock::Clock;
use uuid::Uuid;

use super::aggregates::ProgressSession;
use super::presentation::{
    DeferredCommand, NextTarget, PresentationCommand, PresentationEvent, PresentationPort,
};
use super::rules::{StageEffect, rule_for};
use super::selection::{ending_story, select_story};
use super::state::ProgressState;

/// Result of a single scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The scan was admitted and `Stage` completed.
    Applied(Stage),
    /// The scan was out of range or out of sequence.
    Ignored,
}

/// Drives one session for the duration of a command.
pub struct ProgressionEngine<'a> {
    session: ProgressSession,
    story: &'a StoryBook,
    clock: &'a dyn Clock,
    correlation_id: Uuid,
}

impl<'a> ProgressionEngine<'a> {
    /// Wraps `session`. Events recorded through this engine carry
    /// `correlation_id` and timestamps from `clock`.
    #[must_use]
    pub fn new(
        session: ProgressSession,
        story: &'a StoryBook,
        clock: &'a dyn Clock,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            session,
            story,
            clock,
            correlation_id,
        }
    }

    /// Current progress.
    #[must_use]
    pub fn state(&self) -> &ProgressState {
        self.session.state()
    }

    /// Releases the session, including any events recorded on it.
    #[must_use]
    pub fn into_session(self) -> ProgressSession {
        self.session
    }

    /// Starts a fresh session and syncs the presentation to it.
    pub fn begin(&mut self, port: &mut dyn PresentationPort) {
        self.session.start(self.correlation_id, self.clock);
        port.reset_presentation();
        self.sync_progress(port);
    }

    /// Dispatches an inbound event. Returns a command the host must deliver
    /// later, if the event asks for one.
    pub fn handle(
        &mut self,
        event: PresentationEvent,
        port: &mut dyn PresentationPort,
    ) -> Option<DeferredCommand> {
        match event {
            PresentationEvent::Scan { stage } => {
                self.on_scan(stage, port);
                None
            }
            PresentationEvent::ScanLost => {
                self.on_scan_lost(port);
                None
            }
            PresentationEvent::SceneReady => Some(self.on_scene_ready()),
            PresentationEvent::Reset => {
                self.reset(port);
                None
            }
        }
    }

    /// Applies a marker scan.
    pub fn on_scan(&mut self, stage_index: i64, port: &mut dyn PresentationPort) -> ScanOutcome {
        let completed = self.state().completed_count();
        let Some(rule) = rule_for(stage_index).filter(|rule| rule.admits(completed)) else {
            debug!(stage_index, completed, "scan ignored");
            return ScanOutcome::Ignored;
        };

        let stage = rule.stage;
        match rule.effect {
            StageEffect::Advance => {
                self.session
                    .complete_stage(stage, self.correlation_id, self.clock);
            }
            StageEffect::StudyBooks => {
                self.session
                    .complete_stage(stage, self.correlation_id, self.clock);
                self.session.study_books(self.correlation_id, self.clock);
            }
            StageEffect::ResolveEnding => {
                let path = self.resolve_ending(stage);
                port.display_narrative(self.story.unit(ending_story(path)));
                port.show_path_specific_content(path);
                port.display_ending(path);
                self.sync_progress(port);
                info!(%stage, %path, "ending reached");
                return ScanOutcome::Applied(stage);
            }
        }

        let key = select_story(stage, self.state().studied_books());
        port.display_narrative(self.story.unit(key));
        self.sync_progress(port);
        info!(%stage, completed = self.state().completed_count(), "stage completed");
        ScanOutcome::Applied(stage)
    }

    /// Hides the narrative when the tracked marker is lost. Progress is
    /// untouched.
    pub fn on_scan_lost(&mut self, port: &mut dyn PresentationPort) {
        port.hide_narrative();
    }

    /// Schedules the loader to hide once the configured delay has passed.
    #[must_use]
    pub fn on_scene_ready(&self) -> DeferredCommand {
        DeferredCommand {
            delay: self.story.loader_delay(),
            command: PresentationCommand::HideLoader,
        }
    }

    /// Clears all progress and returns the presentation to the first target.
    pub fn reset(&mut self, port: &mut dyn PresentationPort) {
        self.session.reset(self.correlation_id, self.clock);
        port.hide_all_ending_content();
        port.hide_narrative();
        port.reset_presentation();
        self.sync_progress(port);
        info!(session_id = %self.session.id, "progress reset");
    }

    /// The target the player should scan next.
    #[must_use]
    pub fn next_target(&self) -> NextTarget {
        Stage::from_index(self.state().completed_count()).map_or_else(
            NextTarget::complete,
            |stage| NextTarget::stage(stage, self.story.scan_label(stage)),
        )
    }

    // The beer stage may be re-admitted after the ending; only the first
    // admission records state.
    fn resolve_ending(&mut self, stage: Stage) -> EndingPath {
        if !self.state().is_stage_complete(stage.index()) {
            self.session
                .complete_stage(stage, self.correlation_id, self.clock);
        }
        if let Some(path) = self.state().ending_path() {
            return path;
        }
        let path = EndingPath::from_studied_books(self.state().studied_books());
        self.session
            .reach_ending(path, self.correlation_id, self.clock);
        path
    }

    fn sync_progress(&self, port: &mut dyn PresentationPort) {
        let state = self.state();
        port.update_progress_indicator(state.steps(), state.completed_count());
        let target = self.next_target();
        if target.is_complete() {
            debug!(session_id = %self.session.id, "every stage complete");
        }
        port.update_next_target(&target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use unilife_content::application::compiler::bundled_story_book;
    use unilife_content::domain::stage::StoryKey;
    use unilife_core::aggregate::AggregateRoot;
    use unilife_test_support::FixedClock;

    use crate::domain::events::ProgressionEventKind;

    type Commands = Vec<PresentationCommand>;

    fn fixture() -> (StoryBook, FixedClock) {
        (
            bundled_story_book().unwrap(),
            FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()),
        )
    }

    fn engine<'a>(story: &'a StoryBook, clock: &'a FixedClock) -> ProgressionEngine<'a> {
        ProgressionEngine::new(
            ProgressSession::new(Uuid::new_v4()),
            story,
            clock,
            Uuid::new_v4(),
        )
    }

    fn scan_all(engine: &mut ProgressionEngine<'_>, stages: &[i64]) -> Commands {
        let mut port = Commands::new();
        for stage in stages {
            engine.on_scan(*stage, &mut port);
        }
        port
    }

    fn displayed_keys(commands: &Commands) -> Vec<StoryKey> {
        commands
            .iter()
            .filter_map(|command| match command {
                PresentationCommand::DisplayNarrative { unit } => Some(unit.key),
                _ => None,
            })
            .collect()
    }

    fn last_target(commands: &Commands) -> Option<NextTarget> {
        commands.iter().rev().find_map(|command| match command {
            PresentationCommand::UpdateNextTarget { target } => Some(target.clone()),
            _ => None,
        })
    }

    #[test]
    fn test_out_of_range_scan_is_a_no_op() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);

        for stage in [-1, 4, 5, 99, i64::MIN, i64::MAX] {
            let mut port = Commands::new();
            assert_eq!(engine.on_scan(stage, &mut port), ScanOutcome::Ignored);
            assert!(port.is_empty());
        }

        assert_eq!(engine.state(), &ProgressState::new());
        assert!(engine.into_session().uncommitted_events().is_empty());
    }

    #[test]
    fn test_first_scan_emits_story_then_progress() {
        // Arrange
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);
        let mut port = Commands::new();

        // Act
        let outcome = engine.on_scan(0, &mut port);

        // Assert
        assert_eq!(outcome, ScanOutcome::Applied(Stage::University));
        assert_eq!(
            port,
            vec![
                PresentationCommand::DisplayNarrative {
                    unit: story.unit(StoryKey::University).clone(),
                },
                PresentationCommand::UpdateProgressIndicator {
                    steps: [true, false, false, false],
                    current_index: 1,
                },
                PresentationCommand::UpdateNextTarget {
                    target: NextTarget::stage(Stage::Laptop, "LAPTOP"),
                },
            ]
        );
    }

    #[test]
    fn test_scans_must_follow_strict_order() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);
        let mut port = Commands::new();

        assert_eq!(engine.on_scan(1, &mut port), ScanOutcome::Ignored);
        assert!(port.is_empty());

        assert_eq!(engine.on_scan(0, &mut port), ScanOutcome::Applied(Stage::University));
        assert_eq!(engine.on_scan(1, &mut port), ScanOutcome::Applied(Stage::Laptop));
        assert_eq!(engine.state().completed_count(), 2);
    }

    #[test]
    fn test_rescanning_a_completed_stage_is_a_no_op() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);
        scan_all(&mut engine, &[0]);
        let before = engine.state().clone();

        let mut port = Commands::new();
        assert_eq!(engine.on_scan(0, &mut port), ScanOutcome::Ignored);

        assert!(port.is_empty());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_full_run_with_books_reaches_success() {
        // Arrange
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);

        // Act
        let port = scan_all(&mut engine, &[0, 1, 2, 3]);

        // Assert
        let state = engine.state();
        assert!(state.is_complete());
        assert!(state.studied_books());
        assert_eq!(state.ending_path(), Some(EndingPath::Success));

        assert_eq!(
            displayed_keys(&port),
            vec![
                StoryKey::University,
                StoryKey::Laptop,
                StoryKey::Books,
                StoryKey::BeerSuccess,
            ]
        );
        assert!(port.contains(&PresentationCommand::DisplayEnding {
            path: EndingPath::Success
        }));
        assert!(port.contains(&PresentationCommand::ShowPathSpecificContent {
            path: EndingPath::Success
        }));
        assert_eq!(last_target(&port), Some(NextTarget::complete()));
    }

    #[test]
    fn test_skipping_books_reaches_failure() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);

        let port = scan_all(&mut engine, &[0, 1, 3]);

        let state = engine.state();
        assert!(!state.studied_books());
        assert_eq!(state.ending_path(), Some(EndingPath::Failure));
        assert_eq!(state.steps(), [true, true, false, true]);
        assert_eq!(displayed_keys(&port).last(), Some(&StoryKey::BeerFailure));
        assert!(port.contains(&PresentationCommand::DisplayEnding {
            path: EndingPath::Failure
        }));
        // Three of four complete: the target still names the stage at index 3.
        assert_eq!(last_target(&port), Some(NextTarget::stage(Stage::Beer, "BEER")));
    }

    #[test]
    fn test_ending_emission_order() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);
        scan_all(&mut engine, &[0, 1, 2]);

        let mut port = Commands::new();
        engine.on_scan(3, &mut port);

        assert_eq!(
            port,
            vec![
                PresentationCommand::DisplayNarrative {
                    unit: story.unit(StoryKey::BeerSuccess).clone(),
                },
                PresentationCommand::ShowPathSpecificContent {
                    path: EndingPath::Success
                },
                PresentationCommand::DisplayEnding {
                    path: EndingPath::Success
                },
                PresentationCommand::UpdateProgressIndicator {
                    steps: [true; 4],
                    current_index: 4,
                },
                PresentationCommand::UpdateNextTarget {
                    target: NextTarget::complete(),
                },
            ]
        );
    }

    #[test]
    fn test_beer_is_ignored_before_two_stages() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);

        let mut port = Commands::new();
        assert_eq!(engine.on_scan(3, &mut port), ScanOutcome::Ignored);
        scan_all(&mut engine, &[0]);
        assert_eq!(engine.on_scan(3, &mut port), ScanOutcome::Ignored);

        assert!(port.is_empty());
        assert_eq!(engine.state().ending_path(), None);
    }

    #[test]
    fn test_books_is_ignored_after_skipping_to_beer() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);
        scan_all(&mut engine, &[0, 1, 3]);

        let mut port = Commands::new();
        assert_eq!(engine.on_scan(2, &mut port), ScanOutcome::Ignored);
        assert!(!engine.state().studied_books());
    }

    #[test]
    fn test_rescanning_beer_replays_ending_without_new_state() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);
        scan_all(&mut engine, &[0, 1, 2, 3]);
        let before = engine.state().clone();

        let port = scan_all(&mut engine, &[3]);

        assert_eq!(engine.state(), &before);
        assert_eq!(displayed_keys(&port), vec![StoryKey::BeerSuccess]);

        let session = engine.into_session();
        let endings = session
            .uncommitted_events()
            .iter()
            .filter(|e| matches!(e.kind, ProgressionEventKind::EndingReached(_)))
            .count();
        assert_eq!(endings, 1);
    }

    #[test]
    fn test_books_records_stage_and_flag_together() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);
        scan_all(&mut engine, &[0, 1, 2]);

        let session = engine.into_session();
        let kinds: Vec<_> = session
            .uncommitted_events()
            .iter()
            .map(|e| e.kind.event_type())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "progress.stage_completed",
                "progress.stage_completed",
                "progress.stage_completed",
                "progress.books_studied",
            ]
        );
    }

    #[test]
    fn test_reset_restores_defaults_and_first_target() {
        // Arrange
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);
        scan_all(&mut engine, &[0, 1, 2, 3]);
        let mut port = Commands::new();

        // Act
        engine.reset(&mut port);

        // Assert
        assert_eq!(engine.state(), &ProgressState::new());
        assert_eq!(
            port,
            vec![
                PresentationCommand::HideAllEndingContent,
                PresentationCommand::HideNarrative,
                PresentationCommand::ResetPresentation,
                PresentationCommand::UpdateProgressIndicator {
                    steps: [false; 4],
                    current_index: 0,
                },
                PresentationCommand::UpdateNextTarget {
                    target: NextTarget::stage(Stage::University, "UNIVERSITY"),
                },
            ]
        );

        // A fresh run is possible after reset.
        assert_eq!(engine.on_scan(0, &mut port), ScanOutcome::Applied(Stage::University));
    }

    #[test]
    fn test_scan_lost_hides_narrative_only() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);
        scan_all(&mut engine, &[0]);
        let before = engine.state().clone();

        let mut port = Commands::new();
        engine.handle(PresentationEvent::ScanLost, &mut port);

        assert_eq!(port, vec![PresentationCommand::HideNarrative]);
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_scene_ready_defers_loader_hide() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);
        let mut port = Commands::new();

        let deferred = engine.handle(PresentationEvent::SceneReady, &mut port);

        assert!(port.is_empty());
        assert_eq!(
            deferred,
            Some(DeferredCommand {
                delay: story.loader_delay(),
                command: PresentationCommand::HideLoader,
            })
        );
    }

    #[test]
    fn test_next_target_is_complete_exactly_at_four() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);

        let mut targets = vec![engine.next_target()];
        for stage in 0..4 {
            scan_all(&mut engine, &[stage]);
            targets.push(engine.next_target());
        }

        let labels: Vec<_> = targets.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["UNIVERSITY", "LAPTOP", "BOOKS", "BEER", "COMPLETE"]);
        let complete: Vec<_> = targets.iter().map(NextTarget::is_complete).collect();
        assert_eq!(complete, [false, false, false, false, true]);
    }

    #[test]
    fn test_begin_records_start_and_syncs_presentation() {
        let (story, clock) = fixture();
        let mut engine = engine(&story, &clock);
        let mut port = Commands::new();

        engine.begin(&mut port);

        assert_eq!(port[0], PresentationCommand::ResetPresentation);
        assert_eq!(
            last_target(&port),
            Some(NextTarget::stage(Stage::University, "UNIVERSITY"))
        );
        let session = engine.into_session();
        assert_eq!(session.version(), 0);
        assert_eq!(session.uncommitted_events().len(), 1);
    }
}
