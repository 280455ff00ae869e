//! Compiles YAML story sources into a [`StoryBook`].
//!
//! Bodies are authored in Markdown and rendered to HTML once here, so the
//! runtime never touches the source text again.

use std::collections::BTreeMap;
use std::time::Duration;

use pulldown_cmark::{Parser, html};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;
use unilife_core::error::DomainError;

use crate::domain::stage::{EndingPath, Stage, StoryKey};
use crate::domain::story_book::{NarrativeUnit, StageSettings, StoryBook};

/// The story shipped with the binary.
pub const BUNDLED_STORY: &str = include_str!("../../content/story.yaml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StorySource {
    loader_delay_ms: u64,
    stages: Vec<StageSource>,
    stories: BTreeMap<StoryKey, UnitSource>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StageSource {
    stage: Stage,
    marker_id: String,
    indicator_id: String,
    scan_label: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UnitSource {
    title: String,
    body: String,
    target: Stage,
    #[serde(default)]
    ending: Option<EndingPath>,
}

/// Compiles the bundled story.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the bundled source is invalid.
pub fn bundled_story_book() -> Result<StoryBook, DomainError> {
    compile_story_book(BUNDLED_STORY)
}

/// Parses, validates and compiles a YAML story source.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the YAML does not parse, a stage or
/// story is missing or out of place, or a required text field is blank.
pub fn compile_story_book(source: &str) -> Result<StoryBook, DomainError> {
    let parsed: StorySource = serde_yaml::from_str(source)
        .map_err(|e| DomainError::Validation(format!("story source parse failed: {e}")))?;

    let stages = compile_stages(parsed.stages)?;
    let units = compile_units(parsed.stories)?;
    let version_hash = format!("{:x}", Sha256::digest(source.as_bytes()));

    info!(%version_hash, "compiled story book");

    Ok(StoryBook::new(
        version_hash,
        Duration::from_millis(parsed.loader_delay_ms),
        stages,
        units,
    ))
}

fn compile_stages(sources: Vec<StageSource>) -> Result<Vec<StageSettings>, DomainError> {
    if sources.len() != Stage::COUNT {
        return Err(DomainError::Validation(format!(
            "expected {} stages, found {}",
            Stage::COUNT,
            sources.len()
        )));
    }

    sources
        .into_iter()
        .zip(Stage::ALL)
        .map(|(source, expected)| {
            if source.stage != expected {
                return Err(DomainError::Validation(format!(
                    "stage {} listed where {expected} belongs",
                    source.stage
                )));
            }
            require_text(&source.marker_id, expected, "marker_id")?;
            require_text(&source.indicator_id, expected, "indicator_id")?;
            require_text(&source.scan_label, expected, "scan_label")?;
            Ok(StageSettings {
                stage: source.stage,
                marker_id: source.marker_id,
                indicator_id: source.indicator_id,
                scan_label: source.scan_label,
            })
        })
        .collect()
}

fn compile_units(
    mut sources: BTreeMap<StoryKey, UnitSource>,
) -> Result<Vec<NarrativeUnit>, DomainError> {
    StoryKey::ALL
        .into_iter()
        .map(|key| {
            let source = sources
                .remove(&key)
                .ok_or_else(|| DomainError::Validation(format!("missing story: {key}")))?;

            if source.target != key.stage() {
                return Err(DomainError::Validation(format!(
                    "story {key} targets {} instead of {}",
                    source.target,
                    key.stage()
                )));
            }
            if source.ending != key.ending() {
                return Err(DomainError::Validation(format!(
                    "story {key} has ending {:?}, expected {:?}",
                    source.ending,
                    key.ending()
                )));
            }
            if source.title.trim().is_empty() {
                return Err(DomainError::Validation(format!("story {key} has no title")));
            }

            Ok(NarrativeUnit {
                key,
                title: source.title,
                body: render_markdown(&source.body),
                target: source.target,
                ending: source.ending,
            })
        })
        .collect()
}

fn require_text(value: &str, stage: Stage, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!(
            "stage {stage} has an empty {field}"
        )));
    }
    Ok(())
}

fn render_markdown(body: &str) -> String {
    let mut rendered = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut rendered, Parser::new(body));
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_validation(result: Result<StoryBook, DomainError>, needle: &str) {
        match result {
            Err(DomainError::Validation(message)) => {
                assert!(message.contains(needle), "unexpected message: {message}");
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_bundled_story_compiles_with_default_settings() {
        // Act
        let book = bundled_story_book().unwrap();

        // Assert
        assert_eq!(book.loader_delay(), Duration::from_millis(1500));
        assert_eq!(book.units().len(), StoryKey::COUNT);

        let markers: Vec<_> = book.stages().iter().map(|s| s.marker_id.as_str()).collect();
        assert_eq!(
            markers,
            ["marker-university", "marker-laptop", "marker-books", "marker-beer"]
        );
        let dots: Vec<_> = book.stages().iter().map(|s| s.indicator_id.as_str()).collect();
        assert_eq!(dots, ["dot1", "dot2", "dot3", "dot4"]);

        assert_eq!(book.unit(StoryKey::BeerFailure).title, "THE DROPOUT");
    }

    #[test]
    fn test_bodies_are_rendered_to_html() {
        let book = bundled_story_book().unwrap();

        let body = &book.unit(StoryKey::University).body;
        assert!(body.starts_with("<p>"));
        assert!(body.contains("<strong>Week 12</strong>"));
        assert!(!body.contains("**"));
    }

    #[test]
    fn test_version_hash_is_sha256_hex_of_source() {
        let book = bundled_story_book().unwrap();

        assert_eq!(book.version_hash().len(), 64);
        assert!(book.version_hash().chars().all(|c| c.is_ascii_hexdigit()));

        let edited = BUNDLED_STORY.replace("loader_delay_ms: 1500", "loader_delay_ms: 10");
        let other = compile_story_book(&edited).unwrap();
        assert_ne!(other.version_hash(), book.version_hash());
        assert_eq!(other.loader_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_missing_story_is_rejected() {
        let source = BUNDLED_STORY.replace("  books:\n", "  bookz:\n");
        // An unknown key fails deserialization before the missing key is noticed.
        assert_validation(compile_story_book(&source), "parse failed");

        let truncated = match BUNDLED_STORY.find("  beer_failure:") {
            Some(at) => &BUNDLED_STORY[..at],
            None => panic!("bundled story lost its failure ending"),
        };
        assert_validation(compile_story_book(truncated), "missing story: beer_failure");
    }

    #[test]
    fn test_mismatched_ending_tag_is_rejected() {
        let source = BUNDLED_STORY.replace("ending: failure", "ending: success");
        assert_validation(compile_story_book(&source), "story beer_failure has ending");
    }

    #[test]
    fn test_stage_out_of_order_is_rejected() {
        let source = BUNDLED_STORY
            .replace("- stage: university", "- stage: PLACEHOLDER")
            .replace("- stage: laptop", "- stage: university")
            .replace("- stage: PLACEHOLDER", "- stage: laptop");
        assert_validation(
            compile_story_book(&source),
            "stage laptop listed where university belongs",
        );
    }

    #[test]
    fn test_blank_scan_label_is_rejected() {
        let source = BUNDLED_STORY.replace("scan_label: BOOKS", "scan_label: \"  \"");
        assert_validation(compile_story_book(&source), "stage books has an empty scan_label");
    }

    #[test]
    fn test_wrong_stage_count_is_rejected() {
        let source = "loader_delay_ms: 0\nstages: []\nstories: {}\n";
        assert_validation(compile_story_book(source), "expected 4 stages, found 0");
    }
}
