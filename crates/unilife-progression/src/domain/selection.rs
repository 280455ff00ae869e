//! Narrative unit selection.

use unilife_content::domain::stage::{EndingPath, Stage, StoryKey};

/// Picks the narrative unit shown when `stage` completes.
#[must_use]
pub fn select_story(stage: Stage, studied_books: bool) -> StoryKey {
    match stage {
        Stage::University => StoryKey::University,
        Stage::Laptop => StoryKey::Laptop,
        Stage::Books => StoryKey::Books,
        Stage::Beer => ending_story(EndingPath::from_studied_books(studied_books)),
    }
}

/// The beer chapter for an ending path.
#[must_use]
pub fn ending_story(path: EndingPath) -> StoryKey {
    match path {
        EndingPath::Success => StoryKey::BeerSuccess,
        EndingPath::Failure => StoryKey::BeerFailure,
    }
}
