//! Closed enumerations of scan stages, ending paths and story keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four scan checkpoints, in story order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Stage 0.
    University,
    /// Stage 1.
    Laptop,
    /// Stage 2, the side quest that decides the ending.
    Books,
    /// Stage 3, the terminal stage.
    Beer,
}

impl Stage {
    /// Number of stages in a story.
    pub const COUNT: usize = 4;

    /// All stages in scan order.
    pub const ALL: [Self; Self::COUNT] = [Self::University, Self::Laptop, Self::Books, Self::Beer];

    /// Returns the zero-based position of this stage.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the stage at `index`, or `None` outside `0..4`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the lowercase stage name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::University => "university",
            Self::Laptop => "laptop",
            Self::Books => "books",
            Self::Beer => "beer",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The terminal branch of the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndingPath {
    /// The books stage was visited before the beer stage.
    Success,
    /// The beer stage was reached without visiting the books stage.
    Failure,
}

impl EndingPath {
    /// Derives the ending from the side-quest flag.
    #[must_use]
    pub fn from_studied_books(studied_books: bool) -> Self {
        if studied_books {
            Self::Success
        } else {
            Self::Failure
        }
    }

    /// Returns the lowercase path name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for EndingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies one of the five authored narrative units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryKey {
    /// Chapter shown for the university stage.
    University,
    /// Chapter shown for the laptop stage.
    Laptop,
    /// Chapter shown for the books stage.
    Books,
    /// Beer chapter when the books were studied.
    BeerSuccess,
    /// Beer chapter when the books were skipped.
    BeerFailure,
}

impl StoryKey {
    /// Number of authored narrative units.
    pub const COUNT: usize = 5;

    /// All story keys in authoring order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::University,
        Self::Laptop,
        Self::Books,
        Self::BeerSuccess,
        Self::BeerFailure,
    ];

    /// Returns the zero-based position of this key.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the stage whose completion shows this unit.
    #[must_use]
    pub fn stage(self) -> Stage {
        match self {
            Self::University => Stage::University,
            Self::Laptop => Stage::Laptop,
            Self::Books => Stage::Books,
            Self::BeerSuccess | Self::BeerFailure => Stage::Beer,
        }
    }

    /// Returns the ending this unit belongs to, if it is an ending unit.
    #[must_use]
    pub fn ending(self) -> Option<EndingPath> {
        match self {
            Self::BeerSuccess => Some(EndingPath::Success),
            Self::BeerFailure => Some(EndingPath::Failure),
            Self::University | Self::Laptop | Self::Books => None,
        }
    }

    /// Returns the snake-case key used in story sources.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::University => "university",
            Self::Laptop => "laptop",
            Self::Books => "books",
            Self::BeerSuccess => "beer_success",
            Self::BeerFailure => "beer_failure",
        }
    }
}

impl fmt::Display for StoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
