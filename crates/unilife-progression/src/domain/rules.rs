//! Static stage rule table.
//!
//! Each stage is admitted against the session's completed count. The first
//! three stages require an exact match, so scans must arrive in order and
//! cannot repeat. The beer stage is admitted from the book-decision point
//! onward, which lets it close the story whether or not the books were
//! visited.

use unilife_content::domain::stage::Stage;

/// How a rule compares the completed count against its requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Completed count must equal the requirement.
    Exact,
    /// Completed count must be at least the requirement.
    AtLeast,
}

/// State change a rule applies once admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEffect {
    /// Mark the stage complete.
    Advance,
    /// Mark the stage complete and record that the books were studied.
    StudyBooks,
    /// Mark the stage complete and resolve the ending path.
    ResolveEnding,
}

/// Rule governing one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRule {
    /// The stage this rule admits.
    pub stage: Stage,
    /// Completed count the rule compares against.
    pub required_count: usize,
    /// Comparison used for admission.
    pub admission: Admission,
    /// Effect applied when admitted.
    pub effect: StageEffect,
}

/// Rules indexed by stage.
pub const STAGE_RULES: [StageRule; Stage::COUNT] = [
    StageRule {
        stage: Stage::University,
        required_count: 0,
        admission: Admission::Exact,
        effect: StageEffect::Advance,
    },
    StageRule {
        stage: Stage::Laptop,
        required_count: 1,
        admission: Admission::Exact,
        effect: StageEffect::Advance,
    },
    StageRule {
        stage: Stage::Books,
        required_count: 2,
        admission: Admission::Exact,
        effect: StageEffect::StudyBooks,
    },
    StageRule {
        stage: Stage::Beer,
        required_count: 2,
        admission: Admission::AtLeast,
        effect: StageEffect::ResolveEnding,
    },
];

impl StageRule {
    /// Whether a scan of this rule's stage is admitted at `completed_count`.
    #[must_use]
    pub fn admits(&self, completed_count: usize) -> bool {
        match self.admission {
            Admission::Exact => completed_count == self.required_count,
            Admission::AtLeast => completed_count >= self.required_count,
        }
    }
}

/// Looks up the rule for a raw scanned stage index. Negative or unknown
/// indices have no rule.
#[must_use]
pub fn rule_for(stage_index: i64) -> Option<&'static StageRule> {
    usize::try_from(stage_index)
        .ok()
        .and_then(|index| STAGE_RULES.get(index))
}
