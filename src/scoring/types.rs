use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed maximum for the SAT, overriding any user-entered test total.
pub const SAT_TOTAL: f64 = 1600.0;

/// Default maximum for matric/O-Level and FSc/A-Level marks.
pub const DEFAULT_BOARD_TOTAL: f64 = 1100.0;

/// Default maximum for the NU and NAT entry tests.
pub const DEFAULT_TEST_TOTAL: f64 = 100.0;

/// Marks obtained out of a maximum.
///
/// `total > 0` and `obtained >= 0` are expected but not enforced here;
/// see [`crate::scoring::validate_input`] for the boundary checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    pub obtained: f64,
    pub total: f64,
}

impl ScorePair {
    pub fn new(obtained: f64, total: f64) -> Self {
        Self { obtained, total }
    }

    /// `(obtained / total) * 100` with no zero check.
    pub fn percentage(&self) -> f64 {
        (self.obtained / self.total) * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EducationTrack {
    #[default]
    #[serde(rename = "fsc", alias = "FSc")]
    Fsc,
    #[serde(rename = "a-level", alias = "A-Level", alias = "alevel")]
    ALevel,
}

impl EducationTrack {
    pub const ALL: [EducationTrack; 2] = [EducationTrack::Fsc, EducationTrack::ALevel];

    /// Label of the higher-secondary qualification ("FSc" or "A-Level")
    pub fn label(&self) -> &'static str {
        match self {
            EducationTrack::Fsc => "FSc",
            EducationTrack::ALevel => "A-Level",
        }
    }

    /// Label of the secondary qualification for this track
    pub fn secondary_label(&self) -> &'static str {
        match self {
            EducationTrack::Fsc => "Matric",
            EducationTrack::ALevel => "O-Level",
        }
    }

    pub fn receives_bonus(&self) -> bool {
        matches!(self, EducationTrack::ALevel)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fsc" => Some(EducationTrack::Fsc),
            "a-level" | "alevel" | "a" => Some(EducationTrack::ALevel),
            _ => None,
        }
    }
}

impl fmt::Display for EducationTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntryTestKind {
    #[default]
    #[serde(rename = "nu", alias = "NU")]
    Nu,
    #[serde(rename = "nat", alias = "NAT")]
    Nat,
    #[serde(rename = "sat", alias = "SAT")]
    Sat,
}

impl EntryTestKind {
    pub const ALL: [EntryTestKind; 3] = [EntryTestKind::Nu, EntryTestKind::Nat, EntryTestKind::Sat];

    pub fn label(&self) -> &'static str {
        match self {
            EntryTestKind::Nu => "NU",
            EntryTestKind::Nat => "NAT",
            EntryTestKind::Sat => "SAT",
        }
    }

    /// Standardized maximum, if this test has one
    pub fn fixed_total(&self) -> Option<f64> {
        match self {
            EntryTestKind::Sat => Some(SAT_TOTAL),
            EntryTestKind::Nu | EntryTestKind::Nat => None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nu" => Some(EntryTestKind::Nu),
            "nat" => Some(EntryTestKind::Nat),
            "sat" => Some(EntryTestKind::Sat),
            _ => None,
        }
    }
}

impl fmt::Display for EntryTestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the three score slots of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreField {
    Secondary,
    Higher,
    Test,
}

impl ScoreField {
    pub const ALL: [ScoreField; 3] = [ScoreField::Secondary, ScoreField::Higher, ScoreField::Test];

    /// Contribution of this category to the composite
    pub fn weight(&self) -> f64 {
        match self {
            ScoreField::Secondary => 0.10,
            ScoreField::Higher => 0.40,
            ScoreField::Test => 0.50,
        }
    }

    /// Display label, which depends on the education track
    pub fn label(&self, track: EducationTrack) -> &'static str {
        match self {
            ScoreField::Secondary => track.secondary_label(),
            ScoreField::Higher => track.label(),
            ScoreField::Test => "Entry Test",
        }
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoreField::Secondary => "matric",
            ScoreField::Higher => "inter",
            ScoreField::Test => "test",
        };
        f.write_str(name)
    }
}

/// Immutable snapshot of the form, the sole input to [`crate::scoring::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateInput {
    pub secondary: ScorePair,
    pub higher: ScorePair,
    pub test_kind: EntryTestKind,
    pub test: ScorePair,
    pub track: EducationTrack,
}

impl AggregateInput {
    pub fn pair(&self, field: ScoreField) -> ScorePair {
        match field {
            ScoreField::Secondary => self.secondary,
            ScoreField::Higher => self.higher,
            ScoreField::Test => self.test,
        }
    }
}

impl Default for AggregateInput {
    fn default() -> Self {
        Self {
            secondary: ScorePair::new(0.0, DEFAULT_BOARD_TOTAL),
            higher: ScorePair::new(0.0, DEFAULT_BOARD_TOTAL),
            test_kind: EntryTestKind::Nu,
            test: ScorePair::new(0.0, DEFAULT_TEST_TOTAL),
            track: EducationTrack::Fsc,
        }
    }
}

/// Unweighted percentage of each category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryPercentages {
    pub secondary: f64,
    pub higher: f64,
    pub test: f64,
}

impl CategoryPercentages {
    pub fn get(&self, field: ScoreField) -> f64 {
        match field {
            ScoreField::Secondary => self.secondary,
            ScoreField::Higher => self.higher,
            ScoreField::Test => self.test,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryContribution {
    pub field: ScoreField,
    pub weight: f64,
    pub percentage: f64,
    pub weighted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub contributions: Vec<CategoryContribution>,
    pub weighted_sum: f64,
    pub bonus_applied: bool,
    pub after_bonus: f64,
    pub clamped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub composite_score: f64,
    pub category_percentages: CategoryPercentages,
    pub breakdown: ScoreBreakdown,
}
