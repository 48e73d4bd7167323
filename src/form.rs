use crate::config::FormDefaults;
use crate::scoring::{
    AggregateInput, EducationTrack, EntryTestKind, MarkPart, ScoreField, ScorePair,
    DEFAULT_BOARD_TOTAL, DEFAULT_TEST_TOTAL,
};

/// Mutable form state owned by a front-end.
///
/// The engine only ever sees the immutable [`AggregateInput`] returned by
/// [`FormDraft::snapshot`]. Selection side effects live here as explicit
/// transitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraft {
    input: AggregateInput,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank form seeded from configured defaults
    pub fn from_defaults(defaults: &FormDefaults) -> Self {
        let mut draft = Self::default();
        draft.input.secondary.total = defaults.matric_total.unwrap_or(DEFAULT_BOARD_TOTAL);
        draft.input.higher.total = defaults.inter_total.unwrap_or(DEFAULT_BOARD_TOTAL);
        draft.input.test.total = defaults.test_total.unwrap_or(DEFAULT_TEST_TOTAL);
        draft.select_track(defaults.track.unwrap_or_default());
        draft.select_test_kind(defaults.test_kind.unwrap_or_default());
        draft
    }

    pub fn track(&self) -> EducationTrack {
        self.input.track
    }

    pub fn test_kind(&self) -> EntryTestKind {
        self.input.test_kind
    }

    pub fn pair(&self, field: ScoreField) -> ScorePair {
        self.input.pair(field)
    }

    fn pair_mut(&mut self, field: ScoreField) -> &mut ScorePair {
        match field {
            ScoreField::Secondary => &mut self.input.secondary,
            ScoreField::Higher => &mut self.input.higher,
            ScoreField::Test => &mut self.input.test,
        }
    }

    /// Switch education system. Only labels and the bonus change; the same
    /// score slots are reused.
    pub fn select_track(&mut self, track: EducationTrack) {
        self.input.track = track;
    }

    /// Switch entry test.
    ///
    /// A test with a standardized maximum (SAT) overwrites the test total.
    /// Other tests leave the total as last set, so switching back from SAT
    /// keeps 1600. Obtained marks are never touched.
    pub fn select_test_kind(&mut self, kind: EntryTestKind) {
        self.input.test_kind = kind;
        if let Some(total) = kind.fixed_total() {
            tracing::debug!(test = %kind, total, "entry test forces total");
            self.input.test.total = total;
        }
    }

    /// Owned form of [`FormDraft::select_test_kind`]
    pub fn with_test_kind(mut self, kind: EntryTestKind) -> Self {
        self.select_test_kind(kind);
        self
    }

    pub fn set_obtained(&mut self, field: ScoreField, value: f64) {
        self.pair_mut(field).obtained = value;
    }

    pub fn set_total(&mut self, field: ScoreField, value: f64) {
        self.pair_mut(field).total = value;
    }

    pub fn set_mark(&mut self, field: ScoreField, part: MarkPart, value: f64) {
        match part {
            MarkPart::Obtained => self.set_obtained(field, value),
            MarkPart::Total => self.set_total(field, value),
        }
    }

    pub fn mark(&self, field: ScoreField, part: MarkPart) -> f64 {
        let pair = self.pair(field);
        match part {
            MarkPart::Obtained => pair.obtained,
            MarkPart::Total => pair.total,
        }
    }

    /// Immutable copy of the current form for the engine
    pub fn snapshot(&self) -> AggregateInput {
        self.input
    }
}
