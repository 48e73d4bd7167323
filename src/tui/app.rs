use crate::config::Config;
use crate::form::FormDraft;
use crate::scoring::{
    compute, parse_mark, validate_input, AggregateInput, AggregateResult, EducationTrack,
    EntryTestKind, InvalidInput, MarkPart, ScoreField,
};
use crate::tui::theme::ThemeColors;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Form,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

/// A focusable row of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Track,
    Mark(ScoreField, MarkPart),
    TestKind,
    Calculate,
}

/// Top to bottom, the order rows appear on screen
pub const FORM_ROWS: [FormRow; 9] = [
    FormRow::Track,
    FormRow::Mark(ScoreField::Secondary, MarkPart::Obtained),
    FormRow::Mark(ScoreField::Secondary, MarkPart::Total),
    FormRow::Mark(ScoreField::Higher, MarkPart::Obtained),
    FormRow::Mark(ScoreField::Higher, MarkPart::Total),
    FormRow::TestKind,
    FormRow::Mark(ScoreField::Test, MarkPart::Obtained),
    FormRow::Mark(ScoreField::Test, MarkPart::Total),
    FormRow::Calculate,
];

/// Raw text typed into each mark box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkEntries {
    entries: [[String; 2]; 3],
}

impl MarkEntries {
    fn index(field: ScoreField, part: MarkPart) -> (usize, usize) {
        let f = match field {
            ScoreField::Secondary => 0,
            ScoreField::Higher => 1,
            ScoreField::Test => 2,
        };
        let p = match part {
            MarkPart::Obtained => 0,
            MarkPart::Total => 1,
        };
        (f, p)
    }

    pub fn get(&self, field: ScoreField, part: MarkPart) -> &str {
        let (f, p) = Self::index(field, part);
        &self.entries[f][p]
    }

    fn get_mut(&mut self, field: ScoreField, part: MarkPart) -> &mut String {
        let (f, p) = Self::index(field, part);
        &mut self.entries[f][p]
    }

    /// Entries mirroring a draft. Zero obtained marks show as an empty box.
    fn from_draft(draft: &FormDraft) -> Self {
        let mut entries = Self::default();
        for field in ScoreField::ALL {
            let pair = draft.pair(field);
            if pair.obtained != 0.0 {
                *entries.get_mut(field, MarkPart::Obtained) = format_mark(pair.obtained);
            }
            *entries.get_mut(field, MarkPart::Total) = format_mark(pair.total);
        }
        entries
    }
}

/// Render a mark without a trailing ".0"
pub fn format_mark(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

pub struct App {
    pub draft: FormDraft,
    pub entries: MarkEntries,
    pub focus: usize,
    pub section: Section,
    pub input_mode: InputMode,
    pub result: Option<(AggregateInput, AggregateResult)>,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub precision: usize,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(config: &Config, theme: ThemeColors) -> Self {
        let draft = FormDraft::from_defaults(&config.form_defaults());
        let entries = MarkEntries::from_draft(&draft);
        Self {
            draft,
            entries,
            focus: 0,
            section: Section::Form,
            input_mode: InputMode::Normal,
            result: None,
            flash_message: None,
            should_quit: false,
            precision: config.display_config().precision(),
            theme,
        }
    }

    pub fn focused_row(&self) -> FormRow {
        FORM_ROWS[self.focus]
    }

    pub fn next_row(&mut self) {
        self.focus = (self.focus + 1) % FORM_ROWS.len();
    }

    pub fn previous_row(&mut self) {
        self.focus = if self.focus == 0 {
            FORM_ROWS.len() - 1
        } else {
            self.focus - 1
        };
    }

    /// Cycle the focused selection (education system or entry test)
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.focused_row() {
            FormRow::Track => {
                let next = cycle(&EducationTrack::ALL, self.draft.track(), forward);
                self.draft.select_track(next);
            }
            FormRow::TestKind => {
                let next = cycle(&EntryTestKind::ALL, self.draft.test_kind(), forward);
                self.select_test_kind(next);
            }
            _ => {}
        }
    }

    pub fn select_test_kind(&mut self, kind: EntryTestKind) {
        self.draft.select_test_kind(kind);
        // The transition may have rewritten the total
        let total = self.draft.pair(ScoreField::Test).total;
        *self.entries.get_mut(ScoreField::Test, MarkPart::Total) = format_mark(total);
    }

    /// Type a character into the focused mark box
    pub fn push_char(&mut self, c: char) {
        if let FormRow::Mark(field, part) = self.focused_row() {
            if c.is_ascii_digit() || c == '.' || c == '-' {
                self.entries.get_mut(field, part).push(c);
                self.sync_entry(field, part);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let FormRow::Mark(field, part) = self.focused_row() {
            self.entries.get_mut(field, part).pop();
            self.sync_entry(field, part);
        }
    }

    fn sync_entry(&mut self, field: ScoreField, part: MarkPart) {
        // Half-typed values ("7.", "-") stay in the box and are checked on calculate
        if let Ok(value) = parse_mark(field, part, self.entries.get(field, part)) {
            self.draft.set_mark(field, part, value);
        }
    }

    /// Parse every box, validate the snapshot and compute.
    pub fn calculate(&mut self) {
        let mut errors: Vec<InvalidInput> = Vec::new();
        for field in ScoreField::ALL {
            for part in [MarkPart::Obtained, MarkPart::Total] {
                match parse_mark(field, part, self.entries.get(field, part)) {
                    Ok(value) => self.draft.set_mark(field, part, value),
                    Err(e) => errors.push(e),
                }
            }
        }

        let input = self.draft.snapshot();
        if errors.is_empty() {
            if let Err(invalid) = validate_input(&input) {
                errors = invalid;
            }
        }

        if let Some(first) = errors.first() {
            tracing::debug!(count = errors.len(), "form has invalid entries");
            let msg = if errors.len() > 1 {
                format!("Invalid: {} (+{} more)", first, errors.len() - 1)
            } else {
                format!("Invalid: {}", first)
            };
            self.show_flash(msg);
            return;
        }

        let result = compute(&input);
        tracing::debug!(aggregate = result.composite_score, "aggregate calculated");
        self.result = Some((input, result));
        self.section = Section::Results;
        self.show_flash("Aggregate calculated".to_string());
    }

    /// Handle Enter on the form
    pub fn activate(&mut self) {
        match self.focused_row() {
            FormRow::Calculate => self.calculate(),
            FormRow::Track | FormRow::TestKind => self.cycle_choice(true),
            FormRow::Mark(..) => self.next_row(),
        }
    }

    /// Toggle Calculator/Results. Results only exists after a calculation.
    pub fn toggle_section(&mut self) {
        self.section = match self.section {
            Section::Form if self.result.is_some() => Section::Results,
            _ => Section::Form,
        };
    }

    pub fn edit(&mut self) {
        self.section = Section::Form;
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let pos = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % all.len()
    } else {
        (pos + all.len() - 1) % all.len()
    };
    all[next]
}
