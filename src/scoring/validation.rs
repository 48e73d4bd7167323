use super::types::{AggregateInput, ScoreField};
use std::fmt;

/// Which half of a score pair a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkPart {
    Obtained,
    Total,
}

impl fmt::Display for MarkPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkPart::Obtained => f.write_str("obtained"),
            MarkPart::Total => f.write_str("total"),
        }
    }
}

/// A value the form layer refuses to hand to the engine.
///
/// [`crate::scoring::compute`] never produces or checks these; they exist
/// for callers that want to reject unusable entries up front.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidInput {
    NotANumber {
        field: ScoreField,
        part: MarkPart,
        raw: String,
    },
    NonFinite {
        field: ScoreField,
        part: MarkPart,
    },
    ZeroTotal {
        field: ScoreField,
    },
    NegativeTotal {
        field: ScoreField,
        total: f64,
    },
    NegativeObtained {
        field: ScoreField,
        obtained: f64,
    },
    ObtainedExceedsTotal {
        field: ScoreField,
        obtained: f64,
        total: f64,
    },
}

impl InvalidInput {
    pub fn field(&self) -> ScoreField {
        match self {
            InvalidInput::NotANumber { field, .. }
            | InvalidInput::NonFinite { field, .. }
            | InvalidInput::ZeroTotal { field }
            | InvalidInput::NegativeTotal { field, .. }
            | InvalidInput::NegativeObtained { field, .. }
            | InvalidInput::ObtainedExceedsTotal { field, .. } => *field,
        }
    }
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::NotANumber { field, part, raw } => {
                write!(f, "{}.{}: '{}' is not a number", field, part, raw)
            }
            InvalidInput::NonFinite { field, part } => {
                write!(f, "{}.{}: must be a finite number", field, part)
            }
            InvalidInput::ZeroTotal { field } => {
                write!(f, "{}.total: must not be zero", field)
            }
            InvalidInput::NegativeTotal { field, total } => {
                write!(f, "{}.total: must be positive (got {})", field, total)
            }
            InvalidInput::NegativeObtained { field, obtained } => {
                write!(f, "{}.obtained: must be non-negative (got {})", field, obtained)
            }
            InvalidInput::ObtainedExceedsTotal {
                field,
                obtained,
                total,
            } => write!(
                f,
                "{}.obtained: {} exceeds the total of {}",
                field, obtained, total
            ),
        }
    }
}

impl std::error::Error for InvalidInput {}

/// Parse one mark typed into the form.
///
/// An empty entry counts as 0, the same as a cleared number box.
pub fn parse_mark(field: ScoreField, part: MarkPart, raw: &str) -> Result<f64, InvalidInput> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = trimmed.parse().map_err(|_| InvalidInput::NotANumber {
        field,
        part,
        raw: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(InvalidInput::NonFinite { field, part });
    }
    Ok(value)
}

/// Check a snapshot before computing.
/// Returns all problems at once (not just the first).
pub fn validate_input(input: &AggregateInput) -> Result<(), Vec<InvalidInput>> {
    let mut errors = Vec::new();

    for field in ScoreField::ALL {
        let pair = input.pair(field);

        if !pair.obtained.is_finite() {
            errors.push(InvalidInput::NonFinite {
                field,
                part: MarkPart::Obtained,
            });
        }
        if !pair.total.is_finite() {
            errors.push(InvalidInput::NonFinite {
                field,
                part: MarkPart::Total,
            });
            continue;
        }

        if pair.total == 0.0 {
            errors.push(InvalidInput::ZeroTotal { field });
        } else if pair.total < 0.0 {
            errors.push(InvalidInput::NegativeTotal {
                field,
                total: pair.total,
            });
        }

        if pair.obtained < 0.0 {
            errors.push(InvalidInput::NegativeObtained {
                field,
                obtained: pair.obtained,
            });
        } else if pair.total > 0.0 && pair.obtained > pair.total {
            errors.push(InvalidInput::ObtainedExceedsTotal {
                field,
                obtained: pair.obtained,
                total: pair.total,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = errors.len(), "rejected aggregate input");
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScorePair;

    #[test]
    fn test_default_input_is_valid() {
        assert!(validate_input(&AggregateInput::default()).is_ok());
    }

    #[test]
    fn test_zero_total_rejected() {
        let input = AggregateInput {
            secondary: ScorePair::new(900.0, 0.0),
            ..AggregateInput::default()
        };
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(errors, vec![InvalidInput::ZeroTotal { field: ScoreField::Secondary }]);
        assert_eq!(errors[0].to_string(), "matric.total: must not be zero");
    }

    #[test]
    fn test_negative_values_rejected() {
        let input = AggregateInput {
            higher: ScorePair::new(-5.0, -1100.0),
            ..AggregateInput::default()
        };
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], InvalidInput::NegativeTotal { field: ScoreField::Higher, .. }));
        assert!(matches!(errors[1], InvalidInput::NegativeObtained { field: ScoreField::Higher, .. }));
    }

    #[test]
    fn test_obtained_above_total_rejected() {
        let input = AggregateInput {
            test: ScorePair::new(120.0, 100.0),
            ..AggregateInput::default()
        };
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(errors[0].field(), ScoreField::Test);
        assert!(errors[0].to_string().contains("exceeds the total of 100"));
    }

    #[test]
    fn test_non_finite_rejected() {
        let input = AggregateInput {
            test: ScorePair::new(f64::NAN, f64::INFINITY),
            ..AggregateInput::default()
        };
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, InvalidInput::NonFinite { .. })));
    }

    #[test]
    fn test_collects_all_errors() {
        let input = AggregateInput {
            secondary: ScorePair::new(1.0, 0.0),
            higher: ScorePair::new(-1.0, 1100.0),
            test: ScorePair::new(101.0, 100.0),
            ..AggregateInput::default()
        };
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(errors.len(), 3);
        let fields: Vec<ScoreField> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, ScoreField::ALL.to_vec());
    }

    #[test]
    fn test_parse_mark() {
        assert_eq!(parse_mark(ScoreField::Test, MarkPart::Obtained, "80"), Ok(80.0));
        assert_eq!(parse_mark(ScoreField::Test, MarkPart::Obtained, " 72.5 "), Ok(72.5));
        assert_eq!(parse_mark(ScoreField::Test, MarkPart::Obtained, ""), Ok(0.0));
    }

    #[test]
    fn test_parse_mark_rejects_garbage() {
        let err = parse_mark(ScoreField::Higher, MarkPart::Total, "eleven").unwrap_err();
        assert_eq!(err.to_string(), "inter.total: 'eleven' is not a number");

        let err = parse_mark(ScoreField::Higher, MarkPart::Total, "inf").unwrap_err();
        assert_eq!(
            err,
            InvalidInput::NonFinite {
                field: ScoreField::Higher,
                part: MarkPart::Total
            }
        );
    }
}
