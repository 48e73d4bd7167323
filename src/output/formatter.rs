use std::io::IsTerminal;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::config::{ColorMode, DisplayConfig};
use crate::scoring::{AggregateInput, AggregateResult, A_LEVEL_BONUS};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}

/// Fractional digits needed to print any f64 exactly (2^-1074).
const EXACT_DIGITS: usize = 1074;

/// Format a percentage with a fixed number of decimals ("80.91%").
/// Ties round away from zero (0.125 -> "0.13"), negative zero prints unsigned.
/// Non-finite values keep their float spelling ("NaN%", "inf%").
pub fn format_percentage(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return format!("{}%", value);
    }
    format!("{}%", round_half_up(value, precision))
}

/// Round on the exact decimal expansion. `{:.N}` would round ties to even.
fn round_half_up(value: f64, precision: usize) -> String {
    let exact = format!("{:.*}", EXACT_DIGITS.max(precision + 1), value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(precision))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes().get(precision).is_some_and(|&b| b >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let int_len = digits.len() - precision;
    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(digits[..int_len].iter().map(|d| char::from(b'0' + d)));
    if precision > 0 {
        out.push('.');
        out.extend(digits[int_len..].iter().map(|d| char::from(b'0' + d)));
    }
    out
}

/// Format the explanatory line under the results
pub fn format_formula_note(input: &AggregateInput) -> String {
    let mut note = format!(
        "Based on the FAST University admission formula: Matric/O-Level (10%) + {} (40%) + {} Entry Test (50%)",
        input.track.label(),
        input.test_kind.label()
    );
    if input.track.receives_bonus() {
        note.push_str(" with 10% additional weightage for A-Level students.");
    }
    note
}

/// Format the full result block: aggregate, breakdown and formula note
pub fn format_result(
    input: &AggregateInput,
    result: &AggregateResult,
    display: &DisplayConfig,
    use_colors: bool,
) -> String {
    let precision = display.precision();
    let mut lines = Vec::new();

    let aggregate = format_percentage(result.composite_score, precision);
    if use_colors {
        lines.push(format!("Aggregate: {}", aggregate.bold().bright_blue()));
    } else {
        lines.push(format!("Aggregate: {}", aggregate));
    }
    lines.push(String::new());
    lines.push("Score Breakdown".to_string());

    let labels: Vec<String> = result
        .breakdown
        .contributions
        .iter()
        .map(|c| format!("{} ({:.0}%):", c.field.label(input.track), c.weight * 100.0))
        .collect();
    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

    for (label, contribution) in labels.iter().zip(&result.breakdown.contributions) {
        let pct = format_percentage(contribution.percentage, precision);
        if use_colors {
            lines.push(format!("  {:<width$}  {}", label.dimmed(), pct.cyan(), width = label_width));
        } else {
            lines.push(format!("  {:<width$}  {}", label, pct, width = label_width));
        }
    }

    if result.breakdown.bonus_applied {
        let label = format!("A-Level Bonus ({:.0}%):", (A_LEVEL_BONUS - 1.0) * 100.0);
        if use_colors {
            lines.push(format!("  {}  {}", label.dimmed(), "Applied".green()));
        } else {
            lines.push(format!("  {}  Applied", label));
        }
    }

    if result.breakdown.clamped {
        let note = format!(
            "  Capped at 100% (uncapped {})",
            format_percentage(result.breakdown.after_bonus, precision)
        );
        if use_colors {
            lines.push(note.yellow().to_string());
        } else {
            lines.push(note);
        }
    }

    lines.push(String::new());
    lines.push(format_formula_note(input));

    lines.join("\n")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    input: &'a AggregateInput,
    result: &'a AggregateResult,
}

/// Format input and result as a pretty JSON document.
/// Non-finite numbers become `null`.
pub fn format_json(input: &AggregateInput, result: &AggregateResult) -> Result<String> {
    serde_json::to_string_pretty(&JsonReport { input, result })
        .context("Failed to serialize aggregate result")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{compute, EducationTrack, EntryTestKind, ScorePair};

    fn scenario(track: EducationTrack) -> AggregateInput {
        AggregateInput {
            secondary: ScorePair::new(900.0, 1100.0),
            higher: ScorePair::new(900.0, 1100.0),
            test_kind: EntryTestKind::Nu,
            test: ScorePair::new(80.0, 100.0),
            track,
        }
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(80.909_090_9, 2), "80.91%");
        assert_eq!(format_percentage(89.0, 2), "89.00%");
        assert_eq!(format_percentage(100.0, 0), "100%");
        assert_eq!(format_percentage(f64::NAN, 2), "NaN%");
        assert_eq!(format_percentage(f64::INFINITY, 2), "inf%");
        assert_eq!(format_percentage(f64::NEG_INFINITY, 2), "-inf%");
    }

    #[test]
    fn test_format_percentage_ties_round_up() {
        // 1/800 is exactly 0.125%
        let pct = ScorePair::new(1.0, 800.0).percentage();
        assert_eq!(format_percentage(pct, 2), "0.13%");
        assert_eq!(format_percentage(0.125, 2), "0.13%");
        assert_eq!(format_percentage(80.125, 2), "80.13%");
        assert_eq!(format_percentage(0.5, 0), "1%");
        assert_eq!(format_percentage(99.5, 0), "100%");
        assert_eq!(format_percentage(99.995, 2), "100.00%"); // stored just above the tie
        assert_eq!(format_percentage(2.675, 2), "2.67%"); // stored just below
    }

    #[test]
    fn test_format_percentage_signs() {
        assert_eq!(format_percentage(-0.0, 2), "0.00%");
        assert_eq!(format_percentage(-12.345, 1), "-12.3%");
        assert_eq!(format_percentage(-0.125, 2), "-0.13%");
        assert_eq!(format_percentage(9.999, 2), "10.00%");
    }

    #[test]
    fn test_format_result_fsc() {
        let input = scenario(EducationTrack::Fsc);
        let result = compute(&input);
        let output = format_result(&input, &result, &DisplayConfig::default(), false);

        assert!(output.starts_with("Aggregate: 80.91%"));
        assert!(output.contains("Matric (10%):"));
        assert!(output.contains("FSc (40%):"));
        assert!(output.contains("Entry Test (50%):"));
        assert!(output.contains("81.82%"));
        assert!(output.contains("80.00%"));
        assert!(!output.contains("Bonus"));
        assert!(!output.contains("Capped"));
    }

    #[test]
    fn test_format_result_a_level() {
        let input = scenario(EducationTrack::ALevel);
        let result = compute(&input);
        let output = format_result(&input, &result, &DisplayConfig::default(), false);

        assert!(output.starts_with("Aggregate: 89.00%"));
        assert!(output.contains("O-Level (10%):"));
        assert!(output.contains("A-Level (40%):"));
        assert!(output.contains("A-Level Bonus (10%):  Applied"));
        assert!(output.contains("with 10% additional weightage for A-Level students."));
    }

    #[test]
    fn test_format_result_clamped() {
        let input = AggregateInput {
            secondary: ScorePair::new(1100.0, 1100.0),
            higher: ScorePair::new(1100.0, 1100.0),
            test_kind: EntryTestKind::Sat,
            test: ScorePair::new(1600.0, 1600.0),
            track: EducationTrack::ALevel,
        };
        let result = compute(&input);
        let output = format_result(&input, &result, &DisplayConfig::default(), false);

        assert!(output.starts_with("Aggregate: 100.00%"));
        assert!(output.contains("Capped at 100% (uncapped 110.00%)"));
        assert!(output.contains("SAT Entry Test (50%)"));
    }

    #[test]
    fn test_format_result_precision() {
        let input = scenario(EducationTrack::Fsc);
        let result = compute(&input);
        let display = DisplayConfig {
            precision: Some(4),
            ..DisplayConfig::default()
        };
        let output = format_result(&input, &result, &display, false);
        assert!(output.starts_with("Aggregate: 80.9091%"));
    }

    #[test]
    fn test_formula_note() {
        let mut input = scenario(EducationTrack::Fsc);
        input.test_kind = EntryTestKind::Nat;
        assert_eq!(
            format_formula_note(&input),
            "Based on the FAST University admission formula: Matric/O-Level (10%) + FSc (40%) + NAT Entry Test (50%)"
        );
    }

    #[test]
    fn test_format_json() {
        let input = scenario(EducationTrack::ALevel);
        let result = compute(&input);
        let json = format_json(&input, &result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["input"]["track"], "a-level");
        assert_eq!(value["input"]["test_kind"], "nu");
        assert_eq!(value["result"]["breakdown"]["bonus_applied"], true);
        assert_eq!(value["result"]["category_percentages"]["test"], 80.0);
        let composite = value["result"]["composite_score"].as_f64().unwrap();
        assert!((composite - 89.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_json_non_finite_is_null() {
        let input = AggregateInput {
            secondary: ScorePair::new(0.0, 0.0),
            ..scenario(EducationTrack::Fsc)
        };
        let result = compute(&input);
        let json = format_json(&input, &result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["result"]["composite_score"].is_null());
        assert!(value["result"]["category_percentages"]["secondary"].is_null());
    }
}
