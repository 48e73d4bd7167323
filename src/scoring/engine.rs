use super::types::{
    AggregateInput, AggregateResult, CategoryContribution, CategoryPercentages, ScoreBreakdown,
    ScoreField,
};

/// Relative bonus applied to the composite for A-Level students.
pub const A_LEVEL_BONUS: f64 = 1.10;

/// Upper bound of the composite. There is no lower bound.
pub const MAX_AGGREGATE: f64 = 100.0;

/// Compute the admission aggregate for a form snapshot.
///
/// Never fails. Percentages are `(obtained / total) * 100` with no guard, so a
/// zero total produces `inf` or `NaN` and negative or out-of-range marks flow
/// through the arithmetic unchanged. The composite is weighted 10/40/50, then
/// multiplied by [`A_LEVEL_BONUS`] for A-Level, then capped at
/// [`MAX_AGGREGATE`]. The cap only replaces values above 100: `NaN` passes
/// through and `+inf` becomes 100.
pub fn compute(input: &AggregateInput) -> AggregateResult {
    let percentages = CategoryPercentages {
        secondary: input.secondary.percentage(),
        higher: input.higher.percentage(),
        test: input.test.percentage(),
    };

    let contributions: Vec<CategoryContribution> = ScoreField::ALL
        .iter()
        .map(|&field| {
            let percentage = percentages.get(field);
            CategoryContribution {
                field,
                weight: field.weight(),
                percentage,
                weighted: percentage * field.weight(),
            }
        })
        .collect();

    // Left to right: secondary, higher, test
    let weighted_sum = contributions.iter().fold(0.0, |acc, c| acc + c.weighted);

    let bonus_applied = input.track.receives_bonus();
    let after_bonus = if bonus_applied {
        weighted_sum * A_LEVEL_BONUS
    } else {
        weighted_sum
    };

    let clamped = after_bonus > MAX_AGGREGATE;
    let composite_score = if clamped { MAX_AGGREGATE } else { after_bonus };

    tracing::trace!(
        secondary = percentages.secondary,
        higher = percentages.higher,
        test = percentages.test,
        weighted_sum,
        bonus_applied,
        clamped,
        composite_score,
        "computed aggregate"
    );

    AggregateResult {
        composite_score,
        category_percentages: percentages,
        breakdown: ScoreBreakdown {
            contributions,
            weighted_sum,
            bonus_applied,
            after_bonus,
            clamped,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{EducationTrack, EntryTestKind, ScorePair};

    fn sample_input(
        secondary: (f64, f64),
        higher: (f64, f64),
        test_kind: EntryTestKind,
        test: (f64, f64),
        track: EducationTrack,
    ) -> AggregateInput {
        AggregateInput {
            secondary: ScorePair::new(secondary.0, secondary.1),
            higher: ScorePair::new(higher.0, higher.1),
            test_kind,
            test: ScorePair::new(test.0, test.1),
            track,
        }
    }

    #[test]
    fn test_fsc_weighted_composite() {
        let input = sample_input(
            (900.0, 1100.0),
            (900.0, 1100.0),
            EntryTestKind::Nu,
            (80.0, 100.0),
            EducationTrack::Fsc,
        );
        let result = compute(&input);

        let expected_pct = 900.0 / 1100.0 * 100.0;
        assert!((result.category_percentages.secondary - 81.818_181_818).abs() < 1e-6);
        assert_eq!(result.category_percentages.secondary, expected_pct);
        assert_eq!(result.category_percentages.higher, expected_pct);
        assert_eq!(result.category_percentages.test, 80.0);
        assert!((result.composite_score - 80.909_090_909).abs() < 1e-6);
        assert!(!result.breakdown.bonus_applied);
        assert!(!result.breakdown.clamped);
    }

    #[test]
    fn test_a_level_bonus_applied_to_composite() {
        let input = sample_input(
            (900.0, 1100.0),
            (900.0, 1100.0),
            EntryTestKind::Nu,
            (80.0, 100.0),
            EducationTrack::ALevel,
        );
        let result = compute(&input);

        // 80.909... * 1.1 = 89.0
        assert!((result.composite_score - 89.0).abs() < 1e-9);
        assert!(result.breakdown.bonus_applied);
        assert!(!result.breakdown.clamped);
        // Category percentages are not boosted
        assert_eq!(result.category_percentages.test, 80.0);
    }

    #[test]
    fn test_full_marks_with_bonus_clamps_to_100() {
        let input = sample_input(
            (1100.0, 1100.0),
            (1100.0, 1100.0),
            EntryTestKind::Sat,
            (1600.0, 1600.0),
            EducationTrack::ALevel,
        );
        let result = compute(&input);

        assert_eq!(result.category_percentages.secondary, 100.0);
        assert_eq!(result.category_percentages.higher, 100.0);
        assert_eq!(result.category_percentages.test, 100.0);
        assert!((result.breakdown.after_bonus - 110.0).abs() < 1e-9);
        assert!(result.breakdown.clamped);
        assert_eq!(result.composite_score, 100.0);
    }

    #[test]
    fn test_bonus_before_clamp() {
        // Weighted sum of 95 becomes 104.5 and then clamps
        let input = sample_input(
            (95.0, 100.0),
            (95.0, 100.0),
            EntryTestKind::Nat,
            (95.0, 100.0),
            EducationTrack::ALevel,
        );
        let result = compute(&input);
        assert!((result.breakdown.weighted_sum - 95.0).abs() < 1e-9);
        assert!((result.breakdown.after_bonus - 104.5).abs() < 1e-9);
        assert_eq!(result.composite_score, 100.0);
    }

    #[test]
    fn test_no_lower_clamp() {
        let input = sample_input(
            (-110.0, 1100.0),
            (-1100.0, 1100.0),
            EntryTestKind::Nu,
            (-10.0, 100.0),
            EducationTrack::Fsc,
        );
        let result = compute(&input);
        // -1 - 40 - 5
        assert!((result.composite_score + 46.0).abs() < 1e-9);
        assert!(!result.breakdown.clamped);
    }

    #[test]
    fn test_obtained_above_total_propagates_before_clamp() {
        let input = sample_input(
            (2200.0, 1100.0),
            (0.0, 1100.0),
            EntryTestKind::Nu,
            (0.0, 100.0),
            EducationTrack::Fsc,
        );
        let result = compute(&input);
        assert_eq!(result.category_percentages.secondary, 200.0);
        assert!((result.composite_score - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_over_zero_total_propagates_nan() {
        let input = sample_input(
            (0.0, 0.0),
            (900.0, 1100.0),
            EntryTestKind::Nu,
            (80.0, 100.0),
            EducationTrack::Fsc,
        );
        let result = compute(&input);
        assert!(result.category_percentages.secondary.is_nan());
        assert!(result.composite_score.is_nan());
        assert!(!result.breakdown.clamped);
    }

    #[test]
    fn test_positive_over_zero_total_is_capped() {
        let input = sample_input(
            (900.0, 0.0),
            (900.0, 1100.0),
            EntryTestKind::Nu,
            (80.0, 100.0),
            EducationTrack::Fsc,
        );
        let result = compute(&input);
        assert_eq!(result.category_percentages.secondary, f64::INFINITY);
        assert_eq!(result.breakdown.weighted_sum, f64::INFINITY);
        assert!(result.breakdown.clamped);
        assert_eq!(result.composite_score, 100.0);
    }

    #[test]
    fn test_negative_over_zero_total_passes_through() {
        let input = sample_input(
            (-1.0, 0.0),
            (900.0, 1100.0),
            EntryTestKind::Nu,
            (80.0, 100.0),
            EducationTrack::ALevel,
        );
        let result = compute(&input);
        assert_eq!(result.composite_score, f64::NEG_INFINITY);
    }

    #[test]
    fn test_breakdown_matches_category_percentages() {
        let input = sample_input(
            (700.0, 1100.0),
            (850.0, 1100.0),
            EntryTestKind::Nat,
            (63.0, 100.0),
            EducationTrack::Fsc,
        );
        let result = compute(&input);

        let fields: Vec<ScoreField> =
            result.breakdown.contributions.iter().map(|c| c.field).collect();
        assert_eq!(fields, ScoreField::ALL.to_vec());
        for c in &result.breakdown.contributions {
            assert_eq!(c.percentage, result.category_percentages.get(c.field));
            assert_eq!(c.weighted, c.percentage * c.weight);
        }
        assert_eq!(result.breakdown.weighted_sum, result.composite_score);
    }

    #[test]
    fn test_test_kind_does_not_affect_scoring() {
        let nu = sample_input(
            (800.0, 1100.0),
            (800.0, 1100.0),
            EntryTestKind::Nu,
            (50.0, 100.0),
            EducationTrack::Fsc,
        );
        let nat = AggregateInput {
            test_kind: EntryTestKind::Nat,
            ..nu
        };
        assert_eq!(compute(&nu), compute(&nat));
    }

    #[test]
    fn test_blank_form_scores_zero() {
        let result = compute(&AggregateInput::default());
        assert_eq!(result.composite_score, 0.0);
    }
}
