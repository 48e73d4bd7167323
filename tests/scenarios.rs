use nu_aggregate::form::FormDraft;
use nu_aggregate::scoring::{
    compute, validate_input, AggregateInput, EducationTrack, EntryTestKind, InvalidInput,
    ScoreField, ScorePair,
};

fn board_and_nu(track: EducationTrack) -> AggregateInput {
    AggregateInput {
        secondary: ScorePair::new(900.0, 1100.0),
        higher: ScorePair::new(900.0, 1100.0),
        test_kind: EntryTestKind::Nu,
        test: ScorePair::new(80.0, 100.0),
        track,
    }
}

#[test]
fn fsc_student_with_nu_test() {
    let result = compute(&board_and_nu(EducationTrack::Fsc));
    assert!((result.category_percentages.secondary - 81.818181).abs() < 1e-4);
    assert!((result.category_percentages.higher - 81.818181).abs() < 1e-4);
    assert!((result.category_percentages.test - 80.0).abs() < 1e-9);
    assert!((result.composite_score - 80.909090).abs() < 1e-4);
    assert!(!result.breakdown.bonus_applied);
}

#[test]
fn a_level_student_gets_bonus() {
    let result = compute(&board_and_nu(EducationTrack::ALevel));
    assert!((result.composite_score - 89.0).abs() < 1e-4);
    assert!(result.breakdown.bonus_applied);
    assert!(!result.breakdown.clamped);
}

#[test]
fn full_marks_a_level_is_capped() {
    let input = AggregateInput {
        secondary: ScorePair::new(1100.0, 1100.0),
        higher: ScorePair::new(1100.0, 1100.0),
        test_kind: EntryTestKind::Sat,
        test: ScorePair::new(1600.0, 1600.0),
        track: EducationTrack::ALevel,
    };
    let result = compute(&input);
    assert_eq!(result.composite_score, 100.0);
    assert!(result.breakdown.clamped);
    assert!((result.breakdown.after_bonus - 110.0).abs() < 1e-9);
}

#[test]
fn switching_to_sat_forces_total() {
    let mut draft = FormDraft::new();
    draft.set_obtained(ScoreField::Test, 85.0);
    draft.set_total(ScoreField::Test, 90.0);

    draft.select_test_kind(EntryTestKind::Sat);

    let test = draft.snapshot().test;
    assert_eq!(test.total, 1600.0);
    assert_eq!(test.obtained, 85.0);
}

#[test]
fn zero_secondary_total_is_rejected_at_the_boundary() {
    let mut input = board_and_nu(EducationTrack::Fsc);
    input.secondary = ScorePair::new(900.0, 0.0);

    let errors = validate_input(&input).unwrap_err();
    assert_eq!(
        errors,
        vec![InvalidInput::ZeroTotal {
            field: ScoreField::Secondary
        }]
    );

    // The engine itself does not guard: x/0 is +inf and the cap turns it into 100
    let result = compute(&input);
    assert!(result.category_percentages.secondary.is_infinite());
    assert_eq!(result.composite_score, 100.0);

    // 0/0 is NaN and propagates
    input.secondary = ScorePair::new(0.0, 0.0);
    let result = compute(&input);
    assert!(result.category_percentages.secondary.is_nan());
    assert!(result.composite_score.is_nan());
}
