use super::common::*;
use crate::allocation::domain::{Choice, ProjectCode, StudentId, TieBreak};
use crate::allocation::error::{AllocationError, ValidationError};
use crate::allocation::allocator::ProjectOrder;
use crate::allocation::{allocate, validate_choices, Allocator};

#[test]
fn cohort_first_choices_go_to_highest_scores() {
    let allocation =
        allocate(&cohort_choices(), &cohort_capacities()).expect("allocation succeeds");

    assert_eq!(placed(&allocation, "mz6952"), Some(("code1".into(), 1)));
    assert_eq!(placed(&allocation, "yzq85"), Some(("code2".into(), 1)));
    assert_eq!(placed(&allocation, "gc48"), Some(("code2".into(), 1)));
    assert_eq!(placed(&allocation, "jq1239"), Some(("code3".into(), 1)));
    assert_eq!(placed(&allocation, "xeq483"), Some(("code4".into(), 2)));
}

#[test]
fn cohort_students_without_open_choices_stay_unallocated() {
    let allocation =
        allocate(&cohort_choices(), &cohort_capacities()).expect("allocation succeeds");

    assert_eq!(allocation.len(), 7);
    let unallocated: Vec<&str> = allocation
        .unallocated()
        .into_iter()
        .map(StudentId::as_str)
        .collect();
    assert_eq!(unallocated, vec!["hn77", "pb1021"]);
    assert!(allocation.count_for(&ProjectCode::from("code2")) <= 2);
}

#[test]
fn higher_score_wins_single_place() {
    let choices = vec![
        Choice::new("S1", "P1", 1, 90.0),
        Choice::new("S1", "P2", 2, 90.0),
        Choice::new("S2", "P1", 1, 70.0),
    ];
    let capacities = capacities(&[("P1", 1), ("P2", 1)]);

    let allocation = allocate(&choices, &capacities).expect("allocation succeeds");

    assert_eq!(placed(&allocation, "S1"), Some(("P1".into(), 1)));
    assert_eq!(placed(&allocation, "S2"), None);
    assert!(allocation.contains(&StudentId::from("S2")));
    assert!(on_project(&allocation, "P2").is_empty());
}

#[test]
fn lower_input_position_does_not_beat_higher_score() {
    let choices = vec![
        Choice::new("S1", "P1", 1, 60.0),
        Choice::new("S2", "P1", 1, 90.0),
    ];

    let allocation = allocate(&choices, &capacities(&[("P1", 1)])).expect("allocation succeeds");

    assert_eq!(placed(&allocation, "S2"), Some(("P1".into(), 1)));
    assert_eq!(placed(&allocation, "S1"), None);
}

#[test]
fn missing_capacity_is_a_validation_error() {
    let choices = vec![
        Choice::new("S1", "P1", 1, 60.0),
        Choice::new("S1", "P2", 2, 60.0),
    ];

    let error = allocate(&choices, &capacities(&[("P1", 1)])).expect_err("P2 has no capacity");

    assert_eq!(
        error,
        AllocationError::Validation(ValidationError::UnknownProject {
            project: ProjectCode::from("P2"),
        })
    );
    assert!(!error.is_internal());
}

#[test]
fn malformed_records_are_rejected_before_allocation() {
    let capacities = capacities(&[("P1", 1)]);

    let zero_rank = vec![Choice::new("S1", "P1", 0, 60.0)];
    assert_eq!(
        validate_choices(&zero_rank, &capacities),
        Err(ValidationError::InvalidRank { record: 1 })
    );

    let nan_score = vec![
        Choice::new("S1", "P1", 1, 60.0),
        Choice::new("S2", "P1", 1, f64::NAN),
    ];
    assert_eq!(
        validate_choices(&nan_score, &capacities),
        Err(ValidationError::InvalidScore { record: 2 })
    );

    let blank_student = vec![Choice::new(" ", "P1", 1, 60.0)];
    assert_eq!(
        validate_choices(&blank_student, &capacities),
        Err(ValidationError::MissingField {
            record: 1,
            field: "student_id",
        })
    );

    let duplicated = vec![
        Choice::new("S1", "P1", 1, 60.0),
        Choice::new("S1", "P1", 2, 60.0),
    ];
    assert!(matches!(
        allocate(&duplicated, &capacities),
        Err(AllocationError::Validation(ValidationError::DuplicateChoice { .. }))
    ));
}

#[test]
fn zero_capacity_project_sends_students_to_next_choice() {
    let choices = vec![
        Choice::new("S1", "P1", 1, 60.0),
        Choice::new("S1", "P2", 2, 60.0),
    ];

    let allocation =
        allocate(&choices, &capacities(&[("P1", 0), ("P2", 1)])).expect("allocation succeeds");

    assert_eq!(placed(&allocation, "S1"), Some(("P2".into(), 2)));
    assert!(on_project(&allocation, "P1").is_empty());
}

#[test]
fn earlier_rank_beats_higher_score_in_later_round() {
    let choices = vec![
        Choice::new("S1", "P1", 1, 40.0),
        Choice::new("S2", "P2", 1, 95.0),
        Choice::new("S2", "P1", 2, 95.0),
    ];

    let allocation =
        allocate(&choices, &capacities(&[("P1", 1), ("P2", 0)])).expect("allocation succeeds");

    assert_eq!(placed(&allocation, "S1"), Some(("P1".into(), 1)));
    assert_eq!(placed(&allocation, "S2"), None);
}

#[test]
fn rank_gaps_are_skipped() {
    let choices = vec![
        Choice::new("S1", "P1", 2, 50.0),
        Choice::new("S1", "P2", 5, 50.0),
        Choice::new("S2", "P1", 1, 70.0),
    ];

    let allocation =
        allocate(&choices, &capacities(&[("P1", 1), ("P2", 1)])).expect("allocation succeeds");

    assert_eq!(placed(&allocation, "S2"), Some(("P1".into(), 1)));
    assert_eq!(placed(&allocation, "S1"), Some(("P2".into(), 5)));
}

#[test]
fn equal_scores_follow_tie_break_policy() {
    let choices = vec![
        Choice::new("zed", "P1", 1, 70.0),
        Choice::new("amy", "P1", 1, 70.0),
    ];
    let capacities = capacities(&[("P1", 1)]);

    let by_input = Allocator::new(TieBreak::InputOrder)
        .allocate(&choices, &capacities)
        .expect("allocation succeeds");
    assert_eq!(on_project(&by_input, "P1"), vec!["zed".to_string()]);

    let by_id = Allocator::new(TieBreak::StudentId)
        .allocate(&choices, &capacities)
        .expect("allocation succeeds");
    assert_eq!(on_project(&by_id, "P1"), vec!["amy".to_string()]);
}

#[test]
fn student_ranking_two_projects_equally_is_rejected() {
    let choices = vec![
        Choice::new("S1", "P2", 1, 90.0),
        Choice::new("S1", "P1", 1, 90.0),
        Choice::new("S2", "P2", 1, 60.0),
        Choice::new("S3", "P1", 1, 50.0),
    ];
    let capacities = capacities(&[("P1", 1), ("P2", 1)]);
    let expected = Err(AllocationError::Validation(ValidationError::DuplicateRank {
        student: StudentId::from("S1"),
        rank: 1,
    }));

    assert_eq!(allocate(&choices, &capacities), expected);
    assert_eq!(
        Allocator::default()
            .with_project_order(ProjectOrder::Descending)
            .allocate(&choices, &capacities),
        expected
    );
}

#[test]
fn empty_input_gives_empty_allocation() {
    let allocation = allocate(&[], &capacities(&[("P1", 3)])).expect("allocation succeeds");

    assert!(allocation.is_empty());
}
