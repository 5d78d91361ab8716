use chrono::{TimeZone, Utc};
use matched::allocation::{
    Allocation, AllocationPipeline, AllocationSummary, Choice, ProjectCode, StudentId, TieBreak,
};
use matched::import;

fn placed(allocation: &Allocation, student: &str) -> Option<(String, u32)> {
    allocation
        .placement(&StudentId::from(student))
        .map(|placement| (placement.project_code.to_string(), placement.rank))
}

fn fixture_pipeline() -> (Vec<Choice>, AllocationPipeline) {
    let choices = import::parse_choices(&include_bytes!("data/choices.csv")[..])
        .expect("choices fixture parses");
    let capacities = import::parse_capacities(&include_bytes!("data/capacities.csv")[..])
        .expect("capacities fixture parses");
    (choices, AllocationPipeline::new(capacities))
}

#[test]
fn cohort_export_allocates_by_rank_then_score() {
    let (choices, pipeline) = fixture_pipeline();

    let outcome = pipeline.run(&choices).expect("pipeline succeeds");

    assert_eq!(placed(&outcome.allocation, "mz6952"), Some(("code1".into(), 1)));
    assert_eq!(placed(&outcome.allocation, "yzq85"), Some(("code2".into(), 1)));
    assert_eq!(placed(&outcome.allocation, "gc48"), Some(("code2".into(), 1)));
    assert_eq!(placed(&outcome.allocation, "jq1239"), Some(("code3".into(), 1)));
    assert_eq!(placed(&outcome.allocation, "xeq483"), Some(("code4".into(), 2)));
    assert_eq!(placed(&outcome.allocation, "pb1021"), None);
    assert_eq!(placed(&outcome.allocation, "hn77"), None);
    assert_eq!(outcome.allocation.len(), 7);
}

#[test]
fn cleaning_drops_unknown_codes_and_repeats() {
    let (choices, pipeline) = fixture_pipeline();

    let cleaned = pipeline.clean(&choices).expect("cleaning succeeds");

    assert_eq!(choices.len(), 17);
    assert_eq!(cleaned.len(), 15);
    assert!(cleaned
        .iter()
        .all(|choice| choice.project_code != ProjectCode::from("code9")));
    let repeated: Vec<u32> = cleaned
        .iter()
        .filter(|choice| {
            choice.student_id.as_str() == "pb1021" && choice.project_code.as_str() == "code2"
        })
        .map(|choice| choice.rank)
        .collect();
    assert_eq!(repeated, vec![1]);
}

#[test]
fn eligibility_fixture_closes_projects_to_edsml() {
    let (choices, pipeline) = fixture_pipeline();
    let eligibility = import::parse_eligibility(&include_bytes!("data/eligibility.csv")[..])
        .expect("eligibility fixture parses");

    let outcome = pipeline
        .with_eligibility(eligibility)
        .run(&choices)
        .expect("pipeline succeeds");

    assert_eq!(placed(&outcome.allocation, "xeq483"), None);
    assert_eq!(placed(&outcome.allocation, "jq1239"), Some(("code3".into(), 1)));
    assert!(outcome.allocation.contains(&StudentId::from("hn77")));
}

#[test]
fn roster_fixture_supplies_courses_for_bare_choices() {
    let bare = "username,code,choice,mean\nxeq483,code1,1,55.0\nxeq483,code4,2,55.0\ngc48,code4,1,64.2\n";
    let choices = import::parse_choices(bare.as_bytes()).expect("choices parse");
    let (_, pipeline) = fixture_pipeline();
    let eligibility = import::parse_eligibility(&include_bytes!("data/eligibility.csv")[..])
        .expect("eligibility fixture parses");
    let roster =
        import::parse_roster(&include_bytes!("data/roster.csv")[..]).expect("roster parses");

    let outcome = pipeline
        .with_eligibility(eligibility)
        .with_roster(roster)
        .run(&choices)
        .expect("pipeline succeeds");

    assert_eq!(placed(&outcome.allocation, "xeq483"), Some(("code1".into(), 1)));
    assert_eq!(placed(&outcome.allocation, "gc48"), Some(("code4".into(), 1)));
}

#[test]
fn summary_reports_fill_for_cohort() {
    let (choices, pipeline) = fixture_pipeline();
    let pipeline = pipeline.with_tie_break(TieBreak::StudentId);
    let outcome = pipeline.run(&choices).expect("pipeline succeeds");
    let generated_at = Utc
        .with_ymd_and_hms(2025, 9, 24, 9, 30, 0)
        .single()
        .expect("valid timestamp");

    let summary =
        AllocationSummary::build(&outcome.allocation, pipeline.capacities(), generated_at);

    assert_eq!(summary.students, 7);
    assert_eq!(summary.allocated, 5);
    assert_eq!(summary.by_rank.get(&1), Some(&4));
    assert_eq!(summary.by_rank.get(&2), Some(&1));
    assert_eq!(summary.spare_places(), 1);
}
