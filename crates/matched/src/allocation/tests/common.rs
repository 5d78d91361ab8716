use crate::allocation::domain::{Allocation, Capacities, Choice, EligibilityTable, ProjectCode, StudentId};

pub(super) fn capacities(entries: &[(&str, u32)]) -> Capacities {
    entries.iter().map(|(code, capacity)| (*code, *capacity)).collect()
}

/// Cohort where every rank-1 project is contested.
pub(super) fn cohort_choices() -> Vec<Choice> {
    vec![
        Choice::new("mz6952", "code1", 1, 78.5).with_course("acse"),
        Choice::new("mz6952", "code2", 2, 78.5).with_course("acse"),
        Choice::new("mz6952", "code3", 3, 78.5).with_course("acse"),
        Choice::new("yzq85", "code2", 1, 71.0).with_course("edsml"),
        Choice::new("yzq85", "code1", 2, 71.0).with_course("edsml"),
        Choice::new("gc48", "code2", 1, 64.2).with_course("acse"),
        Choice::new("gc48", "code4", 2, 64.2).with_course("acse"),
        Choice::new("jq1239", "code3", 1, 59.9).with_course("acse"),
        Choice::new("jq1239", "code1", 2, 59.9).with_course("acse"),
        Choice::new("xeq483", "code1", 1, 55.0).with_course("edsml"),
        Choice::new("xeq483", "code4", 2, 55.0).with_course("edsml"),
        Choice::new("pb1021", "code2", 1, 50.5).with_course("acse"),
        Choice::new("pb1021", "code3", 2, 50.5).with_course("acse"),
        Choice::new("pb1021", "code1", 3, 50.5).with_course("acse"),
        Choice::new("hn77", "code3", 1, 45.0).with_course("edsml"),
    ]
}

pub(super) fn cohort_capacities() -> Capacities {
    capacities(&[("code1", 1), ("code2", 2), ("code3", 1), ("code4", 2)])
}

pub(super) fn cohort_eligibility() -> EligibilityTable {
    [
        ("code1", "acse", true),
        ("code1", "edsml", true),
        ("code2", "acse", true),
        ("code2", "edsml", true),
        ("code3", "acse", true),
        ("code3", "edsml", false),
        ("code4", "acse", true),
        ("code4", "edsml", false),
    ]
    .into_iter()
    .collect()
}

pub(super) fn placed(allocation: &Allocation, student: &str) -> Option<(String, u32)> {
    allocation
        .placement(&StudentId::from(student))
        .map(|placement| (placement.project_code.to_string(), placement.rank))
}

pub(super) fn on_project(allocation: &Allocation, project: &str) -> Vec<String> {
    allocation
        .students_on(&ProjectCode::from(project))
        .into_iter()
        .map(ToString::to_string)
        .collect()
}
