use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::domain::{Choice, ProjectCode, TieBreak};

/// Candidates for `project`, best score first. Equal scores keep input order.
pub fn shortlist(choices: &[Choice], project: &ProjectCode) -> Vec<Choice> {
    shortlist_with(choices, project, TieBreak::InputOrder)
}

pub fn shortlist_with(choices: &[Choice], project: &ProjectCode, tie_break: TieBreak) -> Vec<Choice> {
    let mut candidates: Vec<&Choice> = choices
        .iter()
        .filter(|choice| &choice.project_code == project)
        .collect();
    candidates.sort_by(|a, b| compare_candidates(a, b, tie_break));
    candidates.into_iter().cloned().collect()
}

/// Shortlists for every project that appears in `choices`.
pub fn shortlists(choices: &[Choice], tie_break: TieBreak) -> BTreeMap<ProjectCode, Vec<Choice>> {
    let mut grouped: BTreeMap<ProjectCode, Vec<Choice>> = BTreeMap::new();
    for choice in choices {
        grouped
            .entry(choice.project_code.clone())
            .or_default()
            .push(choice.clone());
    }
    for candidates in grouped.values_mut() {
        candidates.sort_by(|a, b| compare_candidates(a, b, tie_break));
    }
    grouped
}

/// Descending score, then the tie-break policy. Callers rely on a stable sort for
/// `TieBreak::InputOrder`.
pub(crate) fn compare_candidates(a: &Choice, b: &Choice, tie_break: TieBreak) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| match tie_break {
            TieBreak::InputOrder => Ordering::Equal,
            TieBreak::StudentId => a.student_id.cmp(&b.student_id),
        })
}
