use std::collections::{BTreeMap, BTreeSet};

use super::domain::{Choice, Course, EligibilityTable, ProjectCode, StudentId};
use super::error::ValidationError;

/// Drops choices whose project code is not among `known_codes`.
pub fn filter_invalid_project(choices: &[Choice], known_codes: &BTreeSet<ProjectCode>) -> Vec<Choice> {
    let kept: Vec<Choice> = choices
        .iter()
        .filter(|choice| known_codes.contains(&choice.project_code))
        .cloned()
        .collect();

    let dropped = choices.len() - kept.len();
    if dropped > 0 {
        tracing::warn!(dropped, "removed choices referencing unknown project codes");
    }
    kept
}

/// Drops choices whose (project, course) pair the table marks as ineligible.
///
/// A record needs a course only when the table has rows for its project; see
/// [`assign_courses`] to join one from a roster. As long as every project in the
/// table is also a known code, this filter and [`filter_invalid_project`] give
/// the same result in either order.
pub fn filter_invalid_course(
    choices: &[Choice],
    eligibility: &EligibilityTable,
) -> Result<Vec<Choice>, ValidationError> {
    let mut kept = Vec::with_capacity(choices.len());

    for (index, choice) in choices.iter().enumerate() {
        if !eligibility.covers(&choice.project_code) {
            kept.push(choice.clone());
            continue;
        }
        let course = choice
            .course
            .as_ref()
            .ok_or_else(|| ValidationError::MissingCourse {
                record: index + 1,
                student: choice.student_id.clone(),
            })?;

        if !eligibility.is_excluded(&choice.project_code, course) {
            kept.push(choice.clone());
        }
    }

    let dropped = choices.len() - kept.len();
    if dropped > 0 {
        tracing::warn!(dropped, "removed choices not open to the student's course");
    }
    Ok(kept)
}

/// Fills in each record's course from a student roster.
///
/// Students missing from the roster keep whatever course their records already carry.
pub fn assign_courses(choices: &[Choice], roster: &BTreeMap<StudentId, Course>) -> Vec<Choice> {
    choices
        .iter()
        .map(|choice| match roster.get(&choice.student_id) {
            Some(course) => Choice {
                course: Some(course.clone()),
                ..choice.clone()
            },
            None => choice.clone(),
        })
        .collect()
}
