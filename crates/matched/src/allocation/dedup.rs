use std::collections::HashMap;

use super::domain::{Choice, ProjectCode, StudentId};

/// Keeps, for every (student, project) pair, only the record with the lowest rank.
///
/// The output preserves input order. When two records share the lowest rank the
/// earlier one wins.
pub fn deduplicate(choices: &[Choice]) -> Vec<Choice> {
    let mut best: HashMap<(&StudentId, &ProjectCode), usize> = HashMap::new();

    for (index, choice) in choices.iter().enumerate() {
        let key = (&choice.student_id, &choice.project_code);
        match best.get(&key) {
            Some(&kept) if choices[kept].rank <= choice.rank => {}
            _ => {
                best.insert(key, index);
            }
        }
    }

    let dropped = choices.len() - best.len();
    if dropped > 0 {
        tracing::debug!(dropped, "collapsed duplicate project choices");
    }

    let mut kept: Vec<usize> = best.into_values().collect();
    kept.sort_unstable();
    kept.into_iter().map(|index| choices[index].clone()).collect()
}
