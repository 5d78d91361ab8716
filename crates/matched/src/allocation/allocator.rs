use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::domain::{Allocation, Capacities, Choice, Placement, ProjectCode, StudentId, TieBreak};
use super::error::{AllocationError, InternalError, ValidationError};
use super::shortlist::compare_candidates;

/// Round-based allocator: ranks are processed in ascending order and each
/// project admits its best-scoring candidates of the round until it fills.
///
/// An allocated student stops competing for every other project, and a full
/// project stops accepting anyone for the rest of the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Allocator {
    tie_break: TieBreak,
    #[cfg(test)]
    project_order: ProjectOrder,
}

/// Order in which the projects of one round are visited. Production runs use
/// ascending code order; the outcome must not depend on it.
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum ProjectOrder {
    #[default]
    Ascending,
    Descending,
}

#[cfg(test)]
impl ProjectOrder {
    fn arrange<T>(self, mut projects: Vec<T>) -> Vec<T> {
        if self == ProjectOrder::Descending {
            projects.reverse();
        }
        projects
    }
}

impl Allocator {
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            tie_break,
            ..Self::default()
        }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    #[cfg(test)]
    pub(crate) fn with_project_order(mut self, order: ProjectOrder) -> Self {
        self.project_order = order;
        self
    }

    /// Allocates deduplicated, filtered `choices` against `capacities`.
    ///
    /// Every student present in `choices` gets an entry in the result.
    pub fn allocate(
        &self,
        choices: &[Choice],
        capacities: &Capacities,
    ) -> Result<Allocation, AllocationError> {
        validate_choices(choices, capacities)?;

        let mut working = WorkingSet::new(choices);
        let mut filled: BTreeMap<ProjectCode, u32> = BTreeMap::new();
        let mut allocation = Allocation::default();
        let mut rounds = 0usize;

        while let Some(rank) = working.min_rank() {
            rounds += 1;
            let round: Vec<(ProjectCode, Vec<usize>)> = working.round(rank).into_iter().collect();
            #[cfg(test)]
            let round = self.project_order.arrange(round);
            tracing::debug!(rank, projects = round.len(), "starting allocation round");

            for (project, mut candidates) in round {
                let capacity = capacities
                    .get(&project)
                    .ok_or_else(|| ValidationError::UnknownProject {
                        project: project.clone(),
                    })?;
                candidates.sort_by(|&a, &b| {
                    compare_candidates(working.record(a), working.record(b), self.tie_break)
                });

                let mut count = filled.get(&project).copied().unwrap_or(0);
                for index in candidates {
                    if count >= capacity {
                        break;
                    }
                    if !working.is_live(index) {
                        continue;
                    }

                    let record = working.record(index);
                    let student = record.student_id.clone();
                    allocation.place(
                        student.clone(),
                        Placement {
                            project_code: project.clone(),
                            rank: record.rank,
                        },
                    );
                    count += 1;
                    working.remove_student(&student);
                }
                filled.insert(project.clone(), count);

                if count > capacity {
                    return Err(InternalError::CapacityExceeded {
                        project,
                        allocated: count,
                        capacity,
                    }
                    .into());
                }
                if count == capacity {
                    let withdrawn = working.remove_project(&project);
                    tracing::debug!(%project, capacity, withdrawn, "project full");
                }
            }
        }

        allocation.include_students(choices.iter().map(|choice| &choice.student_id));
        tracing::info!(
            students = allocation.len(),
            allocated = allocation.allocated_count(),
            rounds,
            tie_break = %self.tie_break,
            "allocation complete"
        );
        Ok(allocation)
    }
}

/// Allocates with the default [`TieBreak::InputOrder`] policy.
pub fn allocate(choices: &[Choice], capacities: &Capacities) -> Result<Allocation, AllocationError> {
    Allocator::default().allocate(choices, capacities)
}

/// Checks allocator preconditions without allocating anything.
///
/// Besides per-record checks, each (student, project) pair and each
/// (student, rank) pair may appear at most once.
pub fn validate_choices(choices: &[Choice], capacities: &Capacities) -> Result<(), ValidationError> {
    let mut seen: HashSet<(&StudentId, &ProjectCode)> = HashSet::with_capacity(choices.len());
    let mut ranks: HashSet<(&StudentId, u32)> = HashSet::with_capacity(choices.len());

    for (index, choice) in choices.iter().enumerate() {
        let record = index + 1;
        if choice.student_id.as_str().trim().is_empty() {
            return Err(ValidationError::MissingField {
                record,
                field: "student_id",
            });
        }
        if choice.project_code.as_str().trim().is_empty() {
            return Err(ValidationError::MissingField {
                record,
                field: "project_code",
            });
        }
        if choice.rank == 0 {
            return Err(ValidationError::InvalidRank { record });
        }
        if !choice.score.is_finite() {
            return Err(ValidationError::InvalidScore { record });
        }
        if !capacities.contains(&choice.project_code) {
            return Err(ValidationError::UnknownProject {
                project: choice.project_code.clone(),
            });
        }
        if !seen.insert((&choice.student_id, &choice.project_code)) {
            return Err(ValidationError::DuplicateChoice {
                student: choice.student_id.clone(),
                project: choice.project_code.clone(),
            });
        }
        if !ranks.insert((&choice.student_id, choice.rank)) {
            return Err(ValidationError::DuplicateRank {
                student: choice.student_id.clone(),
                rank: choice.rank,
            });
        }
    }

    Ok(())
}

/// Choice records still competing, indexed by student, project and rank.
///
/// Records are addressed by their position in the input slice.
struct WorkingSet<'a> {
    records: &'a [Choice],
    live: BTreeSet<usize>,
    by_student: BTreeMap<&'a StudentId, BTreeSet<usize>>,
    by_project: BTreeMap<&'a ProjectCode, BTreeSet<usize>>,
    by_rank: BTreeMap<u32, BTreeSet<usize>>,
}

impl<'a> WorkingSet<'a> {
    fn new(records: &'a [Choice]) -> Self {
        let mut by_student: BTreeMap<&'a StudentId, BTreeSet<usize>> = BTreeMap::new();
        let mut by_project: BTreeMap<&'a ProjectCode, BTreeSet<usize>> = BTreeMap::new();
        let mut by_rank: BTreeMap<u32, BTreeSet<usize>> = BTreeMap::new();

        for (index, record) in records.iter().enumerate() {
            by_student.entry(&record.student_id).or_default().insert(index);
            by_project.entry(&record.project_code).or_default().insert(index);
            by_rank.entry(record.rank).or_default().insert(index);
        }

        Self {
            records,
            live: (0..records.len()).collect(),
            by_student,
            by_project,
            by_rank,
        }
    }

    fn record(&self, index: usize) -> &'a Choice {
        &self.records[index]
    }

    fn is_live(&self, index: usize) -> bool {
        self.live.contains(&index)
    }

    fn min_rank(&self) -> Option<u32> {
        self.by_rank.keys().next().copied()
    }

    /// Live records at `rank`, grouped by project in ascending code order.
    /// Within a group records keep input order.
    fn round(&self, rank: u32) -> BTreeMap<ProjectCode, Vec<usize>> {
        let mut grouped: BTreeMap<ProjectCode, Vec<usize>> = BTreeMap::new();
        if let Some(indices) = self.by_rank.get(&rank) {
            for &index in indices {
                grouped
                    .entry(self.records[index].project_code.clone())
                    .or_default()
                    .push(index);
            }
        }
        grouped
    }

    fn remove_student(&mut self, student: &StudentId) -> usize {
        let indices = self.by_student.remove(student).unwrap_or_default();
        let removed = indices.len();
        for index in indices {
            self.unlink(index);
        }
        removed
    }

    fn remove_project(&mut self, project: &ProjectCode) -> usize {
        let indices = self.by_project.remove(project).unwrap_or_default();
        let removed = indices.len();
        for index in indices {
            self.unlink(index);
        }
        removed
    }

    fn unlink(&mut self, index: usize) {
        if !self.live.remove(&index) {
            return;
        }
        let record = &self.records[index];

        if let Some(set) = self.by_student.get_mut(&record.student_id) {
            set.remove(&index);
            if set.is_empty() {
                self.by_student.remove(&record.student_id);
            }
        }
        if let Some(set) = self.by_project.get_mut(&record.project_code) {
            set.remove(&index);
            if set.is_empty() {
                self.by_project.remove(&record.project_code);
            }
        }
        if let Some(set) = self.by_rank.get_mut(&record.rank) {
            set.remove(&index);
            if set.is_empty() {
                self.by_rank.remove(&record.rank);
            }
        }
    }
}
