use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Allocation, Capacities, ProjectCode};

/// How full a project ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFill {
    pub project_code: ProjectCode,
    pub capacity: u32,
    pub allocated: u32,
}

impl ProjectFill {
    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.allocated)
    }

    pub fn is_full(&self) -> bool {
        self.allocated >= self.capacity
    }
}

/// Read-only overview of an allocation for review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSummary {
    pub generated_at: DateTime<Utc>,
    pub students: usize,
    pub allocated: usize,
    pub unallocated: usize,
    /// Number of students placed on their n-th preference.
    pub by_rank: BTreeMap<u32, usize>,
    pub projects: Vec<ProjectFill>,
}

impl AllocationSummary {
    pub fn build(
        allocation: &Allocation,
        capacities: &Capacities,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut by_rank: BTreeMap<u32, usize> = BTreeMap::new();
        let mut per_project: BTreeMap<&ProjectCode, u32> = BTreeMap::new();

        for (_, placement) in allocation.iter() {
            if let Some(placement) = placement {
                *by_rank.entry(placement.rank).or_default() += 1;
                *per_project.entry(&placement.project_code).or_default() += 1;
            }
        }

        let projects = capacities
            .iter()
            .map(|(project, capacity)| ProjectFill {
                project_code: project.clone(),
                capacity,
                allocated: per_project.get(project).copied().unwrap_or(0),
            })
            .collect();

        let allocated = allocation.allocated_count();
        Self {
            generated_at,
            students: allocation.len(),
            allocated,
            unallocated: allocation.len() - allocated,
            by_rank,
            projects,
        }
    }

    /// Share of students placed on their first preference, in `0.0..=1.0`.
    pub fn first_choice_rate(&self) -> f64 {
        if self.students == 0 {
            return 0.0;
        }
        self.by_rank.get(&1).copied().unwrap_or(0) as f64 / self.students as f64
    }

    pub fn spare_places(&self) -> u32 {
        self.projects.iter().map(ProjectFill::remaining).sum()
    }
}
