use std::collections::{BTreeMap, BTreeSet};

use super::allocator::Allocator;
use super::dedup::deduplicate;
use super::domain::{
    Allocation, Capacities, Choice, Course, EligibilityTable, ProjectCode, StudentId, TieBreak,
};
use super::eligibility::{assign_courses, filter_invalid_course, filter_invalid_project};
use super::error::AllocationError;
use super::shortlist::shortlist_with;

/// Cleaned input and outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Choices that survived filtering and deduplication, in input order.
    pub cleaned: Vec<Choice>,
    pub allocation: Allocation,
}

/// Runs raw choices through filtering, deduplication and allocation.
///
/// The result lists every student of the raw input, including those whose every
/// choice was filtered out.
#[derive(Debug, Clone)]
pub struct AllocationPipeline {
    capacities: Capacities,
    eligibility: Option<EligibilityTable>,
    roster: BTreeMap<StudentId, Course>,
    allocator: Allocator,
}

impl AllocationPipeline {
    pub fn new(capacities: Capacities) -> Self {
        Self {
            capacities,
            eligibility: None,
            roster: BTreeMap::new(),
            allocator: Allocator::default(),
        }
    }

    pub fn with_eligibility(mut self, eligibility: EligibilityTable) -> Self {
        self.eligibility = Some(eligibility);
        self
    }

    pub fn with_roster(mut self, roster: BTreeMap<StudentId, Course>) -> Self {
        self.roster = roster;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.allocator = Allocator::new(tie_break);
        self
    }

    pub fn capacities(&self) -> &Capacities {
        &self.capacities
    }

    /// Project codes a choice may reference: those with a capacity entry.
    pub fn known_codes(&self) -> BTreeSet<ProjectCode> {
        self.capacities.codes()
    }

    /// Filters and deduplicates `raw` without allocating.
    pub fn clean(&self, raw: &[Choice]) -> Result<Vec<Choice>, AllocationError> {
        let known = self.known_codes();
        let mut choices = filter_invalid_project(raw, &known);

        if let Some(table) = &self.eligibility {
            if !self.roster.is_empty() {
                choices = assign_courses(&choices, &self.roster);
            }
            choices = filter_invalid_course(&choices, table)?;
        }

        Ok(deduplicate(&choices))
    }

    /// Cleaned candidates for `project`, best score first under the pipeline's
    /// tie-break policy.
    pub fn shortlist(&self, raw: &[Choice], project: &ProjectCode) -> Result<Vec<Choice>, AllocationError> {
        let cleaned = self.clean(raw)?;
        Ok(shortlist_with(&cleaned, project, self.allocator.tie_break()))
    }

    pub fn run(&self, raw: &[Choice]) -> Result<PipelineOutcome, AllocationError> {
        let cleaned = self.clean(raw)?;
        let mut allocation = self.allocator.allocate(&cleaned, &self.capacities)?;
        allocation.include_students(raw.iter().map(|choice| &choice.student_id));

        tracing::info!(
            raw = raw.len(),
            cleaned = cleaned.len(),
            students = allocation.len(),
            "pipeline finished"
        );
        Ok(PipelineOutcome { cleaned, allocation })
    }
}
