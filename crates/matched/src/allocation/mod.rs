//! Preference-ranked allocation of students to capacity-limited projects.
//!
//! Raw choices flow through [`filter_invalid_project`], the optional
//! [`filter_invalid_course`], [`deduplicate`] and finally [`allocate`].
//! [`AllocationPipeline`] wires these steps together. [`shortlist`] is a
//! separate read-only view for manual review.

mod allocator;
mod dedup;
pub mod domain;
mod eligibility;
pub mod error;
mod pipeline;
mod shortlist;
pub mod summary;

#[cfg(test)]
mod tests;

pub use allocator::{allocate, validate_choices, Allocator};
pub use dedup::deduplicate;
pub use domain::{
    Allocation, Capacities, Choice, Course, EligibilityTable, Placement, ProjectCode, StudentId,
    TieBreak,
};
pub use eligibility::{assign_courses, filter_invalid_course, filter_invalid_project};
pub use error::{AllocationError, InternalError, ValidationError};
pub use pipeline::{AllocationPipeline, PipelineOutcome};
pub use shortlist::{shortlist, shortlist_with, shortlists};
pub use summary::{AllocationSummary, ProjectFill};
