use super::domain::{ProjectCode, StudentId};

/// Problems with the input data, reported before any allocation work starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("choice record {record} is missing required field `{field}`")]
    MissingField { record: usize, field: &'static str },
    #[error("choice record {record} has preference rank 0 (ranks start at 1)")]
    InvalidRank { record: usize },
    #[error("choice record {record} has a score that is not a finite number")]
    InvalidScore { record: usize },
    #[error("project `{project}` is chosen but has no capacity entry")]
    UnknownProject { project: ProjectCode },
    #[error("student `{student}` has more than one choice for project `{project}`")]
    DuplicateChoice {
        student: StudentId,
        project: ProjectCode,
    },
    #[error("student `{student}` gives preference rank {rank} to more than one project")]
    DuplicateRank { student: StudentId, rank: u32 },
    #[error("choice record {record} for student `{student}` has no course")]
    MissingCourse { record: usize, student: StudentId },
}

/// A broken allocator invariant. Never caused by user data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    #[error(
        "project `{project}` holds {allocated} students but its capacity is {capacity}"
    )]
    CapacityExceeded {
        project: ProjectCode,
        allocated: u32,
        capacity: u32,
    },
}

/// Error raised by the allocator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("invalid allocation input: {0}")]
    Validation(#[from] ValidationError),
    #[error("allocation invariant violated: {0}")]
    Internal(#[from] InternalError),
}

impl AllocationError {
    pub fn is_internal(&self) -> bool {
        matches!(self, AllocationError::Internal(_))
    }
}
