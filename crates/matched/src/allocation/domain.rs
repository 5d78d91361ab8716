use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Institutional username identifying a student.
    StudentId
);
string_id!(
    /// Code identifying a project on offer.
    ProjectCode
);
string_id!(
    /// Degree course a student is enrolled on.
    Course
);

/// One ranked preference of a student for a project.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub student_id: StudentId,
    pub project_code: ProjectCode,
    /// Preference rank, 1 being the most preferred.
    pub rank: u32,
    /// Tiebreak score; higher wins an oversubscribed project.
    pub score: f64,
    pub course: Option<Course>,
}

impl Choice {
    pub fn new(
        student_id: impl Into<StudentId>,
        project_code: impl Into<ProjectCode>,
        rank: u32,
        score: f64,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            project_code: project_code.into(),
            rank,
            score,
            course: None,
        }
    }

    pub fn with_course(mut self, course: impl Into<Course>) -> Self {
        self.course = Some(course.into());
        self
    }
}

/// Maximum occupancy per project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capacities(BTreeMap<ProjectCode, u32>);

impl Capacities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, project: impl Into<ProjectCode>, capacity: u32) -> Option<u32> {
        self.0.insert(project.into(), capacity)
    }

    pub fn get(&self, project: &ProjectCode) -> Option<u32> {
        self.0.get(project).copied()
    }

    pub fn contains(&self, project: &ProjectCode) -> bool {
        self.0.contains_key(project)
    }

    pub fn codes(&self) -> BTreeSet<ProjectCode> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProjectCode, u32)> {
        self.0.iter().map(|(code, capacity)| (code, *capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P: Into<ProjectCode>> FromIterator<(P, u32)> for Capacities {
    fn from_iter<I: IntoIterator<Item = (P, u32)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(project, capacity)| (project.into(), capacity))
                .collect(),
        )
    }
}

/// Which courses may select which projects.
///
/// Pairs that are absent from the table are treated as eligible; only an explicit
/// `false` excludes a choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibilityTable(BTreeMap<(ProjectCode, Course), bool>);

impl EligibilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        project: impl Into<ProjectCode>,
        course: impl Into<Course>,
        eligible: bool,
    ) -> Option<bool> {
        self.0.insert((project.into(), course.into()), eligible)
    }

    pub fn lookup(&self, project: &ProjectCode, course: &Course) -> Option<bool> {
        self.0.get(&(project.clone(), course.clone())).copied()
    }

    /// Whether the table has any row for `project`.
    pub fn covers(&self, project: &ProjectCode) -> bool {
        self.0
            .range((project.clone(), Course::from(""))..)
            .next()
            .is_some_and(|((code, _), _)| code == project)
    }

    pub fn is_excluded(&self, project: &ProjectCode, course: &Course) -> bool {
        self.lookup(project, course) == Some(false)
    }

    pub fn projects(&self) -> BTreeSet<ProjectCode> {
        self.0.keys().map(|(project, _)| project.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P, C> FromIterator<(P, C, bool)> for EligibilityTable
where
    P: Into<ProjectCode>,
    C: Into<Course>,
{
    fn from_iter<I: IntoIterator<Item = (P, C, bool)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(project, course, eligible)| ((project.into(), course.into()), eligible))
                .collect(),
        )
    }
}

/// The project a student ended up on and the rank they had given it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub project_code: ProjectCode,
    pub rank: u32,
}

/// Final outcome: one entry per student, `None` when no project could take them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Allocation(BTreeMap<StudentId, Option<Placement>>);

impl Allocation {
    pub(crate) fn place(&mut self, student: StudentId, placement: Placement) {
        self.0.insert(student, Some(placement));
    }

    /// Records students as unallocated unless they already have an entry.
    pub fn include_students<'a, I>(&mut self, students: I)
    where
        I: IntoIterator<Item = &'a StudentId>,
    {
        for student in students {
            self.0.entry(student.clone()).or_insert(None);
        }
    }

    pub fn placement(&self, student: &StudentId) -> Option<&Placement> {
        self.0.get(student).and_then(Option::as_ref)
    }

    pub fn contains(&self, student: &StudentId) -> bool {
        self.0.contains_key(student)
    }

    pub fn students_on(&self, project: &ProjectCode) -> Vec<&StudentId> {
        self.0
            .iter()
            .filter(|(_, placement)| {
                placement
                    .as_ref()
                    .is_some_and(|placement| &placement.project_code == project)
            })
            .map(|(student, _)| student)
            .collect()
    }

    pub fn count_for(&self, project: &ProjectCode) -> usize {
        self.students_on(project).len()
    }

    pub fn unallocated(&self) -> Vec<&StudentId> {
        self.0
            .iter()
            .filter(|(_, placement)| placement.is_none())
            .map(|(student, _)| student)
            .collect()
    }

    pub fn allocated_count(&self) -> usize {
        self.0.values().filter(|placement| placement.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StudentId, Option<&Placement>)> {
        self.0
            .iter()
            .map(|(student, placement)| (student, placement.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How to order candidates that share a score for the same project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Keep the order the records had in the input.
    #[default]
    InputOrder,
    /// Ascending student id.
    StudentId,
}

impl TieBreak {
    pub const fn label(self) -> &'static str {
        match self {
            TieBreak::InputOrder => "input-order",
            TieBreak::StudentId => "student-id",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "input-order" | "input" | "stable" => Some(Self::InputOrder),
            "student-id" | "student" | "username" => Some(Self::StudentId),
            _ => None,
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
