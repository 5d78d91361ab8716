//! CSV adapters between spreadsheet exports and the allocation types.

mod parser;

use crate::allocation::domain::{Allocation, Capacities, Choice, Course, EligibilityTable, StudentId};
use crate::allocation::error::ValidationError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Validation(ValidationError),
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read CSV file: {}", err),
            ImportError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            ImportError::Validation(err) => write!(f, "invalid record: {}", err),
            ImportError::InvalidValue { row, column, value } => write!(
                f,
                "row {} has an unreadable value '{}' in column `{}`",
                row, value, column
            ),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Validation(err) => Some(err),
            ImportError::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<ValidationError> for ImportError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// Reads choice records (`username`, `code`, `choice`, `mean`, optional `course`).
pub fn parse_choices<R: Read>(reader: R) -> Result<Vec<Choice>, ImportError> {
    parser::parse_choice_rows(reader)
}

/// Reads project capacities from the first two columns.
pub fn parse_capacities<R: Read>(reader: R) -> Result<Capacities, ImportError> {
    parser::parse_capacity_rows(reader)
}

/// Reads a wide eligibility table: project code, then one column per course.
pub fn parse_eligibility<R: Read>(reader: R) -> Result<EligibilityTable, ImportError> {
    parser::parse_eligibility_rows(reader)
}

pub fn parse_roster<R: Read>(reader: R) -> Result<BTreeMap<StudentId, Course>, ImportError> {
    parser::parse_roster_rows(reader)
}

pub fn load_choices(path: impl AsRef<Path>) -> Result<Vec<Choice>, ImportError> {
    let file = File::open(path)?;
    parse_choices(file)
}

pub fn load_capacities(path: impl AsRef<Path>) -> Result<Capacities, ImportError> {
    let file = File::open(path)?;
    parse_capacities(file)
}

pub fn load_eligibility(path: impl AsRef<Path>) -> Result<EligibilityTable, ImportError> {
    let file = File::open(path)?;
    parse_eligibility(file)
}

pub fn load_roster(path: impl AsRef<Path>) -> Result<BTreeMap<StudentId, Course>, ImportError> {
    let file = File::open(path)?;
    parse_roster(file)
}

/// Writes `username,code,choice` rows in student order. Unallocated students
/// get empty `code` and `choice` cells.
pub fn write_allocation<W: Write>(writer: W, allocation: &Allocation) -> Result<(), ImportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["username", "code", "choice"])?;

    for (student, placement) in allocation.iter() {
        match placement {
            Some(placement) => {
                let rank = placement.rank.to_string();
                csv_writer.write_record([
                    student.as_str(),
                    placement.project_code.as_str(),
                    rank.as_str(),
                ])?;
            }
            None => csv_writer.write_record([student.as_str(), "", ""])?,
        }
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn save_allocation(path: impl AsRef<Path>, allocation: &Allocation) -> Result<(), ImportError> {
    let file = File::create(path)?;
    write_allocation(file, allocation)
}
