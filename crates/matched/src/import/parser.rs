use crate::allocation::domain::{Capacities, Choice, Course, EligibilityTable, StudentId};
use crate::allocation::error::ValidationError;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::io::Read;

use super::ImportError;

pub(crate) fn parse_choice_rows<R: Read>(reader: R) -> Result<Vec<Choice>, ImportError> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let mut choices = Vec::new();

    for (index, record) in csv_reader.deserialize::<ChoiceRow>().enumerate() {
        let row = record?;
        choices.push(row.into_choice(index + 1)?);
    }

    Ok(choices)
}

pub(crate) fn parse_capacity_rows<R: Read>(reader: R) -> Result<Capacities, ImportError> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let mut capacities = Capacities::new();

    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = index + 1;
        let code = match record.get(0).filter(|value| !value.is_empty()) {
            Some(code) => code,
            None => continue,
        };
        let raw = record.get(1).unwrap_or_default();
        let capacity = raw.parse::<u32>().map_err(|_| ImportError::InvalidValue {
            row,
            column: "capacity".to_string(),
            value: raw.to_string(),
        })?;

        if capacities.insert(code, capacity).is_some() {
            tracing::warn!(project = code, row, "capacity listed twice; keeping the later value");
        }
    }

    Ok(capacities)
}

pub(crate) fn parse_eligibility_rows<R: Read>(reader: R) -> Result<EligibilityTable, ImportError> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let courses: Vec<String> = csv_reader
        .headers()?
        .iter()
        .skip(1)
        .map(str::to_string)
        .collect();
    let mut table = EligibilityTable::new();

    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let code = match record.get(0).filter(|value| !value.is_empty()) {
            Some(code) => code,
            None => continue,
        };

        for (course, raw) in courses.iter().zip(record.iter().skip(1)) {
            if raw.is_empty() {
                continue;
            }
            let eligible = parse_flag(raw).ok_or_else(|| ImportError::InvalidValue {
                row: index + 1,
                column: course.clone(),
                value: raw.to_string(),
            })?;
            table.insert(code, course.as_str(), eligible);
        }
    }

    Ok(table)
}

pub(crate) fn parse_roster_rows<R: Read>(
    reader: R,
) -> Result<BTreeMap<StudentId, Course>, ImportError> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let mut roster = BTreeMap::new();

    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record?;
        let record = index + 1;
        let username = row.username.ok_or(ValidationError::MissingField {
            record,
            field: "username",
        })?;
        let course = row.course.ok_or(ValidationError::MissingField {
            record,
            field: "course",
        })?;
        roster.insert(StudentId::from(username), Course::from(course));
    }

    Ok(roster)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::All);
    builder
}

#[derive(Debug, Deserialize)]
struct ChoiceRow {
    #[serde(alias = "student_id", default, deserialize_with = "empty_string_as_none")]
    username: Option<String>,
    #[serde(alias = "project_code", default, deserialize_with = "empty_string_as_none")]
    code: Option<String>,
    #[serde(alias = "rank", default, deserialize_with = "empty_string_as_none")]
    choice: Option<String>,
    #[serde(
        alias = "score",
        alias = "mark",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    mean: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    course: Option<String>,
}

impl ChoiceRow {
    fn into_choice(self, record: usize) -> Result<Choice, ImportError> {
        let username = required(self.username, record, "username")?;
        let code = required(self.code, record, "code")?;
        let choice = required(self.choice, record, "choice")?;
        let mean = required(self.mean, record, "mean")?;

        let rank = choice.parse::<u32>().map_err(|_| ImportError::InvalidValue {
            row: record,
            column: "choice".to_string(),
            value: choice.clone(),
        })?;
        let score = mean.parse::<f64>().map_err(|_| ImportError::InvalidValue {
            row: record,
            column: "mean".to_string(),
            value: mean.clone(),
        })?;

        let parsed = Choice::new(username, code, rank, score);
        Ok(match self.course {
            Some(course) => parsed.with_course(course),
            None => parsed,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(alias = "student_id", default, deserialize_with = "empty_string_as_none")]
    username: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    course: Option<String>,
}

fn required(
    value: Option<String>,
    record: usize,
    field: &'static str,
) -> Result<String, ValidationError> {
    value.ok_or(ValidationError::MissingField { record, field })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}
