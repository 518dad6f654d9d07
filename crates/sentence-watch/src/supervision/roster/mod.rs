//! CSV roster import producing validated-shape offender submissions.

mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::{
    CaseType, Gender, OffenderCaseFacts, OffenderProfile, OffenderSubmission, UnknownDomainValue,
};
use parser::RosterRow;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidValue {
        row: usize,
        source: UnknownDomainValue,
    },
    InvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidValue { row, source } => {
                write!(f, "roster row {}: {}", row, source)
            }
            RosterImportError::InvalidDate { row, column, value } => write!(
                f,
                "roster row {}: '{}' in column {} is not a date",
                row, value, column
            ),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidValue { source, .. } => Some(source),
            RosterImportError::InvalidDate { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<OffenderSubmission>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<OffenderSubmission>, RosterImportError> {
        parser::parse_rows(reader)?
            .into_iter()
            .map(|(row, record)| submission_from_row(row, record))
            .collect()
    }
}

fn submission_from_row(
    row: usize,
    record: RosterRow,
) -> Result<OffenderSubmission, RosterImportError> {
    let invalid = |source| RosterImportError::InvalidValue { row, source };
    let gender: Gender = record.gender.parse().map_err(invalid)?;
    let case_type: CaseType = record.case_type.parse().map_err(invalid)?;

    let date_column = |column: &'static str, value: Option<String>| match value {
        Some(raw) => parser::parse_date(&raw)
            .map(Some)
            .ok_or(RosterImportError::InvalidDate {
                row,
                column,
                value: raw,
            }),
        None => Ok(None),
    };

    let facts = OffenderCaseFacts {
        start_date: date_column("start_date", record.start_date)?,
        duration_months: record.duration_months,
        reduced_months: record.reduced_months,
        reduction_count: record.reduction_count,
        last_reduction_date: date_column("reduction_date", record.reduction_date)?,
        birth_date: date_column("birth_date", record.birth_date)?,
        occupation: record.occupation,
        address: record.address,
    };

    let profile = OffenderProfile {
        case_number: record.case_number,
        full_name: record.full_name,
        gender,
        id_number: String::new(),
        case_type,
        crime: record.crime,
        phone: String::new(),
        ward: String::new(),
        notes: String::new(),
    };

    Ok(OffenderSubmission { profile, facts })
}
