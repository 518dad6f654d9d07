use chrono::NaiveDate;

use super::domain::{OffenderCaseFacts, OffenderSubmission};

pub const MIN_DURATION_MONTHS: u32 = 1;
pub const MAX_DURATION_MONTHS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("case number must not be empty")]
    MissingCaseNumber,
    #[error("full name must not be empty")]
    MissingFullName,
    #[error("birth date {0} is after today")]
    BirthDateInFuture(NaiveDate),
    #[error("start date {start} precedes birth date {birth}")]
    StartBeforeBirth { start: NaiveDate, birth: NaiveDate },
    #[error("duration of {0} months is outside the 1-60 month range")]
    DurationOutOfRange(u32),
    #[error("{reduced} reduced months exceed the {duration}-month duration")]
    ReducedBeyondDuration { reduced: u64, duration: u32 },
}

/// Every issue found in a submission, reported together.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid offender record: {}", render(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn render(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn validate_submission(
    submission: &OffenderSubmission,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    let OffenderSubmission { profile, facts } = submission;
    let mut issues = Vec::new();

    if profile.case_number.trim().is_empty() {
        issues.push(ValidationIssue::MissingCaseNumber);
    }
    if profile.full_name.trim().is_empty() {
        issues.push(ValidationIssue::MissingFullName);
    }

    if let Some(birth) = facts.birth_date {
        if birth > today {
            issues.push(ValidationIssue::BirthDateInFuture(birth));
        }
        if let Some(start) = facts.start_date {
            if start < birth {
                issues.push(ValidationIssue::StartBeforeBirth { start, birth });
            }
        }
    }

    if !(MIN_DURATION_MONTHS..=MAX_DURATION_MONTHS).contains(&facts.duration_months) {
        issues.push(ValidationIssue::DurationOutOfRange(facts.duration_months));
    }
    if facts.reduced_months > facts.duration_months {
        issues.push(ValidationIssue::ReducedBeyondDuration {
            reduced: u64::from(facts.reduced_months),
            duration: facts.duration_months,
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

/// Total `reduced_months` after granting `months` more, if it stays within the duration.
pub fn validate_reduction(facts: &OffenderCaseFacts, months: u32) -> Result<u32, ValidationError> {
    facts
        .reduced_months
        .checked_add(months)
        .filter(|total| *total <= facts.duration_months)
        .ok_or_else(|| ValidationError {
            issues: vec![ValidationIssue::ReducedBeyondDuration {
                reduced: u64::from(facts.reduced_months) + u64::from(months),
                duration: facts.duration_months,
            }],
        })
}
