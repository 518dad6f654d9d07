use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::assessment::CaseAssessor;
use super::domain::{OffenderCaseFacts, OffenderId, OffenderSubmission, SupervisionStatus};
use super::report::CaseloadSummary;
use super::repository::{OffenderRecord, OffenderRepository, ReductionEntry, RepositoryError};
use super::validation::{validate_reduction, validate_submission, ValidationError};

/// Request to shorten a supervision period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionGrant {
    pub months: u32,
    #[serde(default)]
    pub reason: String,
}

/// Record-management layer: validates facts, derives assessments, and persists both.
///
/// Assessments are recomputed explicitly on every mutation and on [`refresh`](Self::refresh);
/// stored records are never updated implicitly.
pub struct SupervisionService<R> {
    repository: Arc<R>,
    assessor: Arc<CaseAssessor>,
    sequence: AtomicU64,
}

impl<R> SupervisionService<R>
where
    R: OffenderRepository + 'static,
{
    pub fn new(repository: Arc<R>, assessor: CaseAssessor) -> Self {
        Self {
            repository,
            assessor: Arc::new(assessor),
            sequence: AtomicU64::new(1),
        }
    }

    pub fn assessor(&self) -> &CaseAssessor {
        &self.assessor
    }

    fn next_id(&self) -> Result<OffenderId, RepositoryError> {
        loop {
            let id = OffenderId(self.sequence.fetch_add(1, Ordering::Relaxed));
            if self.repository.fetch(id)?.is_none() {
                return Ok(id);
            }
        }
    }

    pub fn register(
        &self,
        submission: OffenderSubmission,
        today: NaiveDate,
    ) -> Result<OffenderRecord, SupervisionServiceError> {
        validate_submission(&submission, today)?;

        let OffenderSubmission { profile, facts } = submission;
        let assessment = self.assessor.assess(&facts, today);
        let record = OffenderRecord {
            id: self.next_id()?,
            profile,
            facts,
            assessment,
            reductions: Vec::new(),
        };

        let stored = self.repository.insert(record)?;
        info!(
            offender_id = %stored.id,
            status = stored.status().code(),
            risk_level = stored.risk_level().code(),
            "offender registered"
        );
        Ok(stored)
    }

    /// Replaces profile and facts; reduction history is kept.
    pub fn update(
        &self,
        id: OffenderId,
        submission: OffenderSubmission,
        today: NaiveDate,
    ) -> Result<OffenderRecord, SupervisionServiceError> {
        let mut record = self.get(id)?;
        validate_submission(&submission, today)?;

        record.profile = submission.profile;
        record.facts = submission.facts;
        record.assessment = self.assessor.assess(&record.facts, today);

        self.repository.update(record.clone())?;
        info!(offender_id = %id, status = record.status().code(), "offender updated");
        Ok(record)
    }

    pub fn remove(&self, id: OffenderId) -> Result<(), SupervisionServiceError> {
        self.repository.delete(id)?;
        info!(offender_id = %id, "offender removed");
        Ok(())
    }

    pub fn get(&self, id: OffenderId) -> Result<OffenderRecord, SupervisionServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self) -> Result<Vec<OffenderRecord>, SupervisionServiceError> {
        let mut records = self.repository.list()?;
        records.sort_by_key(|record| record.id);
        Ok(records)
    }

    /// Applies a reduction if the offender has served at least a third of the period.
    /// The reduced total may never exceed the nominal duration.
    pub fn grant_reduction(
        &self,
        id: OffenderId,
        grant: ReductionGrant,
        today: NaiveDate,
    ) -> Result<OffenderRecord, SupervisionServiceError> {
        let mut record = self.get(id)?;
        let reduced_months = validate_reduction(&record.facts, grant.months)?;

        let current = self.assessor.assess(&record.facts, today);
        if !current.lifecycle.eligible_for_reduction {
            return Err(SupervisionServiceError::NotEligible {
                id,
                next_eligible_on: earliest_eligible_date(&record),
            });
        }

        record.facts.reduced_months = reduced_months;
        record.facts.reduction_count = record.facts.reduction_count.saturating_add(1);
        record.facts.last_reduction_date = Some(today);
        record.reductions.push(ReductionEntry {
            granted_on: today,
            months: grant.months,
            reason: grant.reason,
        });
        record.assessment = self.assessor.assess(&record.facts, today);

        self.repository.update(record.clone())?;
        info!(
            offender_id = %id,
            months = grant.months,
            reduced_months = record.facts.reduced_months,
            completion_date = ?record.assessment.lifecycle.completion_date,
            "sentence reduction granted"
        );
        Ok(record)
    }

    /// Re-derives every stored assessment as of `today`. Returns how many records
    /// changed status or risk level.
    ///
    /// Only assessments are written back, each from the facts stored at write
    /// time, so concurrent grants and edits are never reverted. Records removed
    /// while the refresh runs are skipped.
    pub fn refresh(&self, today: NaiveDate) -> Result<usize, SupervisionServiceError> {
        let assess = |facts: &OffenderCaseFacts| self.assessor.assess(facts, today);
        let mut changed = 0;

        for record in self.repository.list()? {
            let Some(update) = self.repository.reassess(record.id, &assess)? else {
                debug!(offender_id = %record.id, "record removed during refresh");
                continue;
            };
            if update.transitioned() {
                debug!(
                    offender_id = %record.id,
                    from = update.previous.lifecycle.status.code(),
                    to = update.current.lifecycle.status.code(),
                    "assessment changed on refresh"
                );
                changed += 1;
            }
        }

        info!(%today, changed, "caseload refreshed");
        Ok(changed)
    }

    /// Records completing between `today` and `today + days`, soonest first.
    pub fn expiring_within(
        &self,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<OffenderRecord>, SupervisionServiceError> {
        let mut expiring: Vec<(i64, OffenderRecord)> = self
            .repository
            .list()?
            .into_iter()
            .filter_map(|record| {
                let completion = self
                    .assessor
                    .assess(&record.facts, today)
                    .lifecycle
                    .completion_date?;
                let days_until = (completion - today).num_days();
                (0..=i64::from(days))
                    .contains(&days_until)
                    .then_some((days_until, record))
            })
            .collect();

        expiring.sort_by_key(|(days_until, record)| (*days_until, record.id));
        Ok(expiring.into_iter().map(|(_, record)| record).collect())
    }

    /// Filters on the stored assessments, as of their last refresh.
    pub fn with_status(
        &self,
        status: SupervisionStatus,
    ) -> Result<Vec<OffenderRecord>, SupervisionServiceError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| record.status() == status)
            .collect())
    }

    /// Case-insensitive substring match on full name or case number, by id.
    /// A blank term matches every record.
    pub fn search(&self, term: &str) -> Result<Vec<OffenderRecord>, SupervisionServiceError> {
        let needle = term.trim().to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| {
                record.profile.full_name.to_lowercase().contains(&needle)
                    || record.profile.case_number.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Caseload rollup as of `today`. Assessments are re-derived for the
    /// report and not stored.
    pub fn summary(&self, today: NaiveDate) -> Result<CaseloadSummary, SupervisionServiceError> {
        let records: Vec<OffenderRecord> = self
            .list()?
            .into_iter()
            .map(|mut record| {
                record.assessment = self.assessor.assess(&record.facts, today);
                record
            })
            .collect();
        Ok(CaseloadSummary::from_records(&records, today))
    }
}

/// First date at which a third of the nominal duration will have been served.
fn earliest_eligible_date(record: &OffenderRecord) -> Option<NaiveDate> {
    let start = record.facts.start_date?;
    let required_days = f64::from(record.facts.duration_months) / 3.0
        * super::lifecycle::AVERAGE_DAYS_PER_MONTH;
    start.checked_add_signed(chrono::Duration::days(required_days.ceil() as i64))
}

#[derive(Debug, thiserror::Error)]
pub enum SupervisionServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("offender {id} is not yet eligible for a reduction")]
    NotEligible {
        id: OffenderId,
        next_eligible_on: Option<NaiveDate>,
    },
}
