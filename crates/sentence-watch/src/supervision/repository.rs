use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::assessment::CaseAssessment;
use super::domain::{
    OffenderCaseFacts, OffenderId, OffenderProfile, RiskLevel, SupervisionStatus,
};

/// A reduction that was granted and applied to `reduced_months`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionEntry {
    pub granted_on: NaiveDate,
    pub months: u32,
    pub reason: String,
}

/// Stored offender: facts as entered plus the assessment last derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffenderRecord {
    pub id: OffenderId,
    pub profile: OffenderProfile,
    pub facts: OffenderCaseFacts,
    pub assessment: CaseAssessment,
    #[serde(default)]
    pub reductions: Vec<ReductionEntry>,
}

impl OffenderRecord {
    pub fn status(&self) -> SupervisionStatus {
        self.assessment.lifecycle.status
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.assessment.risk.risk_level
    }

    pub fn view(&self) -> OffenderView {
        let lifecycle = &self.assessment.lifecycle;
        let risk = &self.assessment.risk;

        OffenderView {
            id: self.id,
            case_number: self.profile.case_number.clone(),
            full_name: self.profile.full_name.clone(),
            case_type: self.profile.case_type.label(),
            start_date: self.facts.start_date,
            duration_months: self.facts.duration_months,
            reduced_months: self.facts.reduced_months,
            reduction_count: self.facts.reduction_count,
            completion_date: lifecycle.completion_date,
            status: lifecycle.status,
            status_label: lifecycle.status.label(),
            days_remaining: lifecycle.days_remaining,
            eligible_for_reduction: lifecycle.eligible_for_reduction,
            next_reduction_date: lifecycle.next_reduction_date,
            risk_level: risk.risk_level,
            risk_level_label: risk.risk_level.label(),
            risk_percentage: risk.risk_percentage,
            risk_factors: risk.risk_factors.clone(),
            recommendations: risk.recommendations.clone(),
            assessed_on: self.assessment.as_of,
        }
    }
}

/// Flattened representation for API responses and listings.
#[derive(Debug, Clone, Serialize)]
pub struct OffenderView {
    pub id: OffenderId,
    pub case_number: String,
    pub full_name: String,
    pub case_type: &'static str,
    pub start_date: Option<NaiveDate>,
    pub duration_months: u32,
    pub reduced_months: u32,
    pub reduction_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
    pub status: SupervisionStatus,
    pub status_label: &'static str,
    pub days_remaining: u32,
    pub eligible_for_reduction: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_reduction_date: Option<NaiveDate>,
    pub risk_level: RiskLevel,
    pub risk_level_label: &'static str,
    pub risk_percentage: f64,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub assessed_on: NaiveDate,
}

/// Assessment replaced by [`OffenderRepository::reassess`].
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentUpdate {
    pub previous: CaseAssessment,
    pub current: CaseAssessment,
}

impl AssessmentUpdate {
    /// True when the status or the risk level moved.
    pub fn transitioned(&self) -> bool {
        self.previous.lifecycle.status != self.current.lifecycle.status
            || self.previous.risk.risk_level != self.current.risk.risk_level
    }
}

/// Storage seam for offender records. Implementations serialize writes per id.
pub trait OffenderRepository: Send + Sync {
    fn insert(&self, record: OffenderRecord) -> Result<OffenderRecord, RepositoryError>;
    fn update(&self, record: OffenderRecord) -> Result<(), RepositoryError>;
    /// Recomputes the stored assessment from the facts held at write time and
    /// replaces only that field. `Ok(None)` when the record no longer exists.
    fn reassess(
        &self,
        id: OffenderId,
        assess: &dyn Fn(&OffenderCaseFacts) -> CaseAssessment,
    ) -> Result<Option<AssessmentUpdate>, RepositoryError>;
    fn fetch(&self, id: OffenderId) -> Result<Option<OffenderRecord>, RepositoryError>;
    fn delete(&self, id: OffenderId) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<OffenderRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
