//! Offender supervision records: sentence lifecycle, risk scoring, and the
//! record-management layer built around them.
//!
//! [`lifecycle`] and [`risk`] are pure functions of the case facts and an
//! explicit evaluation date. Everything else stores, imports, or serves their
//! results.

pub mod assessment;
pub mod domain;
pub mod lifecycle;
pub mod report;
pub mod repository;
pub mod risk;
pub mod roster;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use assessment::{CaseAssessment, CaseAssessor};
pub use domain::{
    CaseType, Gender, OffenderCaseFacts, OffenderId, OffenderProfile, OffenderSubmission,
    RiskLevel, SupervisionStatus, UnknownDomainValue,
};
pub use lifecycle::{LifecyclePolicy, LifecycleResult};
pub use report::CaseloadSummary;
pub use repository::{
    AssessmentUpdate, OffenderRecord, OffenderRepository, OffenderView, ReductionEntry,
    RepositoryError,
};
pub use risk::{RiskConfig, RiskEngine, RiskFactor, RiskResult, ScoreComponent};
pub use roster::{RosterImportError, RosterImporter};
pub use router::supervision_router;
pub use service::{ReductionGrant, SupervisionService, SupervisionServiceError};
pub use validation::{ValidationError, ValidationIssue};
