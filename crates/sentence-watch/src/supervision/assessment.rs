use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::OffenderCaseFacts;
use super::lifecycle::{evaluate_lifecycle, LifecyclePolicy, LifecycleResult};
use super::risk::{RiskConfig, RiskEngine, RiskResult};

/// Derived view of a case as of a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseAssessment {
    pub as_of: NaiveDate,
    pub lifecycle: LifecycleResult,
    pub risk: RiskResult,
}

/// Runs the lifecycle calculator, then feeds its remaining days into the risk engine.
#[derive(Debug, Clone, Default)]
pub struct CaseAssessor {
    lifecycle: LifecyclePolicy,
    risk: RiskEngine,
}

impl CaseAssessor {
    pub fn new(lifecycle: LifecyclePolicy, risk: RiskConfig) -> Self {
        Self {
            lifecycle,
            risk: RiskEngine::new(risk),
        }
    }

    pub fn lifecycle_policy(&self) -> &LifecyclePolicy {
        &self.lifecycle
    }

    pub fn assess(&self, facts: &OffenderCaseFacts, today: NaiveDate) -> CaseAssessment {
        let lifecycle = evaluate_lifecycle(facts, today, &self.lifecycle);
        let risk = self.risk.score(facts, lifecycle.days_remaining, today);

        CaseAssessment {
            as_of: today,
            lifecycle,
            risk,
        }
    }
}
