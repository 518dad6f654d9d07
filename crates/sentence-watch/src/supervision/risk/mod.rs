//! Additive, order-sensitive risk heuristic over an offender's case facts.

mod config;
mod policy;
mod rules;

pub use config::RiskConfig;
pub(crate) use rules::age_in_years;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{OffenderCaseFacts, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    YoungAge,
    OldAge,
    Unemployed,
    ExpiringSoon,
    UrbanAddress,
    RuralAddress,
}

impl RiskFactor {
    /// Label reported in `risk_factors`; address factors adjust the score silently.
    pub const fn label(self) -> Option<&'static str> {
        match self {
            Self::YoungAge => Some("Tuổi trẻ"),
            Self::OldAge => Some("Tuổi cao"),
            Self::Unemployed => Some("Thất nghiệp"),
            Self::ExpiringSoon => Some("Sắp hết hạn"),
            Self::UrbanAddress | Self::RuralAddress => None,
        }
    }
}

/// One fired factor and the weight it contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: RiskFactor,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub risk_percentage: f64,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub components: Vec<ScoreComponent>,
}

/// Stateless scorer holding the weight configuration.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn score(
        &self,
        facts: &OffenderCaseFacts,
        days_remaining: u32,
        today: NaiveDate,
    ) -> RiskResult {
        let (components, raw_score) =
            rules::score_facts(facts, days_remaining, today, &self.config);

        let risk_score = raw_score.clamp(0.0, 1.0);
        let risk_level = policy::level_for(risk_score, &self.config);

        let fired: Vec<RiskFactor> = components.iter().map(|c| c.factor).collect();
        let risk_factors = fired
            .iter()
            .filter_map(|factor| factor.label())
            .map(str::to_string)
            .collect();
        let recommendations = policy::recommendations(risk_level, &fired);

        RiskResult {
            risk_score,
            risk_level,
            risk_percentage: risk_score * 100.0,
            risk_factors,
            recommendations,
            components,
        }
    }
}

/// Scores with the default weights.
pub fn score_risk(facts: &OffenderCaseFacts, days_remaining: u32, today: NaiveDate) -> RiskResult {
    RiskEngine::default().score(facts, days_remaining, today)
}
