use serde::{Deserialize, Serialize};

/// Weights and thresholds for the additive risk heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub young_age_years: f64,
    pub young_age_weight: f64,
    pub old_age_years: f64,
    pub old_age_weight: f64,
    pub unemployed_weight: f64,
    /// Occupations treated as lacking stable employment, compared case-insensitively.
    pub unemployed_terms: Vec<String>,
    pub expiring_soon_days: u32,
    pub expiring_soon_weight: f64,
    /// Substring marking an address as urban, compared case-insensitively.
    pub urban_marker: String,
    pub urban_weight: f64,
    pub rural_weight: f64,
    pub medium_threshold: f64,
    pub high_threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            young_age_years: 25.0,
            young_age_weight: 0.25,
            old_age_years: 50.0,
            old_age_weight: -0.10,
            unemployed_weight: 0.20,
            unemployed_terms: vec!["thất nghiệp".to_string(), "nông dân".to_string()],
            expiring_soon_days: 30,
            expiring_soon_weight: 0.15,
            urban_marker: "thành phố".to_string(),
            urban_weight: -0.05,
            rural_weight: 0.10,
            medium_threshold: 0.3,
            high_threshold: 0.7,
        }
    }
}
