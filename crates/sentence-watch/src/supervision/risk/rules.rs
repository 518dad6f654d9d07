use chrono::NaiveDate;

use super::super::domain::OffenderCaseFacts;
use super::config::RiskConfig;
use super::{RiskFactor, ScoreComponent};

const DAYS_PER_YEAR: f64 = 365.25;

pub(crate) fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> f64 {
    (today - birth_date).num_days() as f64 / DAYS_PER_YEAR
}

/// Evaluates the factors in their fixed order and returns the fired ones with the raw sum.
pub(crate) fn score_facts(
    facts: &OffenderCaseFacts,
    days_remaining: u32,
    today: NaiveDate,
    config: &RiskConfig,
) -> (Vec<ScoreComponent>, f64) {
    let mut components = Vec::new();

    if let Some(birth_date) = facts.birth_date {
        let age = age_in_years(birth_date, today);
        if age < config.young_age_years {
            components.push(ScoreComponent {
                factor: RiskFactor::YoungAge,
                weight: config.young_age_weight,
            });
        } else if age > config.old_age_years {
            components.push(ScoreComponent {
                factor: RiskFactor::OldAge,
                weight: config.old_age_weight,
            });
        }
    }

    if is_unemployed(&facts.occupation, config) {
        components.push(ScoreComponent {
            factor: RiskFactor::Unemployed,
            weight: config.unemployed_weight,
        });
    }

    if days_remaining < config.expiring_soon_days {
        components.push(ScoreComponent {
            factor: RiskFactor::ExpiringSoon,
            weight: config.expiring_soon_weight,
        });
    }

    // Whitespace is significant: only an empty address skips the location factor.
    if !facts.address.is_empty() {
        let component = if facts
            .address
            .to_lowercase()
            .contains(&config.urban_marker.to_lowercase())
        {
            ScoreComponent {
                factor: RiskFactor::UrbanAddress,
                weight: config.urban_weight,
            }
        } else {
            ScoreComponent {
                factor: RiskFactor::RuralAddress,
                weight: config.rural_weight,
            }
        };
        components.push(component);
    }

    let raw_score = components
        .iter()
        .fold(0.0, |total, component| total + component.weight);
    (components, raw_score)
}

fn is_unemployed(occupation: &str, config: &RiskConfig) -> bool {
    let occupation = occupation.to_lowercase();
    occupation.is_empty()
        || config
            .unemployed_terms
            .iter()
            .any(|term| term.to_lowercase() == occupation)
}
