use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{RiskLevel, SupervisionStatus};
use super::repository::OffenderRecord;
use super::risk::age_in_years;

/// Window used by the "expiring in the next month" insight.
const INSIGHT_EXPIRING_DAYS: u32 = 30;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub active: usize,
    pub expiring_soon: usize,
    pub completed: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Age buckets; upper bounds are inclusive.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AgeDistribution {
    pub up_to_25: usize,
    pub from_26_to_35: usize,
    pub from_36_to_50: usize,
    pub over_50: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseloadSummary {
    pub as_of: NaiveDate,
    pub total: usize,
    pub status: StatusBreakdown,
    pub risk: RiskBreakdown,
    pub age_distribution: AgeDistribution,
    pub completion_rate: f64,
    pub insights: Vec<String>,
}

impl CaseloadSummary {
    /// Rolls up the assessments the records carry; ages are taken at `today`.
    pub fn from_records(records: &[OffenderRecord], today: NaiveDate) -> Self {
        let mut status = StatusBreakdown::default();
        let mut risk = RiskBreakdown::default();
        let mut ages = AgeDistribution::default();
        let mut expiring_month = 0;

        for record in records {
            match record.status() {
                SupervisionStatus::Active => status.active += 1,
                SupervisionStatus::ExpiringSoon => status.expiring_soon += 1,
                SupervisionStatus::Completed => status.completed += 1,
            }
            match record.risk_level() {
                RiskLevel::Low => risk.low += 1,
                RiskLevel::Medium => risk.medium += 1,
                RiskLevel::High => risk.high += 1,
            }

            if let Some(birth_date) = record.facts.birth_date {
                let age = age_in_years(birth_date, today);
                if age <= 25.0 {
                    ages.up_to_25 += 1;
                } else if age <= 35.0 {
                    ages.from_26_to_35 += 1;
                } else if age <= 50.0 {
                    ages.from_36_to_50 += 1;
                } else {
                    ages.over_50 += 1;
                }
            }

            let remaining = record.assessment.lifecycle.days_remaining;
            if remaining > 0 && remaining <= INSIGHT_EXPIRING_DAYS {
                expiring_month += 1;
            }
        }

        let total = records.len();
        let completion_rate = if total > 0 {
            status.completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let mut insights = Vec::new();
        if total == 0 {
            insights.push("Không có dữ liệu để phân tích".to_string());
        } else {
            if expiring_month > 0 {
                insights.push(format!(
                    "{expiring_month} đối tượng sắp hết hạn trong {INSIGHT_EXPIRING_DAYS} ngày tới"
                ));
            }
            if risk.high > 0 {
                insights.push(format!(
                    "{} đối tượng có nguy cơ cao cần giám sát đặc biệt",
                    risk.high
                ));
            }
            insights.push(format!("Tỷ lệ hoàn thành: {completion_rate:.1}%"));
        }

        Self {
            as_of: today,
            total,
            status,
            risk,
            age_distribution: ages,
            completion_rate,
            insights,
        }
    }
}
