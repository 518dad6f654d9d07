//! Completion date, status, and reduction eligibility for a supervision period.
//!
//! Every function takes the evaluation date explicitly; nothing here reads the
//! wall clock.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{OffenderCaseFacts, SupervisionStatus};

/// Days before completion at which a period is reported as expiring soon.
pub const DEFAULT_EXPIRING_THRESHOLD_DAYS: i64 = 5;

/// Average month length used for served-time eligibility. Intentionally not calendar exact.
pub const AVERAGE_DAYS_PER_MONTH: f64 = 30.44;

/// Minimum spacing between two reduction grants.
pub const REDUCTION_INTERVAL_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecyclePolicy {
    pub expiring_threshold_days: i64,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            expiring_threshold_days: DEFAULT_EXPIRING_THRESHOLD_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleResult {
    pub completion_date: Option<NaiveDate>,
    pub status: SupervisionStatus,
    pub days_remaining: u32,
    pub eligible_for_reduction: bool,
    pub next_reduction_date: Option<NaiveDate>,
}

/// `start + duration` calendar months, then minus `reduced` calendar months.
///
/// Each step clamps to the last valid day of the target month, so Jan 31 plus
/// one month lands on Feb 28 (or 29). Returns `None` without a start date or a
/// positive duration.
pub fn compute_completion_date(
    start_date: Option<NaiveDate>,
    duration_months: u32,
    reduced_months: u32,
) -> Option<NaiveDate> {
    let start = start_date?;
    if duration_months == 0 {
        return None;
    }

    let base = start.checked_add_months(Months::new(duration_months))?;
    if reduced_months > 0 {
        base.checked_sub_months(Months::new(reduced_months))
    } else {
        Some(base)
    }
}

pub fn compute_status(
    completion_date: Option<NaiveDate>,
    today: NaiveDate,
    policy: &LifecyclePolicy,
) -> SupervisionStatus {
    let Some(completion) = completion_date else {
        return SupervisionStatus::Active;
    };

    let days_until = (completion - today).num_days();
    if days_until <= 0 {
        SupervisionStatus::Completed
    } else if days_until <= policy.expiring_threshold_days {
        SupervisionStatus::ExpiringSoon
    } else {
        SupervisionStatus::Active
    }
}

pub fn compute_days_remaining(completion_date: Option<NaiveDate>, today: NaiveDate) -> u32 {
    completion_date
        .map(|completion| (completion - today).num_days().max(0))
        .map(|days| u32::try_from(days).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Served time in average-length months; negative before the start date.
pub fn served_months(start_date: NaiveDate, today: NaiveDate) -> f64 {
    (today - start_date).num_days() as f64 / AVERAGE_DAYS_PER_MONTH
}

/// True once at least one third of the nominal duration has been served.
pub fn is_eligible_for_reduction(
    start_date: Option<NaiveDate>,
    completion_date: Option<NaiveDate>,
    duration_months: u32,
    today: NaiveDate,
) -> bool {
    let (Some(start), Some(_)) = (start_date, completion_date) else {
        return false;
    };

    let required_months = f64::from(duration_months) / 3.0;
    served_months(start, today) >= required_months
}

pub fn next_reduction_date(
    eligible: bool,
    last_reduction_date: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
) -> Option<NaiveDate> {
    if !eligible {
        return None;
    }

    last_reduction_date
        .or(start_date)?
        .checked_add_months(Months::new(REDUCTION_INTERVAL_MONTHS))
}

pub fn evaluate_lifecycle(
    facts: &OffenderCaseFacts,
    today: NaiveDate,
    policy: &LifecyclePolicy,
) -> LifecycleResult {
    let completion_date = compute_completion_date(
        facts.start_date,
        facts.duration_months,
        facts.reduced_months,
    );
    let status = compute_status(completion_date, today, policy);
    let days_remaining = compute_days_remaining(completion_date, today);
    let eligible_for_reduction = is_eligible_for_reduction(
        facts.start_date,
        completion_date,
        facts.duration_months,
        today,
    );
    let next_reduction_date = next_reduction_date(
        eligible_for_reduction,
        facts.last_reduction_date,
        facts.start_date,
    );

    LifecycleResult {
        completion_date,
        status,
        days_remaining,
        eligible_for_reduction,
        next_reduction_date,
    }
}
