use crate::infra::{load_roster, InMemoryOffenderRepository, RosterLoad};
use chrono::{Local, NaiveDate};
use clap::Args;
use sentence_watch::error::AppError;
use sentence_watch::supervision::lifecycle::DEFAULT_EXPIRING_THRESHOLD_DAYS;
use sentence_watch::supervision::{
    CaseAssessment, CaseAssessor, CaseType, CaseloadSummary, Gender, LifecyclePolicy,
    OffenderCaseFacts, OffenderProfile, OffenderRecord, OffenderSubmission, ReductionGrant,
    RiskConfig, RosterImporter, SupervisionService,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// First day of supervision (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Sentenced supervision length in months
    #[arg(long)]
    pub(crate) duration_months: u32,
    /// Months already granted as reductions
    #[arg(long, default_value_t = 0)]
    pub(crate) reduced_months: u32,
    /// Number of reductions granted so far
    #[arg(long, default_value_t = 0)]
    pub(crate) reduction_count: u32,
    /// Date of the most recent reduction (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) last_reduction_date: Option<NaiveDate>,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) birth_date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub(crate) occupation: String,
    #[arg(long, default_value = "")]
    pub(crate) address: String,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Days before completion reported as expiring soon
    #[arg(long, default_value_t = DEFAULT_EXPIRING_THRESHOLD_DAYS)]
    pub(crate) expiring_threshold_days: i64,
    /// Print the assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterReportArgs {
    /// Roster CSV export
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Window for the upcoming completions listing
    #[arg(long, default_value_t = 30)]
    pub(crate) expiring_days: u32,
    /// Print the caseload summary as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the reduction walkthrough
    #[arg(long)]
    pub(crate) skip_reduction: bool,
}

pub(crate) fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let facts = OffenderCaseFacts {
        start_date: args.start_date,
        duration_months: args.duration_months,
        reduced_months: args.reduced_months,
        reduction_count: args.reduction_count,
        last_reduction_date: args.last_reduction_date,
        birth_date: args.birth_date,
        occupation: args.occupation,
        address: args.address,
    };
    let assessor = CaseAssessor::new(
        LifecyclePolicy {
            expiring_threshold_days: args.expiring_threshold_days,
        },
        RiskConfig::default(),
    );

    let assessment = assessor.assess(&facts, today);
    if args.json {
        print_json(&assessment);
    } else {
        render_assessment(&assessment);
    }
    Ok(())
}

pub(crate) fn run_roster_report(args: RosterReportArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let submissions = RosterImporter::from_path(&args.roster)?;

    let service = in_memory_service();
    let load = load_roster(&service, submissions, today)?;
    let summary = service.summary(today)?;

    if args.json {
        print_json(&summary);
        return Ok(());
    }

    println!("Roster report: {}", args.roster.display());
    render_load(&load);
    render_summary(&summary);

    let expiring = service.expiring_within(args.expiring_days, today)?;
    if expiring.is_empty() {
        println!("\nCompletions in the next {} days: none", args.expiring_days);
    } else {
        println!("\nCompletions in the next {} days", args.expiring_days);
        for record in &expiring {
            render_record_line(record);
        }
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let service = in_memory_service();

    println!("Supervision caseload demo (as of {today})");
    let load = load_roster(&service, sample_offenders(), today)?;
    render_load(&load);

    println!("\nRegistered offenders");
    let records = service.list()?;
    for record in &records {
        render_record_line(record);
        if !record.assessment.risk.recommendations.is_empty() {
            println!(
                "    recommendations: {}",
                record.assessment.risk.recommendations.join(", ")
            );
        }
    }

    if !args.skip_reduction {
        println!("\nReduction walkthrough");
        for record in &records {
            let grant = ReductionGrant {
                months: 1,
                reason: "Chấp hành tốt nghĩa vụ".to_string(),
            };
            match service.grant_reduction(record.id, grant, today) {
                Ok(updated) => println!(
                    "- {}: reduced to {:?}, {} days remaining",
                    updated.profile.full_name,
                    updated.assessment.lifecycle.completion_date,
                    updated.assessment.lifecycle.days_remaining
                ),
                Err(err) => println!("- {}: {}", record.profile.full_name, err),
            }
        }
    }

    let summary = service.summary(today)?;
    render_summary(&summary);
    Ok(())
}

fn in_memory_service() -> SupervisionService<InMemoryOffenderRepository> {
    SupervisionService::new(
        Arc::new(InMemoryOffenderRepository::default()),
        CaseAssessor::default(),
    )
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("unable to render JSON: {err}"),
    }
}

fn render_assessment(assessment: &CaseAssessment) {
    let lifecycle = &assessment.lifecycle;
    let risk = &assessment.risk;

    println!("Assessment as of {}", assessment.as_of);
    match lifecycle.completion_date {
        Some(date) => println!("Completion date: {date}"),
        None => println!("Completion date: unknown (missing start date or duration)"),
    }
    println!(
        "Status: {} | {} days remaining",
        lifecycle.status.label(),
        lifecycle.days_remaining
    );
    if lifecycle.eligible_for_reduction {
        match lifecycle.next_reduction_date {
            Some(date) => println!("Eligible for reduction; next review on {date}"),
            None => println!("Eligible for reduction"),
        }
    } else {
        println!("Not yet eligible for reduction");
    }

    println!(
        "\nRisk: {} ({:.0}%)",
        risk.risk_level.label(),
        risk.risk_percentage
    );
    for component in &risk.components {
        println!("  - {:?}: {:+.2}", component.factor, component.weight);
    }
    if !risk.risk_factors.is_empty() {
        println!("Factors: {}", risk.risk_factors.join(", "));
    }
    println!("Recommendations");
    for item in &risk.recommendations {
        println!("- {item}");
    }
}

fn render_load(load: &RosterLoad) {
    println!("- {} offenders registered", load.registered);
    for rejected in &load.rejected {
        println!("  rejected {}: {}", rejected.case_number, rejected.reason);
    }
}

fn render_record_line(record: &OffenderRecord) {
    let lifecycle = &record.assessment.lifecycle;
    let completion = lifecycle
        .completion_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "- [{}] {} {} | {} | completes {} ({} days) | risk {} {:.0}%",
        record.id,
        record.profile.case_number,
        record.profile.full_name,
        lifecycle.status.label(),
        completion,
        lifecycle.days_remaining,
        record.risk_level().label(),
        record.assessment.risk.risk_percentage
    );
}

fn render_summary(summary: &CaseloadSummary) {
    println!("\nCaseload summary ({} offenders)", summary.total);
    println!(
        "- Status: {} active | {} expiring soon | {} completed",
        summary.status.active, summary.status.expiring_soon, summary.status.completed
    );
    println!(
        "- Risk: {} low | {} medium | {} high",
        summary.risk.low, summary.risk.medium, summary.risk.high
    );
    let ages = &summary.age_distribution;
    println!(
        "- Ages: {} up to 25 | {} 26-35 | {} 36-50 | {} over 50",
        ages.up_to_25, ages.from_26_to_35, ages.from_36_to_50, ages.over_50
    );

    if !summary.insights.is_empty() {
        println!("\nInsights");
        for insight in &summary.insights {
            println!("- {insight}");
        }
    }
}

fn offender(
    case_number: &str,
    full_name: &str,
    gender: Gender,
    case_type: CaseType,
    crime: &str,
    ward: &str,
) -> OffenderProfile {
    OffenderProfile {
        case_number: case_number.to_string(),
        full_name: full_name.to_string(),
        gender,
        id_number: String::new(),
        case_type,
        crime: crime.to_string(),
        phone: String::new(),
        ward: ward.to_string(),
        notes: String::new(),
    }
}

pub(crate) fn sample_offenders() -> Vec<OffenderSubmission> {
    vec![
        OffenderSubmission {
            profile: offender(
                "40CE0625",
                "Nguyễn Văn A",
                Gender::Male,
                CaseType::SuspendedSentence,
                "Trộm cắp tài sản",
                "P. Bắc Hồng",
            ),
            facts: OffenderCaseFacts {
                start_date: NaiveDate::from_ymd_opt(2025, 6, 1),
                duration_months: 6,
                reduced_months: 1,
                reduction_count: 1,
                last_reduction_date: NaiveDate::from_ymd_opt(2025, 9, 2),
                birth_date: NaiveDate::from_ymd_opt(1990, 5, 15),
                occupation: "Nông dân".to_string(),
                address: "TDP 1, P. Bắc Hồng".to_string(),
            },
        },
        OffenderSubmission {
            profile: offender(
                "41CG0626",
                "Trần Thị B",
                Gender::Female,
                CaseType::Probation,
                "Cố ý gây thương tích",
                "P. Nam Hồng",
            ),
            facts: OffenderCaseFacts {
                start_date: NaiveDate::from_ymd_opt(2025, 5, 15),
                duration_months: 12,
                reduced_months: 2,
                reduction_count: 1,
                last_reduction_date: NaiveDate::from_ymd_opt(2025, 11, 15),
                birth_date: NaiveDate::from_ymd_opt(1985, 8, 20),
                occupation: "Thợ may".to_string(),
                address: "TDP 2, P. Nam Hồng".to_string(),
            },
        },
    ]
}
