use chrono::{Duration, NaiveDate};
use sentence_watch::supervision::lifecycle::{
    compute_completion_date, compute_days_remaining, compute_status, is_eligible_for_reduction,
};
use sentence_watch::supervision::risk::score_risk;
use sentence_watch::supervision::{
    CaseAssessor, LifecyclePolicy, OffenderCaseFacts, RiskConfig, RiskLevel, SupervisionStatus,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 15).expect("valid today")
}

#[test]
fn reduced_six_month_sentence_completes_in_november() {
    let start = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid start");

    let completion = compute_completion_date(Some(start), 6, 1);

    assert_eq!(completion, NaiveDate::from_ymd_opt(2025, 11, 1));
}

#[test]
fn status_and_remaining_days_track_completion() {
    let policy = LifecyclePolicy::default();

    let soon = Some(today() + Duration::days(3));
    assert_eq!(
        compute_status(soon, today(), &policy),
        SupervisionStatus::ExpiringSoon
    );
    assert_eq!(compute_days_remaining(soon, today()), 3);

    let past = Some(today() - Duration::days(10));
    assert_eq!(
        compute_status(past, today(), &policy),
        SupervisionStatus::Completed
    );
    assert_eq!(compute_days_remaining(past, today()), 0);
}

#[test]
fn sixty_days_served_of_six_months_is_not_eligible() {
    let start = today() - Duration::days(60);
    let completion = compute_completion_date(Some(start), 6, 0);

    assert!(!is_eligible_for_reduction(Some(start), completion, 6, today()));
    assert!(is_eligible_for_reduction(
        Some(start),
        completion,
        6,
        today() + Duration::days(1)
    ));
}

#[test]
fn unemployed_city_resident_scores_low() {
    let facts = OffenderCaseFacts {
        birth_date: NaiveDate::from_ymd_opt(1999, 9, 15),
        occupation: String::new(),
        address: "Thành phố Hà Tĩnh".to_string(),
        ..OffenderCaseFacts::default()
    };

    let result = score_risk(&facts, 45, today());

    assert!((result.risk_score - 0.15).abs() < 1e-9);
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(result.risk_factors, vec!["Thất nghiệp"]);
}

#[test]
fn assessor_feeds_remaining_days_into_risk() {
    let facts = OffenderCaseFacts {
        start_date: NaiveDate::from_ymd_opt(2025, 3, 18),
        duration_months: 6,
        birth_date: NaiveDate::from_ymd_opt(1980, 2, 1),
        occupation: "Giáo viên".to_string(),
        ..OffenderCaseFacts::default()
    };

    let assessment = CaseAssessor::default().assess(&facts, today());

    assert_eq!(assessment.lifecycle.days_remaining, 3);
    assert_eq!(assessment.lifecycle.status, SupervisionStatus::ExpiringSoon);
    assert_eq!(assessment.risk.risk_factors, vec!["Sắp hết hạn"]);
    assert!(assessment
        .risk
        .recommendations
        .contains(&"Chuẩn bị hồ sơ hoàn thành".to_string()));
}

#[test]
fn wider_threshold_marks_month_out_completion_as_expiring() {
    let facts = OffenderCaseFacts {
        start_date: NaiveDate::from_ymd_opt(2025, 4, 10),
        duration_months: 6,
        ..OffenderCaseFacts::default()
    };
    let default_assessor = CaseAssessor::default();
    let wide_assessor = CaseAssessor::new(
        LifecyclePolicy {
            expiring_threshold_days: 30,
        },
        RiskConfig::default(),
    );

    let narrow = default_assessor.assess(&facts, today());
    let wide = wide_assessor.assess(&facts, today());

    assert_eq!(narrow.lifecycle.days_remaining, 25);
    assert_eq!(narrow.lifecycle.status, SupervisionStatus::Active);
    assert_eq!(wide.lifecycle.status, SupervisionStatus::ExpiringSoon);
    assert_eq!(narrow.risk, wide.risk);
}
