use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use sentence_watch::supervision::{
    AssessmentUpdate, CaseAssessment, OffenderCaseFacts, OffenderId, OffenderRecord,
    OffenderRepository, OffenderSubmission, RepositoryError, SupervisionService,
    SupervisionServiceError,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryOffenderRepository {
    records: Arc<Mutex<HashMap<OffenderId, OffenderRecord>>>,
}

impl OffenderRepository for InMemoryOffenderRepository {
    fn insert(&self, record: OffenderRecord) -> Result<OffenderRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, record: OffenderRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id, record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn reassess(
        &self,
        id: OffenderId,
        assess: &dyn Fn(&OffenderCaseFacts) -> CaseAssessment,
    ) -> Result<Option<AssessmentUpdate>, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let Some(record) = guard.get_mut(&id) else {
            return Ok(None);
        };
        let current = assess(&record.facts);
        let previous = std::mem::replace(&mut record.assessment, current.clone());
        Ok(Some(AssessmentUpdate { previous, current }))
    }

    fn fetch(&self, id: OffenderId) -> Result<Option<OffenderRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn delete(&self, id: OffenderId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<OffenderRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// A roster entry the service refused, keyed by its case number.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RejectedEntry {
    pub(crate) case_number: String,
    pub(crate) reason: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub(crate) struct RosterLoad {
    pub(crate) registered: usize,
    pub(crate) rejected: Vec<RejectedEntry>,
}

/// Registers every submission; invalid entries are reported, not fatal.
pub(crate) fn load_roster<R>(
    service: &SupervisionService<R>,
    submissions: Vec<OffenderSubmission>,
    today: NaiveDate,
) -> Result<RosterLoad, SupervisionServiceError>
where
    R: OffenderRepository + 'static,
{
    let mut load = RosterLoad::default();
    for submission in submissions {
        let case_number = submission.profile.case_number.clone();
        match service.register(submission, today) {
            Ok(_) => load.registered += 1,
            Err(SupervisionServiceError::Validation(err)) => {
                warn!(%case_number, error = %err, "roster entry rejected");
                load.rejected.push(RejectedEntry {
                    case_number,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }
    Ok(load)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentence_watch::supervision::{CaseAssessor, CaseType, Gender, OffenderProfile};

    fn submission(case_number: &str, duration_months: u32) -> OffenderSubmission {
        OffenderSubmission {
            profile: OffenderProfile {
                case_number: case_number.to_string(),
                full_name: "Phạm Văn D".to_string(),
                gender: Gender::Male,
                id_number: String::new(),
                case_type: CaseType::Probation,
                crime: String::new(),
                phone: String::new(),
                ward: String::new(),
                notes: String::new(),
            },
            facts: OffenderCaseFacts {
                start_date: NaiveDate::from_ymd_opt(2025, 1, 10),
                duration_months,
                ..OffenderCaseFacts::default()
            },
        }
    }

    #[test]
    fn load_roster_reports_rejected_entries() {
        let service = SupervisionService::new(
            Arc::new(InMemoryOffenderRepository::default()),
            CaseAssessor::default(),
        );
        let today = NaiveDate::from_ymd_opt(2025, 9, 15).expect("valid date");

        let load = load_roster(
            &service,
            vec![submission("43AA0001", 12), submission("43AA0002", 0)],
            today,
        )
        .expect("store available");

        assert_eq!(load.registered, 1);
        assert_eq!(load.rejected.len(), 1);
        assert_eq!(load.rejected[0].case_number, "43AA0002");
        assert_eq!(service.list().expect("list").len(), 1);
    }

    #[test]
    fn repository_update_requires_existing_record() {
        let repository = InMemoryOffenderRepository::default();
        let service = SupervisionService::new(
            Arc::new(repository.clone()),
            CaseAssessor::default(),
        );
        let today = NaiveDate::from_ymd_opt(2025, 9, 15).expect("valid date");
        let mut record = service
            .register(submission("43AA0003", 6), today)
            .expect("register");

        record.id = OffenderId(99);
        assert!(matches!(
            repository.update(record),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn parse_date_reports_expected_format() {
        let err = parse_date("15/09/2025").expect_err("wrong format");
        assert!(err.contains("YYYY-MM-DD"));
    }

    #[test]
    fn reassess_keeps_facts_and_skips_missing_records() {
        let repository = InMemoryOffenderRepository::default();
        let service = SupervisionService::new(
            Arc::new(repository.clone()),
            CaseAssessor::default(),
        );
        let today = NaiveDate::from_ymd_opt(2025, 9, 15).expect("valid date");
        let record = service
            .register(submission("43AA0004", 6), today)
            .expect("register");

        let earlier = NaiveDate::from_ymd_opt(2025, 7, 8).expect("valid date");
        let assessor = CaseAssessor::default();
        let update = repository
            .reassess(record.id, &|facts| assessor.assess(facts, earlier))
            .expect("store available")
            .expect("record present");

        assert_eq!(update.previous, record.assessment);
        assert_eq!(update.current.as_of, earlier);
        assert!(update.transitioned());
        let stored = repository
            .fetch(record.id)
            .expect("fetch")
            .expect("record present");
        assert_eq!(stored.facts, record.facts);
        assert_eq!(stored.assessment, update.current);

        assert!(repository
            .reassess(OffenderId(99), &|facts| assessor.assess(facts, earlier))
            .expect("store available")
            .is_none());
    }
}
