use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::supervision::assessment::{CaseAssessment, CaseAssessor};
use crate::supervision::domain::{
    CaseType, Gender, OffenderCaseFacts, OffenderId, OffenderProfile, OffenderSubmission,
};
use crate::supervision::repository::{
    AssessmentUpdate, OffenderRecord, OffenderRepository, RepositoryError,
};
use crate::supervision::{supervision_router, SupervisionService};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2025, 9, 15)
}

pub(super) fn profile(case_number: &str, full_name: &str) -> OffenderProfile {
    OffenderProfile {
        case_number: case_number.to_string(),
        full_name: full_name.to_string(),
        gender: Gender::Male,
        id_number: "042090001234".to_string(),
        case_type: CaseType::SuspendedSentence,
        crime: "Trộm cắp tài sản".to_string(),
        phone: String::new(),
        ward: "P. Bắc Hồng".to_string(),
        notes: String::new(),
    }
}

/// Six-month suspended sentence started 2025-06-01, one month already reduced.
pub(super) fn submission() -> OffenderSubmission {
    OffenderSubmission {
        profile: profile("40CE0625", "Nguyễn Văn A"),
        facts: OffenderCaseFacts {
            start_date: Some(date(2025, 6, 1)),
            duration_months: 6,
            reduced_months: 1,
            reduction_count: 1,
            last_reduction_date: Some(date(2025, 9, 2)),
            birth_date: Some(date(1990, 5, 15)),
            occupation: "Nông dân".to_string(),
            address: "TDP 1, P. Bắc Hồng".to_string(),
        },
    }
}

/// Twelve-month probation started 2025-08-01; not yet a third served on [`today`].
pub(super) fn recent_submission() -> OffenderSubmission {
    OffenderSubmission {
        profile: OffenderProfile {
            gender: Gender::Female,
            case_type: CaseType::Probation,
            ..profile("41CG0626", "Trần Thị B")
        },
        facts: OffenderCaseFacts {
            start_date: Some(date(2025, 8, 1)),
            duration_months: 12,
            birth_date: Some(date(1985, 8, 20)),
            occupation: "Thợ may".to_string(),
            address: "Thành phố Hà Tĩnh".to_string(),
            ..OffenderCaseFacts::default()
        },
    }
}

/// Completes on 2025-09-18, three days after [`today`].
pub(super) fn expiring_submission() -> OffenderSubmission {
    OffenderSubmission {
        profile: profile("42AB0001", "Lê Văn C"),
        facts: OffenderCaseFacts {
            start_date: Some(date(2025, 3, 18)),
            duration_months: 6,
            birth_date: Some(date(2003, 1, 10)),
            occupation: String::new(),
            address: "Xã Thạch Hạ".to_string(),
            ..OffenderCaseFacts::default()
        },
    }
}

pub(super) fn build_service() -> (SupervisionService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = SupervisionService::new(repository.clone(), CaseAssessor::default());
    (service, repository)
}

pub(super) fn router_with_service(service: SupervisionService<MemoryRepository>) -> axum::Router {
    supervision_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<OffenderId, OffenderRecord>>>,
}

impl OffenderRepository for MemoryRepository {
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
        guard.insert(record.id, record);
        Ok(())
    }

    fn reassess(
        &self,
        id: OffenderId,
        assess: &dyn Fn(&OffenderCaseFacts) -> CaseAssessment,
    ) -> Result<Option<AssessmentUpdate>, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get_mut(&id).map(|record| {
            let current = assess(&record.facts);
            let previous = std::mem::replace(&mut record.assessment, current.clone());
            AssessmentUpdate { previous, current }
        }))
    }

    fn fetch(&self, id: OffenderId) -> Result<Option<OffenderRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn delete(&self, id: OffenderId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<OffenderRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct ConflictRepository;

impl OffenderRepository for ConflictRepository {
    fn insert(&self, _record: OffenderRecord) -> Result<OffenderRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: OffenderRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn reassess(
        &self,
        _id: OffenderId,
        _assess: &dyn Fn(&OffenderCaseFacts) -> CaseAssessment,
    ) -> Result<Option<AssessmentUpdate>, RepositoryError> {
        Ok(None)
    }

    fn fetch(&self, _id: OffenderId) -> Result<Option<OffenderRecord>, RepositoryError> {
        Ok(None)
    }

    fn delete(&self, _id: OffenderId) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<OffenderRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl OffenderRepository for UnavailableRepository {
    fn insert(&self, _record: OffenderRecord) -> Result<OffenderRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: OffenderRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn reassess(
        &self,
        _id: OffenderId,
        _assess: &dyn Fn(&OffenderCaseFacts) -> CaseAssessment,
    ) -> Result<Option<AssessmentUpdate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: OffenderId) -> Result<Option<OffenderRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: OffenderId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<OffenderRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

type ListHook = Box<dyn FnOnce(&MemoryRepository) + Send>;

/// Runs a one-shot mutation right after `list` takes its snapshot, standing in
/// for a request that lands while a caseload sweep is in flight.
pub(super) struct InterleavedRepository {
    pub(super) inner: MemoryRepository,
    after_list: Mutex<Option<ListHook>>,
}

impl InterleavedRepository {
    pub(super) fn new(
        inner: MemoryRepository,
        after_list: impl FnOnce(&MemoryRepository) + Send + 'static,
    ) -> Self {
        Self {
            inner,
            after_list: Mutex::new(Some(Box::new(after_list))),
        }
    }
}

impl OffenderRepository for InterleavedRepository {
    fn insert(&self, record: OffenderRecord) -> Result<OffenderRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: OffenderRecord) -> Result<(), RepositoryError> {
        self.inner.update(record)
    }

    fn reassess(
        &self,
        id: OffenderId,
        assess: &dyn Fn(&OffenderCaseFacts) -> CaseAssessment,
    ) -> Result<Option<AssessmentUpdate>, RepositoryError> {
        self.inner.reassess(id, assess)
    }

    fn fetch(&self, id: OffenderId) -> Result<Option<OffenderRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn delete(&self, id: OffenderId) -> Result<(), RepositoryError> {
        self.inner.delete(id)
    }

    fn list(&self) -> Result<Vec<OffenderRecord>, RepositoryError> {
        let snapshot = self.inner.list()?;
        let hook = self.after_list.lock().expect("hook mutex poisoned").take();
        if let Some(hook) = hook {
            hook(&self.inner);
        }
        Ok(snapshot)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
