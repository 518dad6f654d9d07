use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::assessment::CaseAssessment;
use super::domain::{OffenderCaseFacts, OffenderId, OffenderSubmission};
use super::repository::{OffenderRepository, OffenderView, RepositoryError};
use super::service::{ReductionGrant, SupervisionService, SupervisionServiceError};

/// Warning window used by the expiring listing when the caller does not pass one.
const DEFAULT_EXPIRING_LISTING_DAYS: u32 = 30;

pub fn supervision_router<R>(service: Arc<SupervisionService<R>>) -> Router
where
    R: OffenderRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/offenders",
            post(register_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/offenders/expiring", get(expiring_handler::<R>))
        .route(
            "/api/v1/offenders/:offender_id",
            get(fetch_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/offenders/:offender_id/reductions",
            post(reduction_handler::<R>),
        )
        .route("/api/v1/caseload/summary", get(summary_handler::<R>))
        .route("/api/v1/assessments", post(assessment_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct OffenderRequest {
    pub(crate) offender: OffenderSubmission,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReductionRequest {
    #[serde(flatten)]
    pub(crate) grant: ReductionGrant,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssessmentRequest {
    pub(crate) facts: OffenderCaseFacts,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    pub(crate) q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AsOfQuery {
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) days: Option<u32>,
}

fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

fn views(records: Vec<super::repository::OffenderRecord>) -> Vec<OffenderView> {
    records.iter().map(|record| record.view()).collect()
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<SupervisionService<R>>>,
    Json(request): Json<OffenderRequest>,
) -> Result<Response, SupervisionServiceError>
where
    R: OffenderRepository + 'static,
{
    let record = service.register(request.offender, resolve_today(request.today))?;
    Ok((StatusCode::CREATED, Json(record.view())).into_response())
}

/// `q` narrows the listing to matching names or case numbers.
pub(crate) async fn list_handler<R>(
    State(service): State<Arc<SupervisionService<R>>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<OffenderView>>, SupervisionServiceError>
where
    R: OffenderRepository + 'static,
{
    let records = match query.q.as_deref() {
        Some(term) => service.search(term)?,
        None => service.list()?,
    };
    Ok(Json(views(records)))
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<SupervisionService<R>>>,
    Path(offender_id): Path<u64>,
) -> Result<Json<OffenderView>, SupervisionServiceError>
where
    R: OffenderRepository + 'static,
{
    let record = service.get(OffenderId(offender_id))?;
    Ok(Json(record.view()))
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<SupervisionService<R>>>,
    Path(offender_id): Path<u64>,
    Json(request): Json<OffenderRequest>,
) -> Result<Json<OffenderView>, SupervisionServiceError>
where
    R: OffenderRepository + 'static,
{
    let record = service.update(
        OffenderId(offender_id),
        request.offender,
        resolve_today(request.today),
    )?;
    Ok(Json(record.view()))
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<SupervisionService<R>>>,
    Path(offender_id): Path<u64>,
) -> Result<StatusCode, SupervisionServiceError>
where
    R: OffenderRepository + 'static,
{
    service.remove(OffenderId(offender_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn reduction_handler<R>(
    State(service): State<Arc<SupervisionService<R>>>,
    Path(offender_id): Path<u64>,
    Json(request): Json<ReductionRequest>,
) -> Result<Json<OffenderView>, SupervisionServiceError>
where
    R: OffenderRepository + 'static,
{
    let record = service.grant_reduction(
        OffenderId(offender_id),
        request.grant,
        resolve_today(request.today),
    )?;
    Ok(Json(record.view()))
}

pub(crate) async fn expiring_handler<R>(
    State(service): State<Arc<SupervisionService<R>>>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<Vec<OffenderView>>, SupervisionServiceError>
where
    R: OffenderRepository + 'static,
{
    let days = query.days.unwrap_or(DEFAULT_EXPIRING_LISTING_DAYS);
    let records = service.expiring_within(days, resolve_today(query.today))?;
    Ok(Json(views(records)))
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<SupervisionService<R>>>,
    Query(query): Query<AsOfQuery>,
) -> Result<Response, SupervisionServiceError>
where
    R: OffenderRepository + 'static,
{
    let summary = service.summary(resolve_today(query.today))?;
    Ok(Json(summary).into_response())
}

pub(crate) async fn assessment_handler<R>(
    State(service): State<Arc<SupervisionService<R>>>,
    Json(request): Json<AssessmentRequest>,
) -> Json<CaseAssessment>
where
    R: OffenderRepository + 'static,
{
    let today = resolve_today(request.today);
    Json(service.assessor().assess(&request.facts, today))
}

impl IntoResponse for SupervisionServiceError {
    fn into_response(self) -> Response {
        let (status, payload) = match &self {
            SupervisionServiceError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": self.to_string(),
                    "issues": err.issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
                }),
            ),
            SupervisionServiceError::NotEligible {
                id,
                next_eligible_on,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": self.to_string(),
                    "offender_id": id,
                    "next_eligible_on": next_eligible_on,
                }),
            ),
            SupervisionServiceError::Repository(RepositoryError::NotFound) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "offender not found" }),
            ),
            SupervisionServiceError::Repository(RepositoryError::Conflict) => (
                StatusCode::CONFLICT,
                json!({ "error": "offender already exists" }),
            ),
            SupervisionServiceError::Repository(RepositoryError::Unavailable(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
        };

        (status, Json(payload)).into_response()
    }
}
