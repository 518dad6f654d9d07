use crate::infra::{load_roster, AppState, RosterLoad};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use sentence_watch::error::AppError;
use sentence_watch::supervision::{
    supervision_router, OffenderRepository, RosterImporter, SupervisionService,
};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct RosterImportRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn with_supervision_routes<R>(service: Arc<SupervisionService<R>>) -> axum::Router
where
    R: OffenderRepository + 'static,
{
    supervision_router(service.clone())
        .route(
            "/api/v1/roster/import",
            axum::routing::post(roster_import_endpoint::<R>),
        )
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .layer(Extension(service))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Registers every row of an uploaded roster CSV.
pub(crate) async fn roster_import_endpoint<R>(
    Extension(service): Extension<Arc<SupervisionService<R>>>,
    Json(payload): Json<RosterImportRequest>,
) -> Result<Json<RosterLoad>, AppError>
where
    R: OffenderRepository + 'static,
{
    let RosterImportRequest { csv, today } = payload;
    let submissions = RosterImporter::from_reader(Cursor::new(csv.into_bytes()))?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let load = load_roster(&service, submissions, today)?;
    Ok(Json(load))
}
