use crate::cli::ServeArgs;
use crate::infra::{load_roster, AppState, InMemoryOffenderRepository};
use crate::routes::with_supervision_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use sentence_watch::config::AppConfig;
use sentence_watch::error::AppError;
use sentence_watch::supervision::{
    CaseAssessor, OffenderRepository, RiskConfig, RosterImporter, SupervisionService,
};
use sentence_watch::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How often stored assessments are re-derived against the current date.
const REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryOffenderRepository::default());
    let assessor = CaseAssessor::new(
        config.supervision.lifecycle_policy(),
        RiskConfig::default(),
    );
    let supervision_service = Arc::new(SupervisionService::new(repository, assessor));

    if let Some(path) = &config.supervision.roster_csv {
        let submissions = RosterImporter::from_path(path)?;
        let load = load_roster(&supervision_service, submissions, Local::now().date_naive())?;
        info!(
            roster = %path.display(),
            registered = load.registered,
            rejected = load.rejected.len(),
            "roster loaded"
        );
    }

    spawn_refresh(supervision_service.clone());

    let app = with_supervision_routes(supervision_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        expiring_threshold_days = config.supervision.expiring_threshold_days,
        "supervision service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn spawn_refresh<R>(service: Arc<SupervisionService<R>>)
where
    R: OffenderRepository + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
        // The first tick fires immediately; records were just assessed.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(err) = service.refresh(Local::now().date_naive()) {
                warn!(error = %err, "scheduled refresh failed");
            }
        }
    });
}
