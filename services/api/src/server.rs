use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAuditTrail, InMemoryScoreRepository};
use crate::routes::with_solvability_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tenant_solvability::applications::SolvabilityService;
use tenant_solvability::config::AppConfig;
use tenant_solvability::error::AppError;
use tenant_solvability::telemetry;
use tracing::info;

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

    let repository = Arc::new(InMemoryScoreRepository::default());
    let audit = Arc::new(InMemoryAuditTrail::default());
    let service = Arc::new(SolvabilityService::new(
        repository,
        audit,
        config.scoring.clone(),
    ));

    let app = with_solvability_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        full_marks_ratio = config.scoring.full_marks_ratio,
        "solvability service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
