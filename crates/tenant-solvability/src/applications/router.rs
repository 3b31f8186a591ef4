use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{
    ApplicationId, AuditPublisher, RepositoryError, ScoreRepository, ScoreView,
};
use super::service::{SolvabilityService, SolvabilityServiceError};
use crate::scoring::TenantScoreInput;

/// Router builder exposing preview, scoring, lookup and listing endpoints.
pub fn solvability_router<R, A>(service: Arc<SolvabilityService<R, A>>) -> Router
where
    R: ScoreRepository + 'static,
    A: AuditPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/solvability/preview",
            post(preview_handler::<R, A>),
        )
        .route("/api/v1/solvability/recent", get(recent_handler::<R, A>))
        .route(
            "/api/v1/applications/:application_id/solvability",
            put(evaluate_handler::<R, A>).get(status_handler::<R, A>),
        )
        .with_state(service)
}

pub(crate) async fn preview_handler<R, A>(
    State(service): State<Arc<SolvabilityService<R, A>>>,
    axum::Json(input): axum::Json<TenantScoreInput>,
) -> Response
where
    R: ScoreRepository + 'static,
    A: AuditPublisher + 'static,
{
    match service.preview(input) {
        Ok(score) => (StatusCode::OK, axum::Json(score)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<R, A>(
    State(service): State<Arc<SolvabilityService<R, A>>>,
    Path(application_id): Path<String>,
    axum::Json(input): axum::Json<TenantScoreInput>,
) -> Response
where
    R: ScoreRepository + 'static,
    A: AuditPublisher + 'static,
{
    match service.evaluate(ApplicationId(application_id), input) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, A>(
    State(service): State<Arc<SolvabilityService<R, A>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ScoreRepository + 'static,
    A: AuditPublisher + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(SolvabilityServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "application_id": id.0,
                "error": "no solvability score recorded",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecentQuery {
    limit: Option<usize>,
}

const DEFAULT_RECENT: usize = 20;

pub(crate) async fn recent_handler<R, A>(
    State(service): State<Arc<SolvabilityService<R, A>>>,
    Query(query): Query<RecentQuery>,
) -> Response
where
    R: ScoreRepository + 'static,
    A: AuditPublisher + 'static,
{
    match service.recent(query.limit.unwrap_or(DEFAULT_RECENT)) {
        Ok(records) => {
            let views: Vec<ScoreView> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: SolvabilityServiceError) -> Response {
    let status = match &error {
        SolvabilityServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SolvabilityServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        SolvabilityServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SolvabilityServiceError::Repository(RepositoryError::Unavailable(_))
        | SolvabilityServiceError::Audit(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
