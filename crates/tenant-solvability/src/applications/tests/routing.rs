use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use crate::applications::{router, ApplicationId, SolvabilityService};
use crate::scoring::ScoringPolicy;

fn json_request(method: &str, uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

#[tokio::test]
async fn preview_route_returns_the_score() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/solvability/preview",
            &score_input(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["recommendation"], "accept");
    assert_eq!(payload["risk_level"], "low");
    assert_eq!(payload["warnings"], Value::Array(Vec::new()));
}

#[tokio::test]
async fn preview_route_rejects_invalid_input() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/solvability/preview",
            &invalid_input(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("monthly_income"));
}

#[tokio::test]
async fn evaluate_then_fetch_round_trips_through_the_router() {
    let (service, _, audit) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/applications/app-42/solvability",
            &score_input(),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let stored = read_json_body(response).await;
    assert_eq!(stored["application_id"], "app-42");
    assert_eq!(stored["applicant"], "Camille Martin");
    assert_eq!(audit.entries().len(), 1);

    let response = router
        .oneshot(
            Request::get("/api/v1/applications/app-42/solvability")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = read_json_body(response).await;
    assert_eq!(fetched["score"], stored["score"]);
}

#[tokio::test]
async fn status_handler_returns_not_found_for_unscored_applications() {
    let (service, _, _) = build_service();

    let response = router::status_handler::<MemoryRepository, MemoryAudit>(
        State(Arc::new(service)),
        Path("app-unknown".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["application_id"], "app-unknown");
}

#[tokio::test]
async fn evaluate_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(SolvabilityService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryAudit::default()),
        ScoringPolicy::default(),
    ));

    let response = router::evaluate_handler::<UnavailableRepository, MemoryAudit>(
        State(service),
        Path("app-7".to_string()),
        axum::Json(score_input()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn recent_route_lists_stored_scores() {
    let (service, _, _) = build_service();
    service
        .evaluate(ApplicationId("app-1".to_string()), score_input())
        .expect("scored");
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/solvability/recent?limit=5")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let listed = payload.as_array().expect("array of views");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["application_id"], "app-1");
    assert_eq!(listed[0]["score"]["recommendation"], "accept");
}
