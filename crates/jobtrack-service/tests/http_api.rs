//! Router round trips through `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use jobtrack_core::KeySchema;
use jobtrack_service::{app_state::AppState, config, router};

fn app() -> (AppState, Router) {
    let cfg = config::load_from_str("version: 1\n").unwrap();
    let state = AppState::new(cfg);
    assert_eq!(state.cfg().tracker.key_schema, KeySchema::Segmented);
    (state.clone(), router::build_router(state))
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn durations_and_counts_show_up_in_metrics() {
    let (_, app) = app();

    for ms in [50, 150] {
        let (status, _) = call(
            &app,
            Method::POST,
            "/v1/jobs/build-1/ops/compile/duration",
            Some(json!({ "duration_ms": ms })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/jobs/build-1/ops/compile/count",
        Some(json!({ "count": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::GET, "/v1/jobs/build-1/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        v,
        json!({
            "compile.total.count": 2,
            "compile.total.duration": 200,
            "compile.avg.duration": 100.0,
            "compile.count": 4
        })
    );
}

#[tokio::test]
async fn running_flag_round_trip() {
    let (_, app) = app();

    let (_, body) = call(&app, Method::GET, "/v1/jobs/nightly", None).await;
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["running"], json!(false));
    assert!(v["first_executed"].is_null());

    let (status, _) = call(
        &app,
        Method::PUT,
        "/v1/jobs/nightly/running",
        Some(json!({ "running": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::GET, "/v1/jobs/nightly", None).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["running"], json!(true));
    assert!(v["first_executed"].is_string());
    assert_eq!(v["first_executed"], v["last_executed"]);
}

#[tokio::test]
async fn unknown_body_fields_are_rejected() {
    let (_, app) = app();
    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/jobs/j/ops/o/count",
        Some(json!({ "count": 1, "extra": true })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn out_of_range_duration_maps_to_bad_request() {
    let (state, app) = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/jobs/j/ops/o/duration",
        Some(json!({ "duration_ms": u64::MAX })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["code"], json!("BAD_REQUEST"));

    let m = state.metrics();
    assert_eq!(
        m.tracker_errors.get(&[("op", "track_duration"), ("code", "BAD_REQUEST")]),
        1
    );
}

#[tokio::test]
async fn service_metrics_count_calls() {
    let (state, app) = app();
    call(&app, Method::GET, "/v1/jobs/a/metrics", None).await;
    call(&app, Method::GET, "/v1/jobs/b/metrics", None).await;

    let m = state.metrics();
    assert_eq!(m.tracker_calls.get(&[("op", "metrics")]), 2);
    assert_eq!(m.call_duration.count(&[("op", "metrics")]), 2);

    let (status, body) = call(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("jobtrack_tracker_calls_total{op=\"metrics\"} 2"));

    let (status, _) = call(&app, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn ambiguous_operation_id_is_rejected() {
    let (_, app) = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/jobs/j/ops/x.total/count",
        Some(json!({ "count": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["code"], json!("BAD_REQUEST"));
}
