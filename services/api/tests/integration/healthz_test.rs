use axum::http::StatusCode;

use probe_testing::probe::MockProbe;

use crate::helpers::{server_without_dependency, test_server};

#[tokio::test]
async fn should_report_ok_without_dependency() {
    let server = server_without_dependency();

    let resp = server.get("/healthz").await;

    resp.assert_status_ok();
    assert_eq!(resp.text(), r#"{"status":"ok"}"#);
    assert_eq!(resp.header("content-type"), "application/json");
}

#[tokio::test]
async fn should_report_ok_when_dependency_is_down() {
    let probe = MockProbe::failing();
    let server = test_server(Some(probe.clone()));

    let resp = server.get("/healthz").await;

    resp.assert_status_ok();
    assert_eq!(resp.text(), r#"{"status":"ok"}"#);
    assert_eq!(probe.pings(), 0, "liveness must not touch the dependency");
}

#[tokio::test]
async fn should_return_identical_responses() {
    let server = test_server(Some(MockProbe::healthy()));

    let first = server.get("/healthz").await;
    let second = server.get("/healthz").await;

    assert_eq!(first.status_code(), second.status_code());
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[tokio::test]
async fn should_answer_unknown_path_with_json_404() {
    let server = server_without_dependency();

    let resp = server.get("/nope").await;

    resp.assert_status(StatusCode::NOT_FOUND);
    let json: serde_json::Value = resp.json();
    assert_eq!(json["kind"], "NOT_FOUND");
}
