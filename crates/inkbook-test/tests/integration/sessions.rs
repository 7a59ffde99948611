#![allow(clippy::unused_async, unused_must_use)]
//! Tests for the session timer of in-progress appointments.

use salvo::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use super::helpers::*;

async fn in_progress_appointment(app: &TestApp) -> Uuid {
    let client = app.seed_client("Mika").await;
    let id = app
        .book(client, Uuid::now_v7(), None, "14:00", 240)
        .await
        .assert_status(StatusCode::CREATED)
        .id();
    TestRequest::put(&format!("/api/appointments/{id}/status"))
        .json(json!({ "status": "in_progress" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
    id
}

#[test_log::test(tokio::test)]
async fn start_and_stop_session() {
    let app = TestApp::new();
    let id = in_progress_appointment(&app).await;

    let started = TestRequest::post(&format!("/api/appointments/{id}/sessions/start"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(started["running"], true);
    assert_eq!(started["session_count"], 1);

    TestRequest::post(&format!("/api/appointments/{id}/sessions/start"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::CONFLICT)
        .assert_error("session_already_running");

    let stopped = TestRequest::post(&format!("/api/appointments/{id}/sessions/stop"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(stopped["running"], false);
    assert!(stopped["running_since"].is_null());

    let summary = TestRequest::get(&format!("/api/appointments/{id}/sessions"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(summary["session_count"], 1);
    assert_eq!(summary["appointment_id"], json!(id));
}

#[test_log::test(tokio::test)]
async fn stop_without_running_session() {
    let app = TestApp::new();
    let id = in_progress_appointment(&app).await;

    TestRequest::post(&format!("/api/appointments/{id}/sessions/stop"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::CONFLICT)
        .assert_error("session_not_running");
}

/// ## Summary
/// Only in-progress appointments can time a session.
#[test_log::test(tokio::test)]
async fn session_requires_in_progress() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let id = app
        .book(client, Uuid::now_v7(), None, "14:00", 60)
        .await
        .assert_status(StatusCode::CREATED)
        .id();

    TestRequest::post(&format!("/api/appointments/{id}/sessions/start"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::CONFLICT)
        .assert_error("session_not_allowed");
}

/// ## Summary
/// Completing an appointment closes a session left running.
#[test_log::test(tokio::test)]
async fn completing_closes_running_session() {
    let app = TestApp::new();
    let id = in_progress_appointment(&app).await;

    TestRequest::post(&format!("/api/appointments/{id}/sessions/start"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
    TestRequest::put(&format!("/api/appointments/{id}/status"))
        .json(json!({ "status": "completed" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    let summary = TestRequest::get(&format!("/api/appointments/{id}/sessions"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(summary["running"], false);
    assert_eq!(summary["session_count"], 1);
}

#[test_log::test(tokio::test)]
async fn sessions_of_unknown_appointment() {
    let app = TestApp::new();

    TestRequest::get(&format!("/api/appointments/{}/sessions", Uuid::now_v7()))
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
