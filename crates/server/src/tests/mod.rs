// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router tests driven through `tower::ServiceExt::oneshot`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::*;
use crate::session::STAFF_ID_HEADER;
use axum::{
    body::Body,
    http::{Request, StatusCode as HttpStatusCode},
};
use serde_json::{Value, json};
use time::macros::time;
use tower::ServiceExt;
use ward_roster_domain::{StaffRole, TaskCategory};

struct TestServer {
    app: Router,
    manager: i64,
    nurse: i64,
    auxiliary: i64,
    morning: i64,
    team_leader: i64,
}

fn create_test_server() -> TestServer {
    let mut persistence: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
    let manager = persistence
        .create_staff("Mona", StaffRole::Manager, true)
        .unwrap();
    let nurse = persistence
        .create_staff("Alice", StaffRole::Nurse, true)
        .unwrap();
    let auxiliary = persistence
        .create_staff("Carol", StaffRole::AuxiliaryStaff, true)
        .unwrap();
    let morning = persistence
        .create_shift_type("Morning", time!(07:00), time!(15:00))
        .unwrap();
    let team_leader = persistence
        .create_task_item(TaskCategory::Main, "Team Leader")
        .unwrap();

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };
    TestServer {
        app: build_router(app_state),
        manager,
        nurse,
        auxiliary,
        morning,
        team_leader,
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    staff_id: Option<i64>,
    body: Option<Value>,
) -> (HttpStatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = staff_id {
        builder = builder.header(STAFF_ID_HEADER, id.to_string());
    }
    let body: Body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_empty_ward_bootstraps_first_manager() {
    let persistence: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
    let app: Router = build_router(AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    });

    let (status, body) = send(&app, "GET", "/bootstrap/status", None, None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["is_bootstrap_mode"], json!(true));
    let (status, _) = send(&app, "GET", "/capabilities", Some(1), None).await;
    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/bootstrap/first-manager",
        None,
        Some(json!({ "display_name": "Mona" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let manager = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/capabilities", Some(manager), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["can_manage"], json!(true));

    let (status, _) = send(
        &app,
        "POST",
        "/staff",
        Some(manager),
        Some(json!({ "display_name": "Alice", "role": "NURSE", "is_active": true })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/bootstrap/first-manager",
        None,
        Some(json!({ "display_name": "Eve" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);
    let (_, body) = send(&app, "GET", "/bootstrap/status", None, None).await;
    assert_eq!(body["is_bootstrap_mode"], json!(false));
}

#[tokio::test]
async fn test_missing_or_unknown_principal_is_unauthorized() {
    let server = create_test_server();

    let (status, body) = send(&server.app, "GET", "/capabilities", None, None).await;
    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!(true));

    let (status, _) = send(&server.app, "GET", "/capabilities", Some(999), None).await;
    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_capabilities_per_role() {
    let server = create_test_server();

    let (status, body) = send(
        &server.app,
        "GET",
        "/capabilities?today=2026-03-02",
        Some(server.manager),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["can_manage"], json!(true));

    let (_, body) = send(
        &server.app,
        "GET",
        "/capabilities?today=2026-03-02",
        Some(server.nurse),
        None,
    )
    .await;
    assert_eq!(body["can_manage"], json!(false));
    assert_eq!(body["role"], json!("NURSE"));
}

#[tokio::test]
async fn test_manager_writes_are_forbidden_for_staff() {
    let server = create_test_server();
    let request = json!({ "display_name": "Dave", "role": "NURSE", "is_active": true });

    let (status, body) = send(&server.app, "POST", "/staff", Some(server.nurse), Some(request.clone())).await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!(true));

    let (status, body) = send(&server.app, "POST", "/staff", Some(server.manager), Some(request)).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert!(body["id"].is_i64());
}

#[tokio::test]
async fn test_daily_assignment_feeds_roster_and_checklist() {
    let server = create_test_server();
    let entries = json!({
        "entries": [
            [format!("main_{}_{}", server.morning, server.team_leader), server.nurse.to_string()],
            [format!("main_{}_{}", server.morning, server.team_leader), server.auxiliary.to_string()],
        ]
    });

    let (status, body) = send(
        &server.app,
        "POST",
        "/daily-assign/2026/3/2",
        Some(server.manager),
        Some(entries),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["created"], json!(2));

    let (status, body) = send(&server.app, "GET", "/roster/2026/3", Some(server.nurse), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["days"].as_array().unwrap().len(), 31);
    assert_eq!(body["previous"], json!({ "year": 2026, "month": 2 }));

    let (_, body) = send(
        &server.app,
        "GET",
        "/checklist?today=2026-03-02",
        Some(server.nurse),
        None,
    )
    .await;
    assert_eq!(body["is_team_leader"], json!(true));
    assert_eq!(body["shifts"].as_array().unwrap().len(), 1);

    let (_, body) = send(
        &server.app,
        "GET",
        "/my-schedule?today=2026-03-02",
        Some(server.nurse),
        None,
    )
    .await;
    assert_eq!(body["upcoming"].as_array().unwrap().len(), 1);
    assert_eq!(body["shifts_today"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_dates_and_months_are_bad_requests() {
    let server = create_test_server();

    let (status, _) = send(&server.app, "GET", "/roster/2026/13", Some(server.nurse), None).await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);

    let (status, _) = send(&server.app, "GET", "/daily/2026/2/30", Some(server.nurse), None).await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);

    let (status, _) = send(
        &server.app,
        "GET",
        "/my-schedule?today=yesterday",
        Some(server.nurse),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_statuses_for_missing_conflict_and_protected() {
    let server = create_test_server();

    let (status, _) = send(
        &server.app,
        "POST",
        "/bulk-assign",
        Some(server.manager),
        Some(json!({
            "rotation_id": 404,
            "staff_ids": [server.nurse],
            "start_date": "2026-03-01",
            "end_date": "2026-03-07",
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);

    let shift = json!({
        "staff_id": server.nurse,
        "date": "2026-03-02",
        "shift_type_id": server.morning,
    });
    let (status, _) = send(&server.app, "POST", "/shifts", Some(server.manager), Some(shift.clone())).await;
    assert_eq!(status, HttpStatusCode::OK);
    let (status, _) = send(&server.app, "POST", "/shifts", Some(server.manager), Some(shift)).await;
    assert_eq!(status, HttpStatusCode::CONFLICT);

    let (status, body) = send(
        &server.app,
        "DELETE",
        &format!("/shift-types/{}", server.morning),
        Some(server.manager),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], json!(true));
}

#[tokio::test]
async fn test_reference_data_and_appraisal_routes() {
    let server = create_test_server();

    let (status, _) = send(
        &server.app,
        "POST",
        "/tasks/clinic",
        Some(server.manager),
        Some(json!({ "name": "Diabetes Clinic" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let (_, body) = send(&server.app, "GET", "/tasks/clinic", Some(server.nurse), None).await;
    assert_eq!(body["category"], json!("clinic"));
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &server.app,
        "POST",
        "/committees",
        Some(server.manager),
        Some(json!({ "name": "Infection Control" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let (_, body) = send(&server.app, "GET", "/committees", Some(server.nurse), None).await;
    assert_eq!(body["items"][0]["name"], json!("Infection Control"));

    let uri = format!(
        "/appraisal?staff_id={}&start_date=2026-03-01&end_date=2026-03-31",
        server.nurse
    );
    let (status, body) = send(&server.app, "GET", &uri, Some(server.manager), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["daily_completion_percent"], json!(0.0));
}
