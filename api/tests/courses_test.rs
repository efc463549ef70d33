mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use common::make_test_app;
use serde_json::{json, Value};
use tower::ServiceExt;

fn course_payload(name: &str) -> Value {
    json!({
        "name": name,
        "section_number": "A",
        "sections": ["A", "B"],
        "professor_name": "Dr. Hopper",
        "office_hours": "Tue 2-4pm",
        "news": "First day of class",
        "total_students": 30,
        "logo_path": null
    })
}

async fn post_course(app: &axum::Router, name: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/courses")
        .header("content-type", "application/json")
        .body(Body::from(course_payload(name).to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn create_get_list_update_delete_round_trip() {
    let (app, _state) = make_test_app().await;

    let (status, created) = post_course(&app, "Intro to Rust").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Intro to Rust");
    assert_eq!(created["section_number"], "A");
    assert_eq!(created["sections"], json!(["A", "B"]));
    let id = created["id"].as_str().unwrap().to_string();

    let req = Request::builder()
        .uri(format!("/courses/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let req = Request::builder().uri("/courses").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let list: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);

    let mut updated_payload = course_payload("Intro to Rust (Revised)");
    updated_payload["total_students"] = json!(45);
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/courses/{id}"))
        .header("content-type", "application/json")
        .body(Body::from(updated_payload.to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let updated: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(updated["name"], "Intro to Rust (Revised)");
    assert_eq!(updated["total_students"], 45);

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/courses/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let req = Request::builder()
        .uri(format!("/courses/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_name_is_rejected_with_conflict() {
    let (app, _state) = make_test_app().await;
    let (status, _) = post_course(&app, "Duplicate 101").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_course(&app, "  duplicate 101  ").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn blank_name_is_rejected_with_bad_request() {
    let (app, _state) = make_test_app().await;
    let (status, body) = post_course(&app, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn get_unknown_course_is_not_found() {
    let (app, _state) = make_test_app().await;
    let req = Request::builder()
        .uri(format!("/courses/{}", uuid::Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn attendance_csv_export_round_trips_recorded_rows() {
    let (app, state) = make_test_app().await;
    let (_, created) = post_course(&app, "CSV Export 101").await;
    let course_id = created["id"].as_str().unwrap().to_string();

    let uuid = uuid::Uuid::parse_str(&course_id).unwrap();
    db::store::record_attendance(
        state.db(),
        uuid,
        "Grace Hopper",
        "S001",
        chrono::Utc::now(),
        "10.0.0.9",
    )
    .await
    .unwrap();

    let req = Request::builder()
        .uri(format!("/courses/{course_id}/attendance.csv"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/csv; charset=utf-8"
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "timestamp,student_name,student_id,course_name,course_id"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("Grace Hopper"));
    assert!(row.contains("S001"));
    assert!(row.contains("CSV Export 101"));
}
