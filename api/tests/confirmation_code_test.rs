mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use common::make_test_app;
use db::models::course::CourseFields;
use serde_json::Value;
use tower::ServiceExt;

#[tokio::test]
async fn mints_and_returns_current_code() {
    let (app, state) = make_test_app().await;
    let fields = CourseFields {
        name: "Confirmation 101".to_string(),
        primary_section: "A".to_string(),
        sections: vec!["A".to_string()],
        professor_name: None,
        office_hours: None,
        news: None,
        total_students: 0,
        logo_path: None,
    };
    let course = db::models::course::Model::create(state.db(), fields).await.unwrap();

    let req = Request::builder()
        .uri(format!("/confirmation-code/{}", course.id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "AAAAAA");
    assert_eq!(json["expires_in_seconds"], 300);
}

#[tokio::test]
async fn unknown_course_is_not_found() {
    let (app, _state) = make_test_app().await;
    let req = Request::builder()
        .uri(format!("/confirmation-code/{}", uuid::Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
