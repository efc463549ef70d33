mod common;

use common::{connect_ws, make_test_app, spawn_server};
use db::models::course::{CourseFields, Model as Course};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn subscriber_receives_present_count_after_submission() {
    let (app, state) = make_test_app().await;
    let course = Course::create(
        state.db(),
        CourseFields {
            name: "Websocket 101".to_string(),
            primary_section: "A".to_string(),
            sections: vec!["A".to_string()],
            professor_name: None,
            office_hours: None,
            news: None,
            total_students: 0,
            logo_path: None,
        },
    )
    .await
    .unwrap();

    let addr = spawn_server(app).await;
    let (mut socket, _resp) = connect_ws(addr, &course.id.to_string()).await.unwrap();

    db::store::record_attendance(
        state.db(),
        course.id,
        "Ada Lovelace",
        "S001",
        chrono::Utc::now(),
        "10.0.0.5",
    )
    .await
    .unwrap();
    state.presence().broadcast(state.db(), course.id).await;

    let msg = tokio::time::timeout(std::time::Duration::from_secs(2), socket.next())
        .await
        .expect("timed out waiting for update")
        .expect("stream ended")
        .unwrap();
    let text = msg.into_text().unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["type"], "attendance_update");
    assert_eq!(json["presentCount"], 1);
}

#[tokio::test]
async fn ping_is_answered_with_pong() {
    let (app, state) = make_test_app().await;
    let course = Course::create(
        state.db(),
        CourseFields {
            name: "Websocket Ping 101".to_string(),
            primary_section: "A".to_string(),
            sections: vec!["A".to_string()],
            professor_name: None,
            office_hours: None,
            news: None,
            total_students: 0,
            logo_path: None,
        },
    )
    .await
    .unwrap();

    let addr = spawn_server(app).await;
    let (mut socket, _resp) = connect_ws(addr, &course.id.to_string()).await.unwrap();

    socket
        .send(Message::Text(r#"{"type":"ping"}"#.into()))
        .await
        .unwrap();

    let msg = tokio::time::timeout(std::time::Duration::from_secs(2), socket.next())
        .await
        .expect("timed out waiting for pong")
        .expect("stream ended")
        .unwrap();
    assert_eq!(msg.into_text().unwrap(), r#"{"type":"pong"}"#);
}

#[tokio::test]
async fn unknown_course_closes_with_1008() {
    let (app, _state) = make_test_app().await;
    let addr = spawn_server(app).await;
    let (mut socket, _resp) = connect_ws(addr, &uuid::Uuid::new_v4().to_string()).await.unwrap();

    let msg = tokio::time::timeout(std::time::Duration::from_secs(2), socket.next())
        .await
        .expect("timed out waiting for close")
        .expect("stream ended")
        .unwrap();

    match msg {
        Message::Close(Some(frame)) => assert_eq!(u16::from(frame.code), 1008),
        other => panic!("expected a close frame, got {other:?}"),
    }
}
