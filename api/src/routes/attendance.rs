//! `POST /attendance` — the student submission endpoint, backed by
//! `engine::SubmissionPipeline`.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::routing::post;
use axum::{Json, Router};
use engine::{RejectKind, SubmissionPipeline, SubmitOutcome};

use crate::dto::{AttendanceRequest, AttendanceResponse};
use crate::error::ApiError;
use crate::state::ServerState;

pub fn attendance_routes() -> Router<ServerState> {
    Router::new().route("/", post(submit_attendance))
}

fn map_reject(kind: RejectKind) -> ApiError {
    match kind {
        RejectKind::CourseMissing => ApiError::not_found("course not found"),
        RejectKind::FieldMissing => ApiError::bad_request("student_name, student_id, and code are required"),
        RejectKind::InvalidCode => ApiError::invalid_code("confirmation code does not match"),
        RejectKind::ExpiredCode => ApiError::expired_code("confirmation code has expired"),
        RejectKind::DuplicateStudent => ApiError::conflict("student already recorded present today"),
        RejectKind::DuplicateDevice => ApiError::conflict("device already used to submit today"),
        RejectKind::StorageUnavailable => ApiError::internal("storage unavailable"),
    }
}

async fn submit_attendance(
    State(state): State<ServerState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(req): Json<AttendanceRequest>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let pipeline = SubmissionPipeline::new(state.db(), state.code_engine(), state.presence());
    let now = util::clock::now();

    let outcome = pipeline
        .submit(
            req.course_id,
            &req.student_name,
            &req.student_id,
            &req.code,
            &peer.ip().to_string(),
            now,
        )
        .await;

    match outcome {
        SubmitOutcome::Accepted { student_name } => Ok(Json(AttendanceResponse {
            message: "attendance recorded".to_string(),
            student_name,
        })),
        SubmitOutcome::Rejected(kind) => Err(map_reject(kind)),
    }
}
