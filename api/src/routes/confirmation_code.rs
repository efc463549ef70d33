//! `/confirmation-code/{course_id}` — reads (and lazily refreshes) the
//! current confirmation code for a course.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use engine::CodeEngineError;
use tracing::error;
use uuid::Uuid;

use crate::dto::ConfirmationCodeResponse;
use crate::error::ApiError;
use crate::state::ServerState;

pub fn confirmation_code_routes() -> Router<ServerState> {
    Router::new().route("/{course_id}", get(get_confirmation_code))
}

async fn get_confirmation_code(
    State(state): State<ServerState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ConfirmationCodeResponse>, ApiError> {
    let now = util::clock::now();
    let current = state
        .code_engine()
        .current(state.db(), course_id, now)
        .await
        .map_err(|e| match e {
            CodeEngineError::CourseMissing => ApiError::not_found("course not found"),
            CodeEngineError::Storage(e) => {
                error!(error = %e, "failed to mint confirmation code");
                ApiError::internal("storage unavailable")
            }
        })?;

    Ok(Json(ConfirmationCodeResponse {
        expires_in_seconds: current.seconds_remaining(now),
        code: current.code,
        expires_at: current.expires_at,
    }))
}
