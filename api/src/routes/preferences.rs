//! `/preferences` — the typed accessor over the generic preference store.
//! Only `current_course_id` is exposed; it must name an existing course.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use db::models::{course, preference};
use tracing::error;
use uuid::Uuid;

use crate::dto::{PreferencesResponse, SetPreferenceRequest};
use crate::error::ApiError;
use crate::state::ServerState;

pub fn preferences_routes() -> Router<ServerState> {
    Router::new().route("/", get(get_preferences).post(set_preference))
}

async fn get_preferences(
    State(state): State<ServerState>,
) -> Result<Json<PreferencesResponse>, ApiError> {
    let value = db::store::get_preference(state.db(), preference::CURRENT_COURSE_ID)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to read current_course_id preference");
            ApiError::internal("storage unavailable")
        })?;

    let current_course_id = value.and_then(|v| Uuid::parse_str(&v).ok());
    Ok(Json(PreferencesResponse { current_course_id }))
}

async fn set_preference(
    State(state): State<ServerState>,
    Json(req): Json<SetPreferenceRequest>,
) -> Result<Json<PreferencesResponse>, ApiError> {
    let found = course::Model::get(state.db(), req.current_course_id)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to look up course for preference update");
            ApiError::internal("storage unavailable")
        })?;
    if found.is_none() {
        return Err(ApiError::not_found("course not found"));
    }

    db::store::set_preference(
        state.db(),
        preference::CURRENT_COURSE_ID,
        &req.current_course_id.to_string(),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "failed to persist current_course_id preference");
        ApiError::internal("storage unavailable")
    })?;

    Ok(Json(PreferencesResponse {
        current_course_id: Some(req.current_course_id),
    }))
}
