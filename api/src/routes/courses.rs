//! `/courses` route group: CRUD over the course roster plus the CSV
//! attendance export.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use db::models::course::{self, CourseError};
use tracing::error;
use uuid::Uuid;

use crate::dto::{CourseRequest, CourseResponse};
use crate::error::ApiError;
use crate::state::ServerState;

pub fn courses_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{id}/attendance.csv", get(export_attendance_csv))
}

fn map_course_error(err: CourseError) -> ApiError {
    match err {
        CourseError::InvalidName | CourseError::InvalidSections | CourseError::InvalidTotalStudents => {
            ApiError::bad_request(err.to_string())
        }
        CourseError::DuplicateName => ApiError::conflict(err.to_string()),
        CourseError::NotFound => ApiError::not_found(err.to_string()),
        CourseError::Storage(e) => {
            error!(error = %e, "course storage failure");
            ApiError::internal("storage unavailable")
        }
    }
}

async fn list_courses(State(state): State<ServerState>) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = course::Model::list(state.db()).await.map_err(|e| {
        error!(error = %e, "failed to list courses");
        ApiError::internal("storage unavailable")
    })?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

async fn create_course(
    State(state): State<ServerState>,
    Json(req): Json<CourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let created = course::Model::create(state.db(), req.into())
        .await
        .map_err(map_course_error)?;
    Ok((StatusCode::CREATED, Json(CourseResponse::from(created))))
}

async fn get_course(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseResponse>, ApiError> {
    let found = course::Model::get(state.db(), id).await.map_err(|e| {
        error!(error = %e, "failed to load course");
        ApiError::internal("storage unavailable")
    })?;
    let course = found.ok_or_else(|| ApiError::not_found("course not found"))?;
    Ok(Json(CourseResponse::from(course)))
}

async fn update_course(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    let updated = course::Model::update(state.db(), id, req.into())
        .await
        .map_err(map_course_error)?;
    Ok(Json(CourseResponse::from(updated)))
}

async fn delete_course(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = db::store::delete_course(state.db(), id).await.map_err(|e| {
        error!(error = %e, "failed to delete course");
        ApiError::internal("storage unavailable")
    })?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("course not found"))
    }
}

fn escape_csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

async fn export_attendance_csv(
    State(state): State<ServerState>,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let course = course::Model::get(state.db(), course_id)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to load course for csv export");
            ApiError::internal("storage unavailable")
        })?
        .ok_or_else(|| ApiError::not_found("course not found"))?;

    let records = db::models::attendance_record::Model::list_for_course(state.db(), course_id)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to list attendance records for csv export");
            ApiError::internal("storage unavailable")
        })?;

    let mut csv = String::from("timestamp,student_name,student_id,course_name,course_id\n");
    for record in records {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            escape_csv_field(&record.timestamp.to_rfc3339()),
            escape_csv_field(&record.student_name),
            escape_csv_field(&record.student_id),
            escape_csv_field(&course.name),
            course.id,
        ));
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{course_id}-attendance.csv\""))
            .unwrap_or(HeaderValue::from_static("attachment")),
    );

    Ok((StatusCode::OK, headers, csv))
}
