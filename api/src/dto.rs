//! Request/response DTOs for the HTTP boundary. Kept separate from the
//! `db` entity models so the wire shape (`section_number`) can diverge
//! from the storage column name (`primary_section`) without entangling
//! the two layers.

use chrono::{DateTime, Utc};
use db::models::course;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: Uuid,
    pub name: String,
    pub section_number: String,
    pub sections: Vec<String>,
    pub professor_name: Option<String>,
    pub office_hours: Option<String>,
    pub news: Option<String>,
    pub total_students: i32,
    pub logo_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<course::Model> for CourseResponse {
    fn from(model: course::Model) -> Self {
        let sections = model.sections_vec();
        CourseResponse {
            id: model.id,
            name: model.name,
            section_number: model.primary_section,
            sections,
            professor_name: model.professor_name,
            office_hours: model.office_hours,
            news: model.news,
            total_students: model.total_students,
            logo_path: model.logo_path,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CourseRequest {
    pub name: String,
    pub section_number: String,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub professor_name: Option<String>,
    #[serde(default)]
    pub office_hours: Option<String>,
    #[serde(default)]
    pub news: Option<String>,
    #[serde(default)]
    pub total_students: i32,
    #[serde(default)]
    pub logo_path: Option<String>,
}

impl From<CourseRequest> for course::CourseFields {
    fn from(req: CourseRequest) -> Self {
        course::CourseFields {
            name: req.name,
            primary_section: req.section_number,
            sections: req.sections,
            professor_name: req.professor_name,
            office_hours: req.office_hours,
            news: req.news,
            total_students: req.total_students,
            logo_path: req.logo_path,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfirmationCodeResponse {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in_seconds: i64,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceRequest {
    pub course_id: Uuid,
    pub student_name: String,
    pub student_id: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub message: String,
    pub student_name: String,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub current_course_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SetPreferenceRequest {
    pub current_course_id: Uuid,
}
