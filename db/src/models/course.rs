//! The Course entity and its Store operations.
//!
//! The current confirmation code lives directly on the course row
//! (`current_code` / `current_code_expires_at`) rather than in a
//! separate table: the Course row is always the authoritative copy, so a
//! second table would only add a join with no behavioral difference.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    pub primary_section: String,
    /// JSON-encoded sorted array of section names, always including `primary_section`.
    pub sections: String,

    pub professor_name: Option<String>,
    pub office_hours: Option<String>,
    pub news: Option<String>,
    pub total_students: i32,
    pub logo_path: Option<String>,

    pub current_code: Option<String>,
    pub current_code_expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecord,
    #[sea_orm(has_many = "super::device_submission::Entity")]
    DeviceSubmission,
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecord.def()
    }
}

impl Related<super::device_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeviceSubmission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted on create/update; validated by the caller before use.
#[derive(Clone, Debug, Deserialize)]
pub struct CourseFields {
    pub name: String,
    pub primary_section: String,
    pub sections: Vec<String>,
    pub professor_name: Option<String>,
    pub office_hours: Option<String>,
    pub news: Option<String>,
    pub total_students: i32,
    pub logo_path: Option<String>,
}

#[derive(Debug, Error)]
pub enum CourseError {
    #[error("course name must not be empty")]
    InvalidName,
    #[error("sections must include the primary section and must not be empty")]
    InvalidSections,
    #[error("total_students must not be negative")]
    InvalidTotalStudents,
    #[error("a course with this name already exists")]
    DuplicateName,
    #[error("course not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] DbErr),
}

fn normalize_sections(primary: &str, sections: &[String]) -> Result<Vec<String>, CourseError> {
    if sections.is_empty() {
        return Err(CourseError::InvalidSections);
    }
    let mut normalized: Vec<String> = sections
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !normalized.iter().any(|s| s == primary) {
        return Err(CourseError::InvalidSections);
    }
    normalized.sort();
    normalized.dedup();
    if normalized.is_empty() {
        return Err(CourseError::InvalidSections);
    }
    Ok(normalized)
}

fn validate_fields(fields: &CourseFields) -> Result<(String, Vec<String>), CourseError> {
    let name = fields.name.trim().to_string();
    if name.is_empty() {
        return Err(CourseError::InvalidName);
    }
    let primary = fields.primary_section.trim().to_string();
    if primary.is_empty() {
        return Err(CourseError::InvalidSections);
    }
    if fields.total_students < 0 {
        return Err(CourseError::InvalidTotalStudents);
    }
    let sections = normalize_sections(&primary, &fields.sections)?;
    Ok((name, sections))
}

fn is_unique_violation(err: &DbErr) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("unique constraint") || msg.contains("unique violation")
}

impl Model {
    pub async fn create(db: &DbConn, fields: CourseFields) -> Result<Model, CourseError> {
        let (name, sections) = validate_fields(&fields)?;
        let now = util::clock::now();
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            primary_section: Set(fields.primary_section.trim().to_string()),
            sections: Set(serde_json::to_string(&sections).unwrap_or_default()),
            professor_name: Set(fields.professor_name),
            office_hours: Set(fields.office_hours),
            news: Set(fields.news),
            total_students: Set(fields.total_students),
            logo_path: Set(fields.logo_path),
            current_code: Set(None),
            current_code_expires_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active.insert(db).await.map_err(|e| {
            if is_unique_violation(&e) {
                CourseError::DuplicateName
            } else {
                CourseError::Storage(e)
            }
        })
    }

    pub async fn get(db: &DbConn, id: Uuid) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn list(db: &DbConn) -> Result<Vec<Model>, DbErr> {
        Entity::find().order_by_asc(Column::Name).all(db).await
    }

    pub async fn update(
        db: &DbConn,
        id: Uuid,
        fields: CourseFields,
    ) -> Result<Model, CourseError> {
        let existing = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(CourseError::NotFound)?;

        let (name, sections) = validate_fields(&fields)?;
        let mut active: ActiveModel = existing.into();
        active.name = Set(name);
        active.primary_section = Set(fields.primary_section.trim().to_string());
        active.sections = Set(serde_json::to_string(&sections).unwrap_or_default());
        active.professor_name = Set(fields.professor_name);
        active.office_hours = Set(fields.office_hours);
        active.news = Set(fields.news);
        active.total_students = Set(fields.total_students);
        active.logo_path = Set(fields.logo_path);
        active.updated_at = Set(util::clock::now());

        active.update(db).await.map_err(|e| {
            if is_unique_violation(&e) {
                CourseError::DuplicateName
            } else {
                CourseError::Storage(e)
            }
        })
    }

    /// Deletes the course. Attendance records and device submissions cascade
    /// via the foreign key; the caller is responsible for clearing any
    /// `current_course_id` preference pointing at it.
    pub async fn delete(db: &DbConn, id: Uuid) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    pub fn sections_vec(&self) -> Vec<String> {
        serde_json::from_str(&self.sections).unwrap_or_default()
    }

    /// Persists a freshly minted confirmation code on this course.
    pub async fn set_current_code(
        db: &DbConn,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let active = ActiveModel {
            current_code: Set(Some(code.to_string())),
            current_code_expires_at: Set(Some(expires_at)),
            updated_at: Set(util::clock::now()),
            ..Default::default()
        };
        Entity::update_many()
            .set(active)
            .filter(Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(())
    }
}
