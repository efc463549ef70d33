//! The AttendanceRecord entity: one append-only row per accepted
//! submission, unique on (course_id, student_id, attendance_date) — U1.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub record_id: i64,

    pub course_id: Uuid,
    pub student_name: String,
    pub student_id: String,
    pub timestamp: DateTime<Utc>,
    /// UTC calendar date of `timestamp`, `YYYY-MM-DD`. Stored as a column
    /// (rather than computed at query time) so the unique index can cover
    /// it directly.
    pub attendance_date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// The UTC calendar date of `timestamp`, formatted to match the
/// `attendance_date` / `submission_date` columns.
pub fn calendar_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

impl Model {
    pub fn new_active(
        course_id: Uuid,
        student_name: &str,
        student_id: &str,
        timestamp: DateTime<Utc>,
    ) -> ActiveModel {
        ActiveModel {
            course_id: Set(course_id),
            student_name: Set(student_name.to_string()),
            student_id: Set(student_id.to_string()),
            timestamp: Set(timestamp),
            attendance_date: Set(calendar_date(timestamp)),
            ..Default::default()
        }
    }

    pub async fn count_for_course_on(
        db: &DbConn,
        course_id: Uuid,
        date: &str,
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::AttendanceDate.eq(date))
            .count(db)
            .await
    }

    /// All records for a course, ordered by `timestamp` ascending — the
    /// order the CSV export streams them in.
    pub async fn list_for_course(db: &DbConn, course_id: Uuid) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Timestamp)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn calendar_date_truncates_to_utc_day() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 5, 23, 59, 59).unwrap();
        assert_eq!(calendar_date(ts), "2026-03-05");
    }
}
