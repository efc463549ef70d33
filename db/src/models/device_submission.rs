//! The DeviceSubmission entity: one row per accepted submission's
//! originating peer address, unique on (course_id, ip_address,
//! submission_date) — U2.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use super::attendance_record::calendar_date;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "device_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub course_id: Uuid,
    pub ip_address: String,
    pub timestamp: DateTime<Utc>,
    pub submission_date: String,
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

impl Model {
    pub fn new_active(course_id: Uuid, ip_address: &str, timestamp: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            course_id: Set(course_id),
            ip_address: Set(ip_address.to_string()),
            timestamp: Set(timestamp),
            submission_date: Set(calendar_date(timestamp)),
            ..Default::default()
        }
    }
}
