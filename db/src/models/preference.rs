//! The Preference key/value store. Only `current_course_id` is read by the
//! core; other keys belong to UI collaborators. Each known key gets a
//! typed accessor at the call site rather than exposing a raw blob.

use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "preferences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// The only key the core itself reads or writes.
pub const CURRENT_COURSE_ID: &str = "current_course_id";

impl Model {
    /// An empty string counts as unset and is reported as `None`.
    pub async fn get(db: &DbConn, key: &str) -> Result<Option<String>, DbErr> {
        let row = Entity::find_by_id(key.to_string()).one(db).await?;
        Ok(row.and_then(|r| r.value).filter(|v| !v.is_empty()))
    }

    pub async fn set(db: &DbConn, key: &str, value: &str) -> Result<(), DbErr> {
        let existing = Entity::find_by_id(key.to_string()).one(db).await?;
        let active = match existing {
            Some(row) => {
                let mut active: ActiveModel = row.into();
                active.value = Set(Some(value.to_string()));
                active
            }
            None => ActiveModel {
                key: Set(key.to_string()),
                value: Set(Some(value.to_string())),
            },
        };
        active.save(db).await?;
        Ok(())
    }

    /// Resets `key` to unset if its current value equals `value`. Used by
    /// course deletion to clear a `current_course_id` preference pointing
    /// at the course being removed.
    pub async fn clear_if_matches(db: &DbConn, key: &str, value: &str) -> Result<(), DbErr> {
        if let Some(current) = Self::get(db, key).await? {
            if current == value {
                Self::set(db, key, "").await?;
            }
        }
        Ok(())
    }
}
