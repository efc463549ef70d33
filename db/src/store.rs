//! The attendance store (C1): course CRUD, the submission transaction that
//! enforces U1/U2, present-count reads, and the preference accessor.
//!
//! This module is the only place that understands how U1/U2 rejections
//! surface out of a shared transaction; everything above it (the code
//! engine, the submission pipeline) only sees the typed [`RecordOutcome`].

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, TransactionError, TransactionTrait};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{attendance_record, course, device_submission, preference};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] DbErr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded { record_id: i64 },
    CourseMissing,
    DuplicateStudent,
    DuplicateDevice,
}

fn is_unique_violation(err: &DbErr) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("unique constraint") || msg.contains("unique violation")
}

#[derive(Debug)]
enum TxnError {
    Db(DbErr),
    CourseMissing,
    DuplicateStudent,
    DuplicateDevice,
}

impl From<DbErr> for TxnError {
    fn from(e: DbErr) -> Self {
        TxnError::Db(e)
    }
}

impl std::fmt::Display for TxnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnError::Db(e) => write!(f, "{e}"),
            TxnError::CourseMissing => write!(f, "course missing"),
            TxnError::DuplicateStudent => write!(f, "duplicate student"),
            TxnError::DuplicateDevice => write!(f, "duplicate device"),
        }
    }
}

impl std::error::Error for TxnError {}

/// Inserts an AttendanceRecord and a DeviceSubmission atomically. If either
/// unique index (U1, U2) rejects, the whole transaction rolls back and the
/// matching `RecordOutcome` is returned — no partial state is ever
/// visible.
pub async fn record_attendance(
    db: &DatabaseConnection,
    course_id: Uuid,
    student_name: &str,
    student_id: &str,
    now: DateTime<Utc>,
    peer_addr: &str,
) -> Result<RecordOutcome, StoreError> {
    let student_name = student_name.to_string();
    let student_id = student_id.to_string();
    let peer_addr = peer_addr.to_string();

    let result = db
        .transaction::<_, i64, TxnError>(|txn| {
            Box::pin(async move {
                if course::Entity::find_by_id(course_id)
                    .one(txn)
                    .await?
                    .is_none()
                {
                    return Err(TxnError::CourseMissing);
                }

                let record = attendance_record::Model::new_active(
                    course_id,
                    &student_name,
                    &student_id,
                    now,
                );
                let inserted = record.insert(txn).await.map_err(|e| {
                    if is_unique_violation(&e) {
                        TxnError::DuplicateStudent
                    } else {
                        TxnError::Db(e)
                    }
                })?;

                let device = device_submission::Model::new_active(course_id, &peer_addr, now);
                device.insert(txn).await.map_err(|e| {
                    if is_unique_violation(&e) {
                        TxnError::DuplicateDevice
                    } else {
                        TxnError::Db(e)
                    }
                })?;

                Ok(inserted.record_id)
            })
        })
        .await;

    match result {
        Ok(record_id) => Ok(RecordOutcome::Recorded { record_id }),
        Err(TransactionError::Transaction(TxnError::CourseMissing)) => {
            Ok(RecordOutcome::CourseMissing)
        }
        Err(TransactionError::Transaction(TxnError::DuplicateStudent)) => {
            Ok(RecordOutcome::DuplicateStudent)
        }
        Err(TransactionError::Transaction(TxnError::DuplicateDevice)) => {
            Ok(RecordOutcome::DuplicateDevice)
        }
        Err(TransactionError::Transaction(TxnError::Db(e))) => Err(StoreError::Unavailable(e)),
        Err(TransactionError::Connection(e)) => Err(StoreError::Unavailable(e)),
    }
}

/// `None` means the course does not exist.
pub async fn present_count(
    db: &DatabaseConnection,
    course_id: Uuid,
    date: &str,
) -> Result<Option<u64>, StoreError> {
    if course::Entity::find_by_id(course_id)
        .one(db)
        .await?
        .is_none()
    {
        return Ok(None);
    }
    let count = attendance_record::Model::count_for_course_on(db, course_id, date).await?;
    Ok(Some(count))
}

/// Deletes the course (cascading AttendanceRecord/DeviceSubmission rows via
/// the foreign key) and clears `current_course_id` if it pointed here.
pub async fn delete_course(db: &DatabaseConnection, id: Uuid) -> Result<bool, StoreError> {
    let deleted = course::Model::delete(db, id).await?;
    if deleted {
        preference::Model::clear_if_matches(db, preference::CURRENT_COURSE_ID, &id.to_string())
            .await?;
    }
    Ok(deleted)
}

pub async fn get_preference(db: &DatabaseConnection, key: &str) -> Result<Option<String>, StoreError> {
    Ok(preference::Model::get(db, key).await?)
}

pub async fn set_preference(db: &DatabaseConnection, key: &str, value: &str) -> Result<(), StoreError> {
    preference::Model::set(db, key, value).await?;
    Ok(())
}
