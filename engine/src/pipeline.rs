//! The submission pipeline (C4): validates and records a student's
//! attendance submission. The check ordering below is exact and load
//! bearing — tests depend on it.

use chrono::{DateTime, Utc};
use db::models::course;
use db::store::{self, RecordOutcome};
use sea_orm::DatabaseConnection;
use tracing::{error, warn};
use uuid::Uuid;

use crate::code_engine::{CodeEngine, Validation};
use crate::presence::PresenceBus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { student_name: String },
    Rejected(RejectKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectKind {
    CourseMissing,
    FieldMissing,
    InvalidCode,
    ExpiredCode,
    DuplicateStudent,
    DuplicateDevice,
    StorageUnavailable,
}

pub struct SubmissionPipeline<'a> {
    pub db: &'a DatabaseConnection,
    pub code_engine: &'a CodeEngine,
    pub presence: &'a PresenceBus,
}

impl<'a> SubmissionPipeline<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        code_engine: &'a CodeEngine,
        presence: &'a PresenceBus,
    ) -> Self {
        Self {
            db,
            code_engine,
            presence,
        }
    }

    pub async fn submit(
        &self,
        course_id: Uuid,
        student_name: &str,
        student_id: &str,
        submitted_code: &str,
        peer_addr: &str,
        now: DateTime<Utc>,
    ) -> SubmitOutcome {
        let student_name = student_name.trim();
        let student_id = student_id.trim();
        let submitted_code = submitted_code.trim();

        if student_name.is_empty() || student_id.is_empty() || submitted_code.is_empty() {
            return SubmitOutcome::Rejected(RejectKind::FieldMissing);
        }

        match course::Model::get(self.db, course_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return SubmitOutcome::Rejected(RejectKind::CourseMissing),
            Err(e) => {
                error!(%course_id, error = %e, "course lookup failed during submission");
                return SubmitOutcome::Rejected(RejectKind::StorageUnavailable);
            }
        }

        match self
            .code_engine
            .validate(self.db, course_id, submitted_code, now)
            .await
        {
            Ok(Validation::Valid) => {}
            Ok(Validation::Expired) => return SubmitOutcome::Rejected(RejectKind::ExpiredCode),
            Ok(Validation::Mismatch) => return SubmitOutcome::Rejected(RejectKind::InvalidCode),
            Ok(Validation::CourseMissing) => {
                return SubmitOutcome::Rejected(RejectKind::CourseMissing);
            }
            Err(e) => {
                error!(%course_id, error = %e, "code validation failed during submission");
                return SubmitOutcome::Rejected(RejectKind::StorageUnavailable);
            }
        }

        let outcome =
            match store::record_attendance(self.db, course_id, student_name, student_id, now, peer_addr)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(%course_id, error = %e, "record_attendance failed");
                    return SubmitOutcome::Rejected(RejectKind::StorageUnavailable);
                }
            };

        match outcome {
            RecordOutcome::DuplicateStudent => {
                warn!(%course_id, student_id, "duplicate student submission rejected");
                SubmitOutcome::Rejected(RejectKind::DuplicateStudent)
            }
            RecordOutcome::DuplicateDevice => {
                warn!(%course_id, peer_addr, "duplicate device submission rejected");
                SubmitOutcome::Rejected(RejectKind::DuplicateDevice)
            }
            RecordOutcome::CourseMissing => SubmitOutcome::Rejected(RejectKind::CourseMissing),
            RecordOutcome::Recorded { .. } => {
                self.presence.broadcast(self.db, course_id).await;
                SubmitOutcome::Accepted {
                    student_name: student_name.to_string(),
                }
            }
        }
    }
}
