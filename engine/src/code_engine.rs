//! The rotating confirmation-code engine (C3): one active code per course,
//! minted lazily on first read after expiry, refreshes serialized per
//! course so two readers racing an expired code see the same successor.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use db::models::course;
use rand::Rng;
use rand::rngs::OsRng;
use sea_orm::DatabaseConnection;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CodeEngineConfig {
    pub code_length: usize,
    pub alphabet: Vec<char>,
    pub lifetime: Duration,
}

impl CodeEngineConfig {
    /// Upper-case letters and digits, minus `O`, `0`, `I`, `1` — the
    /// documented alphabet choice, picked to avoid transcription errors
    /// when a student reads the code off a projector.
    pub fn default_alphabet() -> Vec<char> {
        "ABCDEFGHJKLMNPQRSTUVWXYZ23456789".chars().collect()
    }

    pub fn new(code_length: usize, lifetime_seconds: u64) -> Self {
        Self {
            code_length,
            alphabet: Self::default_alphabet(),
            lifetime: Duration::seconds(lifetime_seconds as i64),
        }
    }
}

#[derive(Debug, Error)]
pub enum CodeEngineError {
    #[error("course not found")]
    CourseMissing,
    #[error("storage unavailable: {0}")]
    Storage(#[from] sea_orm::DbErr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl CurrentCode {
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Expired,
    Mismatch,
    CourseMissing,
}

/// Per-course mint serialization plus the minting parameters. Cheap to
/// clone (wraps an `Arc` internally via the lock map), so one instance is
/// shared across the whole process via `AppState`.
pub struct CodeEngine {
    config: CodeEngineConfig,
    locks: RwLock<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl CodeEngine {
    pub fn new(config: CodeEngineConfig) -> Self {
        Self {
            config,
            locks: RwLock::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, course_id: Uuid) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().await.get(&course_id) {
            return lock.clone();
        }
        let mut locks = self.locks.write().await;
        locks
            .entry(course_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn mint_code(&self) -> String {
        let mut rng = OsRng;
        (0..self.config.code_length)
            .map(|_| {
                let idx = rng.gen_range(0..self.config.alphabet.len());
                self.config.alphabet[idx]
            })
            .collect()
    }

    /// Returns the currently valid code for `course_id`, minting a fresh
    /// one if none exists or the stored one has expired. Two concurrent
    /// calls against an expired code are guaranteed to observe exactly one
    /// mint (P6): the per-course lock is held across the read-mint-persist
    /// sequence.
    pub async fn current(
        &self,
        db: &DatabaseConnection,
        course_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CurrentCode, CodeEngineError> {
        let lock = self.lock_for(course_id).await;
        let _guard = lock.lock().await;

        let found = course::Model::get(db, course_id).await?;
        let course = found.ok_or(CodeEngineError::CourseMissing)?;

        if let (Some(code), Some(expires_at)) =
            (course.current_code.clone(), course.current_code_expires_at)
        {
            if expires_at > now {
                return Ok(CurrentCode { code, expires_at });
            }
        }

        let code = self.mint_code();
        let expires_at = now + self.config.lifetime;
        course::Model::set_current_code(db, course_id, &code, expires_at).await?;
        Ok(CurrentCode { code, expires_at })
    }

    /// Never mints. `now >= expires_at`, or no code stored at all,
    /// collapses to `Expired` — the distinction between "never minted"
    /// and "minted but stale" is not observable to a submitter.
    pub async fn validate(
        &self,
        db: &DatabaseConnection,
        course_id: Uuid,
        submitted_code: &str,
        now: DateTime<Utc>,
    ) -> Result<Validation, CodeEngineError> {
        let found = course::Model::get(db, course_id).await?;
        let Some(course) = found else {
            return Ok(Validation::CourseMissing);
        };

        let (Some(code), Some(expires_at)) =
            (course.current_code, course.current_code_expires_at)
        else {
            return Ok(Validation::Expired);
        };

        if now >= expires_at {
            return Ok(Validation::Expired);
        }

        if submitted_code == code {
            Ok(Validation::Valid)
        } else {
            Ok(Validation::Mismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::course::CourseFields;
    use db::test_utils::setup_test_db;

    fn config_with_alphabet(alphabet: &str) -> CodeEngineConfig {
        CodeEngineConfig {
            code_length: 6,
            alphabet: alphabet.chars().collect(),
            lifetime: Duration::seconds(300),
        }
    }

    async fn make_course(db: &DatabaseConnection) -> Uuid {
        let fields = CourseFields {
            name: "Intro to Testing".to_string(),
            primary_section: "A".to_string(),
            sections: vec!["A".to_string()],
            professor_name: None,
            office_hours: None,
            news: None,
            total_students: 0,
            logo_path: None,
        };
        course::Model::create(db, fields).await.unwrap().id
    }

    #[tokio::test]
    async fn mints_on_first_read_with_deterministic_alphabet() {
        let db = setup_test_db().await;
        let course_id = make_course(&db).await;
        let engine = CodeEngine::new(config_with_alphabet("A"));
        let now = Utc::now();

        let current = engine.current(&db, course_id, now).await.unwrap();
        assert_eq!(current.code, "AAAAAA");
        assert_eq!(current.expires_at, now + Duration::seconds(300));
    }

    #[tokio::test]
    async fn returns_stored_code_while_fresh() {
        let db = setup_test_db().await;
        let course_id = make_course(&db).await;
        let engine = CodeEngine::new(config_with_alphabet("A"));
        let now = Utc::now();

        let first = engine.current(&db, course_id, now).await.unwrap();
        let second = engine
            .current(&db, course_id, now + Duration::seconds(10))
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn remints_after_expiry() {
        let db = setup_test_db().await;
        let course_id = make_course(&db).await;
        let engine = CodeEngine::new(config_with_alphabet("A"));
        let t0 = Utc::now();

        let first = engine.current(&db, course_id, t0).await.unwrap();
        let after_expiry = t0 + Duration::seconds(301);
        let second = engine.current(&db, course_id, after_expiry).await.unwrap();

        assert_eq!(second.expires_at, after_expiry + Duration::seconds(300));
        assert_ne!(first.expires_at, second.expires_at);
    }

    #[tokio::test]
    async fn validate_rejects_expired_and_mismatched_codes() {
        let db = setup_test_db().await;
        let course_id = make_course(&db).await;
        let engine = CodeEngine::new(config_with_alphabet("A"));
        let t0 = Utc::now();
        let current = engine.current(&db, course_id, t0).await.unwrap();

        assert_eq!(
            engine
                .validate(&db, course_id, &current.code, t0 + Duration::seconds(10))
                .await
                .unwrap(),
            Validation::Valid
        );
        assert_eq!(
            engine
                .validate(&db, course_id, "WRONGCODE", t0 + Duration::seconds(10))
                .await
                .unwrap(),
            Validation::Mismatch
        );
        // Boundary: exactly at expires_at is rejected (inclusive).
        assert_eq!(
            engine
                .validate(&db, course_id, &current.code, current.expires_at)
                .await
                .unwrap(),
            Validation::Expired
        );
    }

    #[tokio::test]
    async fn validate_course_missing() {
        let db = setup_test_db().await;
        let engine = CodeEngine::new(config_with_alphabet("A"));
        let missing = Uuid::new_v4();
        assert_eq!(
            engine
                .validate(&db, missing, "ANYTHING", Utc::now())
                .await
                .unwrap(),
            Validation::CourseMissing
        );
    }

    #[tokio::test]
    async fn concurrent_current_calls_mint_exactly_one_successor() {
        let db = setup_test_db().await;
        let course_id = make_course(&db).await;
        let engine = Arc::new(CodeEngine::new(config_with_alphabet("A")));
        let now = Utc::now();

        let e1 = engine.clone();
        let e2 = engine.clone();
        let db1 = db.clone();
        let db2 = db.clone();
        let (r1, r2) = tokio::join!(
            tokio::spawn(async move { e1.current(&db1, course_id, now).await.unwrap() }),
            tokio::spawn(async move { e2.current(&db2, course_id, now).await.unwrap() }),
        );
        let r1 = r1.unwrap();
        let r2 = r2.unwrap();
        assert_eq!(r1, r2);

        let stored = course::Model::get(&db, course_id).await.unwrap().unwrap();
        assert_eq!(stored.current_code, Some(r1.code));
    }
}
