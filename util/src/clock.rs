//! Monotonic UTC clock (C2).
//!
//! `now()` wraps `Utc::now()` behind a ratchet so the value it returns
//! never goes backwards within a process run, even if the system clock is
//! stepped backwards underneath it (NTP correction, VM pause/resume, etc).
//! `today()` derives the calendar day by truncating to UTC midnight; the
//! deployment does not get a say in the boundary (the spec fixes it at
//! UTC, not local time).

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};

static LAST_NANOS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Returns the current UTC instant, guaranteed non-decreasing across calls
/// within this process.
pub fn now() -> DateTime<Utc> {
    let observed = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
    let mut last = LAST_NANOS.load(Ordering::Relaxed);
    loop {
        let candidate = observed.max(last);
        match LAST_NANOS.compare_exchange_weak(
            last,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return DateTime::from_timestamp_nanos(candidate),
            Err(actual) => last = actual,
        }
    }
}

/// The UTC calendar date of `instant`.
pub fn today(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}
