pub mod m20260101_000001_create_courses;
pub mod m20260101_000002_create_attendance_records;
pub mod m20260101_000003_create_device_submissions;
pub mod m20260101_000004_create_preferences;
