pub mod attendance_record;
pub mod course;
pub mod device_submission;
pub mod preference;

pub use attendance_record::Entity as AttendanceRecord;
pub use course::Entity as Course;
pub use device_submission::Entity as DeviceSubmission;
pub use preference::Entity as Preference;
