use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m20260101_000001_create_courses::Migration),
            Box::new(migrations::m20260101_000002_create_attendance_records::Migration),
            Box::new(migrations::m20260101_000003_create_device_submissions::Migration),
            Box::new(migrations::m20260101_000004_create_preferences::Migration),
        ]
    }
}
