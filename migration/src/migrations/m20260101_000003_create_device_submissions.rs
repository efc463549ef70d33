use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260101_000003_create_device_submissions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("device_submissions"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("course_id")).uuid().not_null())
                    .col(ColumnDef::new(Alias::new("ip_address")).string().not_null())
                    .col(ColumnDef::new(Alias::new("timestamp")).timestamp().not_null())
                    .col(ColumnDef::new(Alias::new("submission_date")).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_device_submissions_course_id")
                            .from(Alias::new("device_submissions"), Alias::new("course_id"))
                            .to(Alias::new("courses"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .col(Alias::new("course_id"))
                            .col(Alias::new("ip_address"))
                            .col(Alias::new("submission_date"))
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("device_submissions")).to_owned())
            .await
    }
}
