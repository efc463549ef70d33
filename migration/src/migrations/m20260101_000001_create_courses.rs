use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260101_000001_create_courses"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("courses"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Alias::new("name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("primary_section")).string().not_null())
                    .col(ColumnDef::new(Alias::new("sections")).text().not_null())
                    .col(ColumnDef::new(Alias::new("professor_name")).string().null())
                    .col(ColumnDef::new(Alias::new("office_hours")).string().null())
                    .col(ColumnDef::new(Alias::new("news")).text().null())
                    .col(ColumnDef::new(Alias::new("total_students")).integer().not_null().default(0))
                    .col(ColumnDef::new(Alias::new("logo_path")).string().null())
                    .col(ColumnDef::new(Alias::new("current_code")).string().null())
                    .col(ColumnDef::new(Alias::new("current_code_expires_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await?;

        // sea-query's Index builder can't express a functional index, so the
        // case-insensitive uniqueness on the trimmed name goes in as raw SQL.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX idx_courses_name_ci ON courses (lower(trim(name)))",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("courses")).to_owned())
            .await
    }
}
