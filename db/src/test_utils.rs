use migration::Migrator;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;

pub async fn setup_test_db() -> DatabaseConnection {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Wipes every user table, for tests that share one in-memory db across cases.
pub async fn clean_db(db: &DatabaseConnection) -> Result<(), DbErr> {
    let rows = db
        .query_all(Statement::from_string(
            db.get_database_backend(),
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%';"
                .to_owned(),
        ))
        .await?;

    let table_names: Vec<String> = rows
        .into_iter()
        .map(|r| r.try_get("", "name").unwrap())
        .collect();

    if table_names.is_empty() {
        return Ok(());
    }

    let quoted_ident: Vec<String> = table_names
        .iter()
        .map(|t| format!("\"{}\"", t.replace('"', "\"\"")))
        .collect();

    let seq_list: String = table_names
        .iter()
        .map(|t| format!("'{}'", t.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(",");

    let mut batch_sql = String::with_capacity(1024);
    batch_sql.push_str("PRAGMA foreign_keys = OFF;\nBEGIN TRANSACTION;\n");
    for q in &quoted_ident {
        batch_sql.push_str(&format!("DELETE FROM {};\n", q));
    }
    batch_sql.push_str(&format!(
        "DELETE FROM sqlite_sequence WHERE name IN ({});\n",
        seq_list
    ));
    batch_sql.push_str("COMMIT;\nPRAGMA foreign_keys = ON;\n");

    let exec_res = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            batch_sql.clone(),
        ))
        .await;

    match exec_res {
        Ok(_) => return Ok(()),
        Err(e) => {
            eprintln!(
                "clean_db fast path failed, falling back to safe path: {:?}",
                e
            );
        }
    }

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = OFF;".to_owned(),
    ))
    .await?;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "BEGIN TRANSACTION;".to_owned(),
    ))
    .await?;

    for q in &quoted_ident {
        let sql = format!("DELETE FROM {};", q);
        db.execute(Statement::from_string(db.get_database_backend(), sql))
            .await?;
    }

    let seq_sql = format!("DELETE FROM sqlite_sequence WHERE name IN ({});", seq_list);
    let _ = db
        .execute(Statement::from_string(db.get_database_backend(), seq_sql))
        .await;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "COMMIT;".to_owned(),
    ))
    .await?;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON;".to_owned(),
    ))
    .await?;

    Ok(())
}
