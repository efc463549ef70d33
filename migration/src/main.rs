use std::{env, fs, path::Path};
use util::config;

mod runner;

/// Strips the `sqlite://` scheme and any `?mode=...` query off `url`,
/// leaving the bare filesystem path sea-orm's sqlite driver opens.
fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    Some(rest.split('?').next().unwrap_or(rest))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let url = config::database_url();
    let db_path = sqlite_file_path(&url).map(str::to_string);
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            if let Some(path) = db_path.as_deref() {
                remove_db_file(path);
            }
        }
        Some("fresh") => {
            if let Some(path) = db_path.as_deref() {
                remove_db_file(path);
                create_db_dir(path);
            }
            runner::run_all_migrations(&url).await;
        }
        _ => {
            if let Some(path) = db_path.as_deref() {
                create_db_dir(path);
            }
            runner::run_all_migrations(&url).await;
        }
    }
}

fn remove_db_file(path: &str) {
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path).expect("Failed to delete DB file");
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn create_db_dir(path: &str) {
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent).expect("Failed to create DB directory");
    }
}
