use std::path::{Path, PathBuf};

use storage::Storage;

/// `--store` value selecting an in-memory store.
pub const MEMORY_STORE: &str = "memory";
/// `--store` value selecting no local store at all.
pub const DISABLED_STORE: &str = "disabled";

#[derive(Debug)]
pub struct InvalidStoreUrl {
    pub raw: String,
}

impl std::fmt::Display for InvalidStoreUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid --store value: {}", self.raw)
    }
}

impl std::error::Error for InvalidStoreUrl {}

/// Open the local store named by `--store`.
pub async fn open(raw: &str) -> Result<Storage, Box<dyn std::error::Error>> {
    match raw.trim() {
        MEMORY_STORE => Ok(Storage::in_memory()),
        DISABLED_STORE => Ok(Storage::disabled()),
        "" => Err(InvalidStoreUrl { raw: raw.to_string() }.into()),
        other => {
            let url = normalize_sqlite_url(other);
            prepare_sqlite_file(&url)?;
            Ok(Storage::sqlite(&url).await?)
        }
    }
}

pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories so sqlx can open it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| InvalidStoreUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(InvalidStoreUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}
