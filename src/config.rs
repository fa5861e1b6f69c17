//! Store configuration: where the database lives and what to seed it with.

use crate::app::{initialize, SeedData};
use crate::error::AppError;
use crate::infra::{init_db, DbPool};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "com.school.signup";
const DB_FILE: &str = "db.sqlite3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] AppError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            seed_path: None,
        }
    }
}

impl StoreConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }
}

fn default_db_path() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join(APP_DIR).join(DB_FILE)
}

/// Read seed data in the `{name: {description, schedule, max_participants, participants}}` shape.
pub fn load_seed_file(path: &Path) -> Result<SeedData, ConfigError> {
    read_json(path)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Open the configured database and run initialization with the seed file, if any.
pub fn bootstrap(config: &StoreConfig) -> Result<DbPool, ConfigError> {
    log::info!("DB path: {:?}", config.db_path);

    let seed = config
        .seed_path
        .as_deref()
        .map(load_seed_file)
        .transpose()?;

    let pool = init_db(&config.db_path).map_err(|e| {
        log::error!("DB init failed: {}", e);
        e
    })?;
    initialize(&pool, seed.as_ref())?;
    Ok(pool)
}
