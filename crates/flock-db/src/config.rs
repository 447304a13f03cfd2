use std::path::PathBuf;
use std::time::Duration;

use crate::error::{DbError, Result};

const DEFAULT_DB_PATH: &str = "social.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Connection parameters for the SQLite backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub path: PathBuf,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    /// Reads `FLOCK_DB_PATH` and `FLOCK_DB_BUSY_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup("FLOCK_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());

        let busy_timeout_ms = match lookup("FLOCK_DB_BUSY_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                DbError::Config(format!("FLOCK_DB_BUSY_TIMEOUT_MS is not a number: {raw:?}"))
            })?,
            None => DEFAULT_BUSY_TIMEOUT_MS,
        };

        Ok(Self {
            path: PathBuf::from(path),
            busy_timeout: Duration::from_millis(busy_timeout_ms),
        })
    }
}
