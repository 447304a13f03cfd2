use flock_auth::PasswordError;
use rusqlite::ErrorCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("a user cannot follow themselves")]
    SelfFollow,

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error("invalid database configuration: {0}")]
    Config(String),
}

impl DbError {
    /// True when the backend rejected a write because of a UNIQUE index.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::Sqlite(e) if is_unique_violation(e))
    }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}
