pub mod config;
pub mod error;
pub mod migrations;
pub mod models;
pub mod queries;

pub use config::DbConfig;
pub use error::{DbError, Result};
pub use models::{PostRow, RelationshipRow, UserRow};

use rusqlite::Connection;
use std::sync::Mutex;
use tracing::info;

/// Shared handle to the social database. Pass it (or an `Arc` of it) to
/// whatever needs to query; there is no global connection.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(config: &DbConfig) -> Result<Self> {
        let conn = connect(config)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", config.path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private database that lives as long as the handle.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&conn)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&mut conn)
    }
}

/// Make sure the schema exists, then close the connection again.
///
/// Meant to run once at process start. Running it against an already
/// initialized database is a no-op.
pub fn initialize(config: &DbConfig) -> Result<()> {
    let conn = connect(config)?;
    migrations::run(&conn)?;
    conn.close().map_err(|(_, e)| DbError::Sqlite(e))?;

    info!("Database initialized at {}", config.path.display());
    Ok(())
}

fn connect(config: &DbConfig) -> Result<Connection> {
    let conn = Connection::open(&config.path)?;
    conn.busy_timeout(config.busy_timeout)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}
