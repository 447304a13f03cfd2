//! Database row types — these map directly to SQLite rows.
//! Distinct from flock-types API models to keep the DB layer independent.

use chrono::{DateTime, Utc};
use flock_auth::SessionIdentity;
use rusqlite::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string, never the plaintext.
    pub password: String,
    pub joined_at: DateTime<Utc>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRow {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipRow {
    pub id: i64,
    pub from_user_id: i64,
    pub to_user_id: i64,
}

// Column lists shared by every query that builds these rows; the order must
// match the `from_row` constructors below.
pub(crate) const USER_COLUMNS: &str = "u.id, u.username, u.email, u.password, u.joined_at, u.is_admin";
pub(crate) const POST_COLUMNS: &str = "p.id, p.timestamp, p.user_id, p.content";

impl UserRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            joined_at: row.get(4)?,
            is_admin: row.get(5)?,
        })
    }
}

impl PostRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            user_id: row.get(2)?,
            content: row.get(3)?,
        })
    }
}

impl SessionIdentity for UserRow {
    fn session_id(&self) -> String {
        self.id.to_string()
    }

    fn password_hash(&self) -> &str {
        &self.password
    }
}

impl From<UserRow> for flock_types::User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            joined_at: row.joined_at,
            is_admin: row.is_admin,
        }
    }
}

impl From<PostRow> for flock_types::Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            timestamp: row.timestamp,
            content: row.content,
        }
    }
}

impl From<RelationshipRow> for flock_types::Follow {
    fn from(row: RelationshipRow) -> Self {
        Self {
            id: row.id,
            follower: row.from_user_id,
            followed: row.to_user_id,
        }
    }
}
