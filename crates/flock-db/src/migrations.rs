use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Creates every table and index if missing. Safe to run on every start;
/// existing rows are never touched.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS user (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE COLLATE NOCASE,
            email       TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password    TEXT NOT NULL,
            joined_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f+00:00', 'now')),
            is_admin    INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_user_joined_at
            ON user(joined_at);

        CREATE TABLE IF NOT EXISTS post (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f+00:00', 'now')),
            user_id     INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            content     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_post_user_timestamp
            ON post(user_id, timestamp);

        CREATE TABLE IF NOT EXISTS relationship (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            from_user_id    INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            to_user_id      INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            CHECK (from_user_id <> to_user_id)
        );

        -- One edge per (follower, followed) pair
        CREATE UNIQUE INDEX IF NOT EXISTS idx_relationship_from_to
            ON relationship(from_user_id, to_user_id);

        CREATE INDEX IF NOT EXISTS idx_relationship_to
            ON relationship(to_user_id);
        ",
    )?;

    info!("Database schema ready");
    Ok(())
}
