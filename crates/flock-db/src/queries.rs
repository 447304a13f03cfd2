use chrono::Utc;
use flock_auth::hash_password;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, warn};

use crate::models::{POST_COLUMNS, PostRow, RelationshipRow, USER_COLUMNS, UserRow};
use crate::{Database, DbError, Result};

impl Database {
    // -- Users --

    /// Register an account. The password is hashed before the row is written
    /// and the insert runs in its own transaction. A taken username or email
    /// becomes `DbError::UserAlreadyExists`; other failures pass through.
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        admin: bool,
    ) -> Result<UserRow> {
        let password_hash = hash_password(password)?;
        let joined_at = Utc::now();

        let inserted = self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO user (username, email, password, joined_at, is_admin) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![username, email, password_hash, joined_at, admin],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(id)
        });

        match inserted {
            Ok(id) => {
                debug!("Created user {} ({})", id, username);
                Ok(UserRow {
                    id,
                    username: username.to_string(),
                    email: email.to_string(),
                    password: password_hash,
                    joined_at,
                    is_admin: admin,
                })
            }
            Err(e) if e.is_unique_violation() => {
                warn!("Rejected account creation for {}: already exists", username);
                Err(DbError::UserAlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    pub fn get_user(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_where(conn, "u.id = ?1", &id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_where(conn, "u.username = ?1", &username))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_where(conn, "u.email = ?1", &email))
    }

    /// Every account, most recently joined first.
    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {USER_COLUMNS} FROM user u ORDER BY u.joined_at DESC, u.id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], UserRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Resolve an id produced by `SessionIdentity::session_id`.
    pub fn load_session_user(&self, session_id: &str) -> Result<Option<UserRow>> {
        match session_id.parse::<i64>() {
            Ok(id) => self.get_user(id),
            Err(_) => {
                debug!("Ignoring malformed session id {:?}", session_id);
                Ok(None)
            }
        }
    }

    /// Remove an account together with its posts and follow edges.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let removed = conn.execute("DELETE FROM user WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    // -- Posts --

    pub fn create_post(&self, user_id: i64, content: &str) -> Result<PostRow> {
        let timestamp = Utc::now();

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO post (timestamp, user_id, content) VALUES (?1, ?2, ?3)",
                params![timestamp, user_id, content],
            )?;
            let id = conn.last_insert_rowid();
            debug!("User {} created post {}", user_id, id);

            Ok(PostRow {
                id,
                timestamp,
                user_id,
                content: content.to_string(),
            })
        })
    }

    pub fn get_post(&self, id: i64) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {POST_COLUMNS} FROM post p WHERE p.id = ?1");
            let row = conn
                .query_row(&sql, [id], PostRow::from_row)
                .optional()?;
            Ok(row)
        })
    }

    pub fn delete_post(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let removed = conn.execute("DELETE FROM post WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    /// Posts owned by `user_id`, newest first.
    pub fn posts_by_user(&self, user_id: i64) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            query_posts(
                conn,
                &format!(
                    "SELECT {POST_COLUMNS} FROM post p
                     WHERE p.user_id = ?1
                     ORDER BY p.timestamp DESC, p.id DESC"
                ),
                user_id,
            )
        })
    }

    /// Home feed: the user's own posts plus those of everyone they follow,
    /// newest first. Each post appears once.
    pub fn stream_for(&self, user_id: i64) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            query_posts(
                conn,
                &format!(
                    "SELECT {POST_COLUMNS} FROM post p
                     WHERE p.user_id IN (
                         SELECT r.to_user_id FROM relationship r WHERE r.from_user_id = ?1
                     )
                     OR p.user_id = ?1
                     ORDER BY p.timestamp DESC, p.id DESC"
                ),
                user_id,
            )
        })
    }

    // -- Relationships --

    /// Record that `from_user_id` follows `to_user_id`.
    ///
    /// Following twice is not translated: the second insert fails with the
    /// backend's unique-index error (see `DbError::is_unique_violation`).
    pub fn follow(&self, from_user_id: i64, to_user_id: i64) -> Result<RelationshipRow> {
        if from_user_id == to_user_id {
            warn!("User {} tried to follow themselves", from_user_id);
            return Err(DbError::SelfFollow);
        }

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO relationship (from_user_id, to_user_id) VALUES (?1, ?2)",
                [from_user_id, to_user_id],
            )?;
            let id = conn.last_insert_rowid();
            debug!("User {} now follows {}", from_user_id, to_user_id);

            Ok(RelationshipRow {
                id,
                from_user_id,
                to_user_id,
            })
        })
    }

    /// Returns whether an edge was removed.
    pub fn unfollow(&self, from_user_id: i64, to_user_id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let removed = conn.execute(
                "DELETE FROM relationship WHERE from_user_id = ?1 AND to_user_id = ?2",
                [from_user_id, to_user_id],
            )?;
            Ok(removed > 0)
        })
    }

    pub fn is_following(&self, from_user_id: i64, to_user_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT id FROM relationship WHERE from_user_id = ?1 AND to_user_id = ?2",
                    [from_user_id, to_user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Users that `user_id` follows.
    pub fn following_of(&self, user_id: i64) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            query_users(
                conn,
                &format!(
                    "SELECT {USER_COLUMNS} FROM user u
                     JOIN relationship r ON r.to_user_id = u.id
                     WHERE r.from_user_id = ?1
                     ORDER BY u.joined_at DESC, u.id DESC"
                ),
                user_id,
            )
        })
    }

    /// Users following `user_id`.
    pub fn followers_of(&self, user_id: i64) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            query_users(
                conn,
                &format!(
                    "SELECT {USER_COLUMNS} FROM user u
                     JOIN relationship r ON r.from_user_id = u.id
                     WHERE r.to_user_id = ?1
                     ORDER BY u.joined_at DESC, u.id DESC"
                ),
                user_id,
            )
        })
    }
}

impl UserRow {
    pub fn get_posts(&self, db: &Database) -> Result<Vec<PostRow>> {
        db.posts_by_user(self.id)
    }

    pub fn get_stream(&self, db: &Database) -> Result<Vec<PostRow>> {
        db.stream_for(self.id)
    }

    /// The users this account follows.
    pub fn following(&self, db: &Database) -> Result<Vec<UserRow>> {
        db.following_of(self.id)
    }

    /// The users following this account.
    pub fn followers(&self, db: &Database) -> Result<Vec<UserRow>> {
        db.followers_of(self.id)
    }
}

fn query_user_where(
    conn: &Connection,
    predicate: &str,
    value: &dyn rusqlite::ToSql,
) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM user u WHERE {predicate}");
    let row = conn
        .query_row(&sql, [value], UserRow::from_row)
        .optional()?;
    Ok(row)
}

fn query_users(conn: &Connection, sql: &str, user_id: i64) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([user_id], UserRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_posts(conn: &Connection, sql: &str, user_id: i64) -> Result<Vec<PostRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([user_id], PostRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
