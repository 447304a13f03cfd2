use std::path::PathBuf;

use flock_db::{Database, DbConfig, DbError, initialize};

/// Temp database file removed when dropped.
struct TempDb(PathBuf);

impl TempDb {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("flock-test-{}.db", uuid::Uuid::new_v4())))
    }

    fn config(&self) -> DbConfig {
        DbConfig::new(&self.0)
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

#[test]
fn alice_follows_bob() {
    let db = Database::open_in_memory().unwrap();

    let alice = db
        .create_user("alice", "alice@example.com", "alice-pw", false)
        .unwrap();
    let bob = db
        .create_user("bob", "bob@example.com", "bob-pw", false)
        .unwrap();

    let hello = db.create_post(bob.id, "hello").unwrap();
    db.follow(alice.id, bob.id).unwrap();

    assert_eq!(alice.get_stream(&db).unwrap(), vec![hello]);
    assert_eq!(alice.following(&db).unwrap(), vec![bob.clone()]);
    assert_eq!(bob.followers(&db).unwrap(), vec![alice]);
}

#[test]
fn initialize_twice_keeps_data() {
    let tmp = TempDb::new();
    let config = tmp.config();

    initialize(&config).unwrap();

    let user_id = {
        let db = Database::open(&config).unwrap();
        let user = db
            .create_user("erin", "erin@example.com", "pw", false)
            .unwrap();
        db.create_post(user.id, "still here").unwrap();
        user.id
    };

    initialize(&config).unwrap();
    initialize(&config).unwrap();

    let db = Database::open(&config).unwrap();
    let user = db.get_user(user_id).unwrap().unwrap();
    assert_eq!(user.username, "erin");
    assert_eq!(user.get_posts(&db).unwrap().len(), 1);
    assert_eq!(db.list_users().unwrap().len(), 1);
}

#[test]
fn uniqueness_survives_reopen() {
    let tmp = TempDb::new();
    let config = tmp.config();

    {
        let db = Database::open(&config).unwrap();
        db.create_user("frank", "frank@example.com", "pw", false)
            .unwrap();
    }

    let db = Database::open(&config).unwrap();
    let err = db
        .create_user("frank", "frank2@example.com", "pw", false)
        .unwrap_err();
    assert!(matches!(err, DbError::UserAlreadyExists));
    assert_eq!(err.to_string(), "User already exists");
}

#[test]
fn initialize_fails_for_unreachable_path() {
    let config = DbConfig::new(
        std::env::temp_dir()
            .join(format!("flock-missing-{}", uuid::Uuid::new_v4()))
            .join("nested")
            .join("social.db"),
    );

    let err = initialize(&config).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn public_views_drop_the_hash() {
    let db = Database::open_in_memory().unwrap();
    let row = db
        .create_user("gina", "gina@example.com", "pw", true)
        .unwrap();
    let post = db.create_post(row.id, "hi").unwrap();
    let edge_target = db
        .create_user("hank", "hank@example.com", "pw", false)
        .unwrap();
    let edge = db.follow(row.id, edge_target.id).unwrap();

    let user: flock_types::User = row.clone().into();
    assert_eq!(user.id, row.id);
    assert_eq!(user.username, "gina");
    assert!(user.is_admin);

    let post: flock_types::Post = post.into();
    assert_eq!(post.user_id, row.id);

    let follow: flock_types::Follow = edge.into();
    assert_eq!((follow.follower, follow.followed), (row.id, edge_target.id));
}
