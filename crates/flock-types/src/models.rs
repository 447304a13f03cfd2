use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account as seen by the web layer. The password hash never leaves the DB crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub joined_at: DateTime<Utc>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub timestamp: DateTime<Utc>,
    pub content: String,
}

/// Directed follow edge: `follower` receives `followed`'s posts in their stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: i64,
    pub follower: i64,
    pub followed: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn user_json_has_no_password_field() {
        let user = User {
            id: 7,
            username: "alice".into(),
            email: "alice@example.com".into(),
            joined_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            is_admin: false,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["is_admin"], false);
        assert!(json.get("password").is_none());
    }

    #[test]
    fn follow_parses_from_json() {
        let follow: Follow =
            serde_json::from_str(r#"{"id":1,"follower":2,"followed":3}"#).unwrap();
        assert_eq!(follow.follower, 2);
        assert_eq!(follow.followed, 3);
    }
}
