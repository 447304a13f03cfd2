use crate::password::verify_password;

/// What a login session needs from an account: a stable id to store in the
/// session and a way to check credentials.
pub trait SessionIdentity {
    /// Stable unique identifier, stored in the session cookie.
    fn session_id(&self) -> String;

    /// Stored PHC hash of the account's password.
    fn password_hash(&self) -> &str;

    fn is_authenticated(&self) -> bool {
        true
    }

    fn is_active(&self) -> bool {
        true
    }

    fn is_anonymous(&self) -> bool {
        false
    }

    fn check_password(&self, candidate: &str) -> bool {
        verify_password(candidate, self.password_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;

    struct Account {
        id: u32,
        hash: String,
    }

    impl SessionIdentity for Account {
        fn session_id(&self) -> String {
            self.id.to_string()
        }

        fn password_hash(&self) -> &str {
            &self.hash
        }
    }

    #[test]
    fn provided_methods_describe_a_logged_in_account() {
        let account = Account {
            id: 42,
            hash: hash_password("s3cret").unwrap(),
        };

        assert_eq!(account.session_id(), "42");
        assert!(account.is_authenticated());
        assert!(account.is_active());
        assert!(!account.is_anonymous());
        assert!(account.check_password("s3cret"));
        assert!(!account.check_password("S3cret"));
    }
}
