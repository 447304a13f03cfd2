/// Flock Auth
///
/// Password hashing (argon2id) and the identity capability the web session
/// layer needs from an account.

pub mod identity;
pub mod password;

pub use identity::SessionIdentity;
pub use password::{PasswordError, hash_password, verify_password};
