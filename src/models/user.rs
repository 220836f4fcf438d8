//! User model

use serde::{Deserialize, Serialize};

/// A registered account.
///
/// Users are created on signup and never modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Username (unique, non-empty)
    pub username: String,
    /// Password hash (argon2, PHC string format)
    #[serde(skip_serializing)]
    pub hashed_password: String,
}

impl User {
    /// Create a new user.
    ///
    /// The password must already be hashed, see `services::password::hash_password`.
    pub fn new(username: impl Into<String>, hashed_password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            hashed_password: hashed_password.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_never_serialized() {
        let user = User::new("alice", "$argon2id$secret");
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json, serde_json::json!({ "username": "alice" }));
    }
}
