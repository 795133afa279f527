//! Credentials Entity
//!
//! Secret half of an account, kept apart from [`User`](super::user::User) so
//! that loading a user never loads a password hash.

use kernel::id::UserId;

use crate::domain::value_object::UserPassword;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: UserId,
    pub password_hash: UserPassword,
    /// SHA-256 hex digest of the one live refresh token
    pub refresh_token_hash: Option<String>,
}

impl Credentials {
    pub fn new(user_id: UserId, password_hash: UserPassword) -> Self {
        Self {
            user_id,
            password_hash,
            refresh_token_hash: None,
        }
    }
}
