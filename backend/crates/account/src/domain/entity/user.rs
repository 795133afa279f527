//! User Entity
//!
//! Account profile without any secret. The password hash and refresh token
//! live in [`Credentials`](super::credentials::Credentials).

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{Email, FullName, UserName};

/// User entity. Every user is also a channel.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, lowercase
    pub user_name: UserName,
    /// Unique
    pub email: Email,
    pub full_name: FullName,
    /// Remote URL, non-empty once registered
    pub avatar_url: String,
    /// Remote URL, empty when the user has none
    pub cover_image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_name: UserName,
        email: Email,
        full_name: FullName,
        avatar_url: String,
        cover_image_url: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            user_name,
            email,
            full_name,
            avatar_url,
            cover_image_url: cover_image_url.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}
