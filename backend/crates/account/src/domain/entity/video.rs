//! Video Entity
//!
//! Videos are owned by another part of the platform. This crate only reads
//! them to build watch history.

use chrono::{DateTime, Utc};
use kernel::id::{UserId, VideoId};

use super::user::User;

#[derive(Debug, Clone)]
pub struct Video {
    pub video_id: VideoId,
    pub owner_id: UserId,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    /// Seconds
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner fields shown next to a watched video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerSnapshot {
    pub full_name: String,
    pub user_name: String,
    pub avatar_url: String,
}

impl From<&User> for OwnerSnapshot {
    fn from(user: &User) -> Self {
        Self {
            full_name: user.full_name.as_str().to_string(),
            user_name: user.user_name.as_str().to_string(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// One watch history entry. `owner` is `None` when the owner no longer exists.
#[derive(Debug, Clone)]
pub struct WatchHistoryItem {
    pub video: Video,
    pub owner: Option<OwnerSnapshot>,
}
