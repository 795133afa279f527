//! Watch History Use Case
//!
//! Joins the stored history to videos and their owners.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::{UserId, VideoId};

use crate::domain::entity::video::{OwnerSnapshot, Video, WatchHistoryItem};
use crate::domain::repository::{UserRepository, VideoRepository};
use crate::error::AccountResult;

pub struct WatchHistoryUseCase<U, V>
where
    U: UserRepository,
    V: VideoRepository,
{
    user_repo: Arc<U>,
    video_repo: Arc<V>,
}

impl<U, V> WatchHistoryUseCase<U, V>
where
    U: UserRepository,
    V: VideoRepository,
{
    pub fn new(user_repo: Arc<U>, video_repo: Arc<V>) -> Self {
        Self {
            user_repo,
            video_repo,
        }
    }

    /// Entries follow the stored history order. Videos that no longer exist
    /// are skipped; a missing owner leaves `owner` empty.
    pub async fn execute(&self, user_id: &UserId) -> AccountResult<Vec<WatchHistoryItem>> {
        let history = self.user_repo.watch_history(user_id).await?;
        if history.is_empty() {
            return Ok(Vec::new());
        }

        let videos: HashMap<VideoId, Video> = self
            .video_repo
            .find_videos(&history)
            .await?
            .into_iter()
            .map(|video| (video.video_id, video))
            .collect();

        let mut owner_ids: Vec<UserId> = videos.values().map(|v| v.owner_id).collect();
        owner_ids.sort_by_key(|id| *id.as_uuid());
        owner_ids.dedup();

        let owners: HashMap<UserId, OwnerSnapshot> = self
            .user_repo
            .find_by_ids(&owner_ids)
            .await?
            .iter()
            .map(|user| (user.user_id, OwnerSnapshot::from(user)))
            .collect();

        let items = history
            .iter()
            .filter_map(|video_id| videos.get(video_id))
            .map(|video| WatchHistoryItem {
                owner: owners.get(&video.owner_id).cloned(),
                video: video.clone(),
            })
            .collect();

        Ok(items)
    }
}
