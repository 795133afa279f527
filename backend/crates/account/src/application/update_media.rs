//! Update Media Use Case
//!
//! Replaces the avatar or cover image with a newly uploaded file.

use std::sync::Arc;

use kernel::id::UserId;
use platform::media::{MediaUploader, StagedFile, upload_staged};

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AccountError, AccountResult};

/// Which image of the profile is replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    Avatar,
    CoverImage,
}

impl MediaSlot {
    /// Multipart field name carrying the file
    pub fn field_name(&self) -> &'static str {
        match self {
            MediaSlot::Avatar => "avatar",
            MediaSlot::CoverImage => "coverImage",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            MediaSlot::Avatar => "avatar",
            MediaSlot::CoverImage => "cover image",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            MediaSlot::Avatar => "Avatar",
            MediaSlot::CoverImage => "Cover image",
        }
    }
}

pub struct UpdateMediaUseCase<U, M>
where
    U: UserRepository,
    M: MediaUploader + Sync,
{
    user_repo: Arc<U>,
    uploader: Arc<M>,
}

impl<U, M> UpdateMediaUseCase<U, M>
where
    U: UserRepository,
    M: MediaUploader + Sync,
{
    pub fn new(user_repo: Arc<U>, uploader: Arc<M>) -> Self {
        Self {
            user_repo,
            uploader,
        }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        slot: MediaSlot,
        file: Option<StagedFile>,
    ) -> AccountResult<User> {
        let file = file.ok_or(AccountError::FileRequired(slot.title()))?;

        let media = upload_staged(self.uploader.as_ref(), Some(file))
            .await
            .ok_or(AccountError::UploadFailed(slot.label()))?;

        let user = match slot {
            MediaSlot::Avatar => self.user_repo.set_avatar_url(user_id, &media.url).await?,
            MediaSlot::CoverImage => {
                self.user_repo
                    .set_cover_image_url(user_id, &media.url)
                    .await?
            }
        }
        .ok_or(AccountError::UserNotFound)?;

        tracing::info!(user_id = %user.user_id, slot = ?slot, "Profile image updated");
        Ok(user)
    }
}
