//! Register Use Case
//!
//! Creates an account with an uploaded avatar and optional cover image.

use std::sync::Arc;

use platform::media::{MediaUploader, StagedFile, upload_staged};

use crate::application::config::AccountConfig;
use crate::domain::entity::{credentials::Credentials, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, FullName, RawPassword, UserName, UserPassword};
use crate::error::{AccountError, AccountResult};

/// Register input
#[derive(Debug, Default)]
pub struct RegisterInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<StagedFile>,
    pub cover_image: Option<StagedFile>,
}

/// Register use case
pub struct RegisterUseCase<U, M>
where
    U: UserRepository,
    M: MediaUploader + Sync,
{
    user_repo: Arc<U>,
    uploader: Arc<M>,
    config: Arc<AccountConfig>,
}

impl<U, M> RegisterUseCase<U, M>
where
    U: UserRepository,
    M: MediaUploader + Sync,
{
    pub fn new(user_repo: Arc<U>, uploader: Arc<M>, config: Arc<AccountConfig>) -> Self {
        Self {
            user_repo,
            uploader,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AccountResult<User> {
        let RegisterInput {
            full_name,
            email,
            user_name,
            password,
            avatar,
            cover_image,
        } = input;

        let (Some(full_name), Some(email), Some(user_name), Some(password)) = (
            non_blank(full_name),
            non_blank(email),
            non_blank(user_name),
            non_blank(password),
        ) else {
            return Err(AccountError::MissingFields);
        };

        let full_name = FullName::new(full_name)?;
        let email = Email::new(email)?;
        let user_name =
            UserName::new(user_name).map_err(|e| AccountError::Validation(e.to_string()))?;
        let raw_password = RawPassword::new(password)?;

        if self
            .user_repo
            .exists_by_email_or_user_name(&email, &user_name)
            .await?
        {
            return Err(AccountError::UserExists);
        }

        let avatar = avatar.ok_or(AccountError::AvatarRequired)?;

        let had_cover_image = cover_image.is_some();
        let avatar = upload_staged(self.uploader.as_ref(), Some(avatar))
            .await
            .ok_or(AccountError::UploadFailed("avatar"))?;
        let cover_image = upload_staged(self.uploader.as_ref(), cover_image).await;

        if had_cover_image && cover_image.is_none() {
            tracing::warn!(user_name = %user_name, "Cover image upload failed, continuing without it");
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let user = User::new(
            user_name,
            email,
            full_name,
            avatar.url,
            cover_image.map(|media| media.url),
        );
        let credentials = Credentials::new(user.user_id, password_hash);

        self.user_repo.create(&user, &credentials).await?;

        let created = self
            .user_repo
            .find_by_id(&user.user_id)
            .await?
            .ok_or(AccountError::UserCreationFailed)?;

        tracing::info!(
            user_id = %created.user_id,
            user_name = %created.user_name,
            "User registered"
        );

        Ok(created)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
