//! Repository Traits
//!
//! Storage primitives only. Joins and projections are done by the use cases.

use kernel::id::{UserId, VideoId};

use crate::domain::entity::{credentials::Credentials, user::User, video::Video};
use crate::domain::value_object::{Email, FullName, UserName, UserPassword};
use crate::error::AccountResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a user together with its credentials.
    /// Fails with `UserExists` when the username or email is taken.
    async fn create(&self, user: &User, credentials: &Credentials) -> AccountResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AccountResult<Option<User>>;

    /// Find all users among `user_ids`, in no particular order
    async fn find_by_ids(&self, user_ids: &[UserId]) -> AccountResult<Vec<User>>;

    /// Find user by user name
    async fn find_by_user_name(&self, user_name: &UserName) -> AccountResult<Option<User>>;

    /// Find the user matching the email or the user name, whichever is given
    async fn find_by_email_or_user_name(
        &self,
        email: Option<&Email>,
        user_name: Option<&UserName>,
    ) -> AccountResult<Option<User>>;

    /// Check whether the email or the user name is already registered
    async fn exists_by_email_or_user_name(
        &self,
        email: &Email,
        user_name: &UserName,
    ) -> AccountResult<bool>;

    /// Replace full name and email, returning the stored user.
    /// Fails with `EmailTaken` on an email collision.
    async fn update_details(
        &self,
        user_id: &UserId,
        full_name: &FullName,
        email: &Email,
    ) -> AccountResult<Option<User>>;

    /// Replace the avatar URL only, returning the stored user
    async fn set_avatar_url(&self, user_id: &UserId, url: &str) -> AccountResult<Option<User>>;

    /// Replace the cover image URL only, returning the stored user
    async fn set_cover_image_url(
        &self,
        user_id: &UserId,
        url: &str,
    ) -> AccountResult<Option<User>>;

    /// Watched video IDs in stored order
    async fn watch_history(&self, user_id: &UserId) -> AccountResult<Vec<VideoId>>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    async fn find_credentials(&self, user_id: &UserId) -> AccountResult<Option<Credentials>>;

    async fn update_password(
        &self,
        user_id: &UserId,
        password_hash: &UserPassword,
    ) -> AccountResult<()>;

    /// Overwrite the stored refresh token digest. `None` revokes it.
    async fn set_refresh_token(
        &self,
        user_id: &UserId,
        token_hash: Option<&str>,
    ) -> AccountResult<()>;

    /// Replace the stored digest with `new_hash` only if it is still
    /// `expected_hash`. Returns whether the swap happened.
    async fn rotate_refresh_token(
        &self,
        user_id: &UserId,
        expected_hash: &str,
        new_hash: &str,
    ) -> AccountResult<bool>;
}

/// Subscription repository trait
#[trait_variant::make(SubscriptionRepository: Send)]
pub trait LocalSubscriptionRepository {
    /// Number of users subscribed to `channel_id`
    async fn count_subscribers(&self, channel_id: &UserId) -> AccountResult<i64>;

    /// Number of channels `subscriber_id` subscribes to
    async fn count_subscribed_to(&self, subscriber_id: &UserId) -> AccountResult<i64>;

    async fn is_subscribed(
        &self,
        subscriber_id: &UserId,
        channel_id: &UserId,
    ) -> AccountResult<bool>;
}

/// Video repository trait
#[trait_variant::make(VideoRepository: Send)]
pub trait LocalVideoRepository {
    /// Find all videos among `video_ids`, in no particular order
    async fn find_videos(&self, video_ids: &[VideoId]) -> AccountResult<Vec<Video>>;
}

/// Everything the account handlers need from one store
pub trait AccountRepository:
    UserRepository
    + CredentialRepository
    + SubscriptionRepository
    + VideoRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> AccountRepository for T where
    T: UserRepository
        + CredentialRepository
        + SubscriptionRepository
        + VideoRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
