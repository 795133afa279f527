//! Channel Profile Use Case
//!
//! Looks up a channel by user name and counts its subscription edges.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::channel::ChannelProfile;
use crate::domain::repository::{SubscriptionRepository, UserRepository};
use crate::domain::value_object::UserName;
use crate::error::{AccountError, AccountResult};

pub struct ChannelProfileUseCase<U, S>
where
    U: UserRepository,
    S: SubscriptionRepository,
{
    user_repo: Arc<U>,
    subscription_repo: Arc<S>,
}

impl<U, S> ChannelProfileUseCase<U, S>
where
    U: UserRepository,
    S: SubscriptionRepository,
{
    pub fn new(user_repo: Arc<U>, subscription_repo: Arc<S>) -> Self {
        Self {
            user_repo,
            subscription_repo,
        }
    }

    /// `viewer` is the caller when authenticated; anonymous viewers are never
    /// subscribed.
    pub async fn execute(
        &self,
        user_name: &str,
        viewer: Option<&UserId>,
    ) -> AccountResult<ChannelProfile> {
        if user_name.trim().is_empty() {
            return Err(AccountError::UsernameRequired);
        }

        // A name that fails validation cannot belong to any channel
        let user_name = UserName::new(user_name).map_err(|_| AccountError::ChannelNotFound)?;

        let channel = self
            .user_repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AccountError::ChannelNotFound)?;

        let subscriber_count = self
            .subscription_repo
            .count_subscribers(&channel.user_id)
            .await?;
        let subscribed_to_count = self
            .subscription_repo
            .count_subscribed_to(&channel.user_id)
            .await?;
        let is_subscribed = match viewer {
            Some(viewer_id) => {
                self.subscription_repo
                    .is_subscribed(viewer_id, &channel.user_id)
                    .await?
            }
            None => false,
        };

        Ok(ChannelProfile {
            full_name: channel.full_name.as_str().to_string(),
            user_name: channel.user_name.into_inner(),
            subscriber_count,
            subscribed_to_count,
            is_subscribed,
            avatar_url: channel.avatar_url,
            cover_image_url: channel.cover_image_url,
            email: channel.email.into_inner(),
        })
    }
}
