//! Channel Profile
//!
//! Read model of a user seen as a channel.

/// Channel view with subscription counts relative to an optional viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelProfile {
    pub full_name: String,
    pub user_name: String,
    /// Users subscribed to this channel
    pub subscriber_count: i64,
    /// Channels this user subscribes to
    pub subscribed_to_count: i64,
    /// Whether the viewer subscribes to this channel
    pub is_subscribed: bool,
    pub avatar_url: String,
    pub cover_image_url: String,
    pub email: String,
}
