//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    channel::ChannelProfile,
    credentials::Credentials,
    user::User,
    video::{OwnerSnapshot, Video, WatchHistoryItem},
};
pub use repository::{
    AccountRepository, CredentialRepository, SubscriptionRepository, UserRepository,
    VideoRepository,
};
