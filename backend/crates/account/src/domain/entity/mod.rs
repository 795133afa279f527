//! Entity Module

pub mod channel;
pub mod credentials;
pub mod user;
pub mod video;

pub use channel::ChannelProfile;
pub use credentials::Credentials;
pub use user::User;
pub use video::{OwnerSnapshot, Video, WatchHistoryItem};
