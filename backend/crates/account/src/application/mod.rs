//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod change_password;
pub mod channel_profile;
pub mod config;
pub mod login;
pub mod logout;
pub mod register;
pub mod token_issuer;
pub mod update_media;
pub mod update_profile;
pub mod watch_history;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use channel_profile::ChannelProfileUseCase;
pub use config::AccountConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use register::{RegisterInput, RegisterUseCase};
pub use token_issuer::{AccessClaims, RefreshClaims, TokenIssuer, TokenPair};
pub use update_media::{MediaSlot, UpdateMediaUseCase};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
pub use watch_history::WatchHistoryUseCase;
