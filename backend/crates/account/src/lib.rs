//! Account Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, token issuer, configuration
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, multipart staging, router
//!
//! ## Features
//! - Registration with avatar / cover image uploads
//! - Login by username or email, logout
//! - JWT access tokens and rotating refresh tokens (cookies or headers)
//! - Password change and profile / media updates
//! - Channel profile and watch history views
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Refresh tokens stored only as SHA-256 digests
//! - Rotation is a compare-and-swap on the stored digest, so a refresh token
//!   is accepted at most once

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AccountConfig;
pub use error::{AccountError, AccountResult};
pub use infra::postgres::PgAccountRepository;
pub use presentation::router::{account_router, account_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
