//! Presentation Layer
//!
//! HTTP handlers, DTOs, multipart staging, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod multipart;
pub mod router;

pub use handlers::AccountAppState;
pub use middleware::{CurrentUser, Viewer, optional_auth, require_auth};
pub use router::{account_router, account_router_generic};
