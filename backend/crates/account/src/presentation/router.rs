//! Account Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
};
use platform::media::{CloudinaryUploader, MediaUploader};
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::domain::repository::AccountRepository;
use crate::infra::postgres::PgAccountRepository;
use crate::presentation::handlers::{self, AccountAppState};
use crate::presentation::middleware::{optional_auth, require_auth};

/// Create the Account router with PostgreSQL and Cloudinary
pub fn account_router(
    repo: PgAccountRepository,
    uploader: CloudinaryUploader,
    config: AccountConfig,
) -> Router {
    account_router_generic(repo, uploader, config)
}

/// Create a generic Account router for any repository and uploader
pub fn account_router_generic<R, M>(repo: R, uploader: M, config: AccountConfig) -> Router
where
    R: AccountRepository,
    M: MediaUploader + Sync + 'static,
{
    let body_limit = config.max_upload_bytes;
    let state = AccountAppState {
        repo: Arc::new(repo),
        uploader: Arc::new(uploader),
        config: Arc::new(config),
    };

    let protected = Router::new()
        .route("/logout", post(handlers::logout::<R, M>))
        .route("/change-password", post(handlers::change_password::<R, M>))
        .route("/current-user", get(handlers::current_user))
        .route("/update-account", patch(handlers::update_account::<R, M>))
        .route("/update-avatar", patch(handlers::update_avatar::<R, M>))
        .route("/update-cover", patch(handlers::update_cover_image::<R, M>))
        .route("/history", get(handlers::watch_history::<R, M>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R, M>,
        ));

    let channel = Router::new()
        .route("/c/{username}", get(handlers::channel_profile::<R, M>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth::<R, M>,
        ));

    Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .route("/refresh-token", post(handlers::refresh_token::<R, M>))
        .merge(protected)
        .merge(channel)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
