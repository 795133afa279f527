//! Account Middleware
//!
//! Resolves the access token (cookie first, then `Authorization: Bearer`)
//! and hands the result to handlers through request extensions.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use platform::cookie::{extract_bearer_token, extract_cookie};
use platform::media::MediaUploader;

use crate::application::AuthenticateUseCase;
use crate::domain::entity::user::User;
use crate::domain::repository::AccountRepository;
use crate::error::AccountError;
use crate::presentation::handlers::AccountAppState;

/// Authenticated caller, inserted by [`require_auth`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Optional caller, inserted by [`optional_auth`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewer {
    pub user_id: Option<UserId>,
}

fn access_token(req: &Request, cookie_name: &str) -> Option<String> {
    let headers = req.headers();
    extract_cookie(headers, cookie_name).or_else(|| extract_bearer_token(headers))
}

/// Middleware that requires a valid access token
pub async fn require_auth<R, M>(
    State(state): State<AccountAppState<R, M>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AccountError>
where
    R: AccountRepository,
    M: MediaUploader + Send + Sync + 'static,
{
    let token = access_token(&req, &state.config.access_cookie_name);

    let use_case = AuthenticateUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case.execute(token.as_deref()).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Middleware that identifies the caller when possible but never rejects
pub async fn optional_auth<R, M>(
    State(state): State<AccountAppState<R, M>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: AccountRepository,
    M: MediaUploader + Send + Sync + 'static,
{
    let user_id = match access_token(&req, &state.config.access_cookie_name) {
        Some(token) => {
            let use_case = AuthenticateUseCase::new(state.repo.clone(), state.config.clone());
            use_case
                .execute(Some(&token))
                .await
                .ok()
                .map(|user| user.user_id)
        }
        None => None,
    };

    req.extensions_mut().insert(Viewer { user_id });

    next.run(req).await
}
