//! Authenticate Use Case
//!
//! Resolves an access token to the user it was issued for.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AccountConfig;
use crate::application::token_issuer::AccessClaims;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AccountError, AccountResult};

pub struct AuthenticateUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AccountConfig>,
}

impl<U> AuthenticateUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AccountConfig>) -> Self {
        Self { user_repo, config }
    }

    /// `Unauthorized` without a token, `AccessTokenInvalid` when the token
    /// does not verify or its user no longer exists.
    pub async fn execute(&self, token: Option<&str>) -> AccountResult<User> {
        let token = token.ok_or(AccountError::Unauthorized)?;

        let claims: AccessClaims = self
            .config
            .access_keys()
            .verify(token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                AccountError::AccessTokenInvalid
            })?;

        let user_id: UserId = claims
            .sub
            .parse()
            .map_err(|_| AccountError::AccessTokenInvalid)?;

        self.user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AccountError::AccessTokenInvalid)
    }
}
