//! Login Use Case
//!
//! Authenticates by email or user name and issues a token pair.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::token_issuer::{TokenIssuer, TokenPair};
use crate::domain::entity::user::User;
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{Email, RawPassword, UserName};
use crate::error::{AccountError, AccountResult};

/// Login input
pub struct LoginInput {
    pub email: Option<String>,
    pub user_name: Option<String>,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Login use case
pub struct LoginUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<AccountConfig>,
}

impl<U, C> LoginUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    pub fn new(user_repo: Arc<U>, credential_repo: Arc<C>, config: Arc<AccountConfig>) -> Self {
        Self {
            user_repo,
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AccountResult<LoginOutput> {
        let email = input.email.filter(|v| !v.trim().is_empty());
        let user_name = input.user_name.filter(|v| !v.trim().is_empty());

        if email.is_none() && user_name.is_none() {
            return Err(AccountError::IdentifierRequired);
        }

        // Malformed identifiers cannot match any stored user
        let email = email.and_then(|e| Email::new(e).ok());
        let user_name = user_name.and_then(|u| UserName::new(u).ok());
        if email.is_none() && user_name.is_none() {
            return Err(AccountError::UserNotFound);
        }

        let user = self
            .user_repo
            .find_by_email_or_user_name(email.as_ref(), user_name.as_ref())
            .await?
            .ok_or(AccountError::UserNotFound)?;

        let credentials = self
            .credential_repo
            .find_credentials(&user.user_id)
            .await?
            .ok_or_else(|| AccountError::Internal("Credentials not found".to_string()))?;

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AccountError::InvalidCredentials)?;

        if !credentials
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            return Err(AccountError::InvalidCredentials);
        }

        let issuer = TokenIssuer::new(
            self.user_repo.clone(),
            self.credential_repo.clone(),
            self.config.clone(),
        );
        let tokens = issuer.issue(&user.user_id).await?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginOutput { user, tokens })
    }
}
