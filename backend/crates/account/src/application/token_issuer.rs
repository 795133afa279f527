//! Token Issuer
//!
//! Mints access/refresh token pairs and rotates refresh tokens.
//! Only the SHA-256 digest of the live refresh token is stored.

use std::sync::Arc;

use kernel::id::UserId;
use platform::crypto::sha256_hex;
use platform::jwt::TokenError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AccountConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::error::{AccountError, AccountResult};

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub username: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub iat: u64,
    pub exp: u64,
    pub jti: String,
}

/// Refresh token claims, identity only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token issuer
pub struct TokenIssuer<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<AccountConfig>,
}

impl<U, C> TokenIssuer<U, C>
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

    /// Issue a new pair for `user_id`, replacing any stored refresh token
    ///
    /// Every failure is reported as `TokenGeneration`.
    pub async fn issue(&self, user_id: &UserId) -> AccountResult<TokenPair> {
        self.try_issue(user_id).await.map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Token issuance failed");
            AccountError::TokenGeneration
        })
    }

    async fn try_issue(&self, user_id: &UserId) -> AccountResult<TokenPair> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        let pair = self.mint(&user)?;
        self.credential_repo
            .set_refresh_token(&user.user_id, Some(&sha256_hex(pair.refresh_token.as_bytes())))
            .await?;

        Ok(pair)
    }

    /// Exchange a refresh token for a new pair
    ///
    /// The presented token must be the stored one; it is swapped for the new
    /// one atomically, so it can be used at most once. All failures are 401.
    pub async fn refresh(&self, incoming: Option<&str>) -> AccountResult<TokenPair> {
        let incoming = incoming
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AccountError::Unauthorized)?;

        self.try_refresh(incoming).await.map_err(|e| match e {
            AccountError::Unauthorized
            | AccountError::RefreshTokenInvalid
            | AccountError::RefreshTokenReused => e,
            other => {
                tracing::error!(error = %other, "Refresh failed unexpectedly");
                AccountError::RefreshTokenInvalid
            }
        })
    }

    async fn try_refresh(&self, incoming: &str) -> AccountResult<TokenPair> {
        let claims: RefreshClaims = self
            .config
            .refresh_keys()
            .verify(incoming)
            .map_err(|_| AccountError::RefreshTokenInvalid)?;

        let user_id: UserId = claims
            .sub
            .parse()
            .map_err(|_| AccountError::RefreshTokenInvalid)?;

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AccountError::RefreshTokenInvalid)?;

        let pair = self.mint(&user)?;

        let rotated = self
            .credential_repo
            .rotate_refresh_token(
                &user.user_id,
                &sha256_hex(incoming.as_bytes()),
                &sha256_hex(pair.refresh_token.as_bytes()),
            )
            .await?;

        if !rotated {
            return Err(AccountError::RefreshTokenReused);
        }

        tracing::info!(user_id = %user.user_id, "Tokens rotated");
        Ok(pair)
    }

    fn mint(&self, user: &User) -> AccountResult<TokenPair> {
        let access_keys = self.config.access_keys();
        let refresh_keys = self.config.refresh_keys();

        let (iat, exp) = access_keys.issue_window();
        let access_token = access_keys
            .sign(&AccessClaims {
                sub: user.user_id.to_string(),
                email: user.email.as_str().to_string(),
                username: user.user_name.as_str().to_string(),
                full_name: user.full_name.as_str().to_string(),
                iat,
                exp,
                jti: Uuid::new_v4().to_string(),
            })
            .map_err(token_error)?;

        let (iat, exp) = refresh_keys.issue_window();
        let refresh_token = refresh_keys
            .sign(&RefreshClaims {
                sub: user.user_id.to_string(),
                iat,
                exp,
                jti: Uuid::new_v4().to_string(),
            })
            .map_err(token_error)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

fn token_error(err: TokenError) -> AccountError {
    AccountError::Internal(err.to_string())
}
