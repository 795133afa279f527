//! Logout Use Case
//!
//! Revokes the stored refresh token. Access tokens simply expire.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::CredentialRepository;
use crate::error::AccountResult;

pub struct LogoutUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
}

impl<C> LogoutUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>) -> Self {
        Self { credential_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AccountResult<()> {
        self.credential_repo.set_refresh_token(user_id, None).await?;

        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }
}
