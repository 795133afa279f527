//! Change Password Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AccountConfig;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{RawPassword, UserPassword};
use crate::error::{AccountError, AccountResult};

pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
    config: Arc<AccountConfig>,
}

impl<C> ChangePasswordUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>, config: Arc<AccountConfig>) -> Self {
        Self {
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, user_id: &UserId, input: ChangePasswordInput) -> AccountResult<()> {
        let credentials = self
            .credential_repo
            .find_credentials(user_id)
            .await?
            .ok_or_else(|| AccountError::Internal("Credentials not found".to_string()))?;

        let old_password =
            RawPassword::new(input.old_password).map_err(|_| AccountError::InvalidOldPassword)?;

        if !credentials
            .password_hash
            .verify(&old_password, self.config.pepper())
        {
            return Err(AccountError::InvalidOldPassword);
        }

        let new_password = RawPassword::new(input.new_password)?;
        let password_hash = UserPassword::from_raw(&new_password, self.config.pepper())?;

        self.credential_repo
            .update_password(user_id, &password_hash)
            .await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
