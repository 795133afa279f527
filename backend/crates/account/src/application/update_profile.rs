//! Update Profile Use Case
//!
//! Replaces full name and email together. Other columns are left as
//! stored, so a concurrent image update is never rolled back.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, FullName};
use crate::error::{AccountError, AccountResult};

pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId, input: UpdateProfileInput) -> AccountResult<User> {
        let (Some(full_name), Some(email)) = (
            input.full_name.filter(|v| !v.trim().is_empty()),
            input.email.filter(|v| !v.trim().is_empty()),
        ) else {
            return Err(AccountError::MissingFields);
        };

        let full_name = FullName::new(full_name)?;
        let email = Email::new(email)?;

        let user = self
            .user_repo
            .update_details(user_id, &full_name, &email)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        tracing::info!(user_id = %user.user_id, "Account details updated");
        Ok(user)
    }
}
