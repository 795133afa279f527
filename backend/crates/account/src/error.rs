//! Account Error Types
//!
//! Account-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Account-specific result type alias
pub type AccountResult<T> = Result<T, AccountError>;

/// Message used for every unexpected failure
const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AccountError {
    /// A required text field is missing or blank
    #[error("All fields are required")]
    MissingFields,

    /// Login without username or email
    #[error("username or email is required")]
    IdentifierRequired,

    /// Channel lookup without a username
    #[error("username is missing")]
    UsernameRequired,

    /// Registration without avatar file
    #[error("Avatar file is required")]
    AvatarRequired,

    /// Media update without a file
    #[error("{0} file is missing")]
    FileRequired(&'static str),

    /// Field value rejected by a value object
    #[error("{0}")]
    Validation(String),

    /// Malformed upload (duplicate file fields, unreadable multipart body)
    #[error("{0}")]
    InvalidUpload(String),

    /// Multipart body over the configured limit
    #[error("Uploaded file is too large")]
    UploadTooLarge,

    /// Username or email already registered
    #[error("User with email or username already exists")]
    UserExists,

    /// Email already used by another account
    #[error("Email is already in use")]
    EmailTaken,

    /// No user matches the login identifier
    #[error("User does not exist")]
    UserNotFound,

    /// No channel with the requested username
    #[error("Channel does not exist")]
    ChannelNotFound,

    /// Wrong password at login
    #[error("Invalid user credentials")]
    InvalidCredentials,

    /// Wrong current password on password change
    #[error("Invalid old password")]
    InvalidOldPassword,

    /// No credential presented
    #[error("Unauthorized request")]
    Unauthorized,

    /// Access token bad, expired, or its user is gone
    #[error("Invalid access token")]
    AccessTokenInvalid,

    /// Refresh token bad, expired, or its user is gone
    #[error("Invalid refresh token")]
    RefreshTokenInvalid,

    /// Refresh token no longer the stored one
    #[error("Refresh token is expired or used")]
    RefreshTokenReused,

    /// Media host upload failed
    #[error("Error while uploading {0}")]
    UploadFailed(&'static str),

    /// Token pair could not be minted or stored
    #[error("Something went wrong while generating refresh and access token")]
    TokenGeneration,

    /// Created user could not be read back
    #[error("Something went wrong while registering the user")]
    UserCreationFailed,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::MissingFields
            | AccountError::IdentifierRequired
            | AccountError::UsernameRequired
            | AccountError::AvatarRequired
            | AccountError::FileRequired(_)
            | AccountError::Validation(_)
            | AccountError::InvalidUpload(_) => ErrorKind::BadRequest,
            AccountError::UploadTooLarge => ErrorKind::PayloadTooLarge,
            AccountError::UserExists | AccountError::EmailTaken => ErrorKind::Conflict,
            AccountError::UserNotFound | AccountError::ChannelNotFound => ErrorKind::NotFound,
            AccountError::InvalidCredentials
            | AccountError::InvalidOldPassword
            | AccountError::Unauthorized
            | AccountError::AccessTokenInvalid
            | AccountError::RefreshTokenInvalid
            | AccountError::RefreshTokenReused => ErrorKind::Unauthorized,
            AccountError::UploadFailed(_)
            | AccountError::TokenGeneration
            | AccountError::UserCreationFailed
            | AccountError::Database(_)
            | AccountError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Database and internal failures never leak their details.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AccountError::Database(_) | AccountError::Internal(_) => {
                AppError::new(self.kind(), GENERIC_SERVER_ERROR)
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Account database error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccountError::UploadFailed(_)
            | AccountError::TokenGeneration
            | AccountError::UserCreationFailed => {
                tracing::error!(error = %self, "Account operation failed");
            }
            AccountError::InvalidCredentials | AccountError::InvalidOldPassword => {
                tracing::warn!(error = %self, "Password check failed");
            }
            AccountError::RefreshTokenReused => {
                tracing::warn!("Refresh token presented after rotation");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Value objects report through `AppError`; client errors stay client errors.
impl From<AppError> for AccountError {
    fn from(err: AppError) -> Self {
        if err.is_client_error() {
            AccountError::Validation(err.message().to_string())
        } else {
            AccountError::Internal(err.to_string())
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AccountError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AccountError::Validation(rejection.body_text())
    }
}

/// Missing or malformed `multipart/form-data` header
impl From<axum::extract::multipart::MultipartRejection> for AccountError {
    fn from(rejection: axum::extract::multipart::MultipartRejection) -> Self {
        AccountError::InvalidUpload(rejection.body_text())
    }
}

impl From<platform::password::PasswordHashError> for AccountError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AccountError::Internal(err.to_string())
    }
}

impl From<platform::media::MediaError> for AccountError {
    fn from(err: platform::media::MediaError) -> Self {
        AccountError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AccountError::MissingFields.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AccountError::UserExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AccountError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AccountError::InvalidOldPassword.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AccountError::TokenGeneration.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AccountError::UploadTooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AccountError::Internal("connection string leaked".to_string());
        assert_eq!(err.to_app_error().message(), GENERIC_SERVER_ERROR);

        let err = AccountError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_app_error().message(), GENERIC_SERVER_ERROR);
    }

    #[test]
    fn test_token_generation_message_kept() {
        let err = AccountError::TokenGeneration;
        assert_eq!(
            err.to_app_error().message(),
            "Something went wrong while generating refresh and access token"
        );
    }

    #[test]
    fn test_from_app_error() {
        let err: AccountError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, AccountError::Validation(ref m) if m == "Invalid email format"));

        let err: AccountError = AppError::internal("boom").into();
        assert!(matches!(err, AccountError::Internal(_)));
    }
}
