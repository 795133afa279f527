//! User Name Value Object
//!
//! The user name is the public handle of an account and doubles as the
//! channel handle (`/c/{username}`). It is used for login and lookup.
//!
//! ## Normalization
//! NFKC → trim → lowercase. The stored form is always the lowercase one, so
//! `Alice` and `alice` are the same account.
//!
//! ## Invariants
//! - Non-empty after normalization
//! - At most `USER_NAME_MAX_LENGTH` characters
//! - No whitespace, control characters, or `/`

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 64;

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// User name is empty after normalization
    Empty,

    /// User name is too long (maximum: USER_NAME_MAX_LENGTH)
    TooLong { length: usize, max: usize },

    /// User name contains whitespace in the middle
    ContainsWhitespace,

    /// User name contains a control character or `/`
    InvalidCharacter { char: char, position: usize },
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "User name cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "User name is too long ({length} chars, maximum {max})")
            }
            Self::ContainsWhitespace => write!(f, "User name cannot contain whitespace"),
            Self::InvalidCharacter { char, position } => {
                write!(f, "Invalid character {char:?} at position {position}")
            }
        }
    }
}

impl std::error::Error for UserNameError {}

/// Validated, lowercase user name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Normalize and validate raw input
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let canonical = Self::normalize(input.as_ref());
        Self::validate(&canonical)?;
        Ok(Self(canonical))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    fn normalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_lowercase()
    }

    fn validate(canonical: &str) -> Result<(), UserNameError> {
        if canonical.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = canonical.chars().count();
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        for (position, ch) in canonical.chars().enumerate() {
            if ch.is_whitespace() {
                return Err(UserNameError::ContainsWhitespace);
            }
            if ch.is_control() || ch == '/' {
                return Err(UserNameError::InvalidCharacter { char: ch, position });
            }
        }

        Ok(())
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserName({})", self.0)
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
