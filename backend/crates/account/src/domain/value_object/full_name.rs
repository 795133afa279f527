//! Full Name Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

pub const FULL_NAME_MAX_LENGTH: usize = 100;

/// Display name, trimmed and NFC-normalized. Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName(String);

impl FullName {
    pub fn new(input: impl AsRef<str>) -> AppResult<Self> {
        let value: String = input.as_ref().trim().nfc().collect();

        if value.is_empty() {
            return Err(AppError::bad_request("Full name cannot be empty"));
        }

        if value.chars().count() > FULL_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Full name must be at most {} characters",
                FULL_NAME_MAX_LENGTH
            )));
        }

        if value.chars().any(char::is_control) {
            return Err(AppError::bad_request("Full name contains invalid characters"));
        }

        Ok(Self(value))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FullName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(FullName::new("  Hitesh Choudhary ").unwrap().as_str(), "Hitesh Choudhary");
        assert!(FullName::new("   ").is_err());
        assert!(FullName::new("a\u{0000}b").is_err());
        assert!(FullName::new("x".repeat(FULL_NAME_MAX_LENGTH + 1)).is_err());
    }
}
