//! Application Configuration
//!
//! Configuration for the Account application layer.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::jwt::JwtKeys;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Longest accepted token lifetime
pub const MAX_EXPIRY: Duration = Duration::from_secs(365 * 24 * 3600);

/// Account application configuration
#[derive(Clone)]
pub struct AccountConfig {
    /// HMAC secret for access tokens
    pub access_token_secret: Vec<u8>,
    /// Access token lifetime (1 day)
    pub access_token_ttl: Duration,
    /// HMAC secret for refresh tokens, distinct from the access secret
    pub refresh_token_secret: Vec<u8>,
    /// Refresh token lifetime (10 days)
    pub refresh_token_ttl: Duration,
    pub access_cookie_name: String,
    pub refresh_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Directory multipart files are staged in before upload
    pub upload_temp_dir: PathBuf,
    /// Maximum multipart body size in bytes
    pub max_upload_bytes: usize,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            access_token_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(24 * 3600),
            refresh_token_secret: Vec::new(),
            refresh_token_ttl: Duration::from_secs(10 * 24 * 3600),
            access_cookie_name: "accessToken".to_string(),
            refresh_cookie_name: "refreshToken".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            upload_temp_dir: PathBuf::from("./public/temp"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AccountConfig {
    /// Create config with random token secrets
    pub fn with_random_secrets() -> Self {
        Self {
            access_token_secret: platform::crypto::random_bytes(32),
            refresh_token_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    pub fn access_keys(&self) -> JwtKeys {
        JwtKeys::new(&self.access_token_secret, self.access_token_ttl)
    }

    pub fn refresh_keys(&self) -> JwtKeys {
        JwtKeys::new(&self.refresh_token_secret, self.refresh_token_ttl)
    }

    pub fn access_cookie(&self) -> CookieConfig {
        self.cookie(&self.access_cookie_name, self.access_token_ttl)
    }

    pub fn refresh_cookie(&self) -> CookieConfig {
        self.cookie(&self.refresh_cookie_name, self.refresh_token_ttl)
    }

    fn cookie(&self, name: &str, ttl: Duration) -> CookieConfig {
        CookieConfig {
            name: name.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("access_token_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_secret", &"[REDACTED]")
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("access_cookie_name", &self.access_cookie_name)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("upload_temp_dir", &self.upload_temp_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

/// Parse an expiry such as `15m`, `1d` or `3600`
///
/// Accepts `s`, `m`, `h`, `d` suffixes; a bare number is seconds.
/// Zero and anything above [`MAX_EXPIRY`] are rejected.
pub fn parse_expiry(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (number, unit_secs) = match value.char_indices().last()? {
        (i, 's') => (&value[..i], 1),
        (i, 'm') => (&value[..i], 60),
        (i, 'h') => (&value[..i], 3600),
        (i, 'd') => (&value[..i], 24 * 3600),
        _ => (value, 1),
    };

    let amount: u64 = number.trim().parse().ok()?;
    if amount == 0 {
        return None;
    }
    amount
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .filter(|ttl| *ttl <= MAX_EXPIRY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expiry() {
        assert_eq!(parse_expiry("1d"), Some(Duration::from_secs(86_400)));
        assert_eq!(parse_expiry("10d"), Some(Duration::from_secs(864_000)));
        assert_eq!(parse_expiry("15m"), Some(Duration::from_secs(900)));
        assert_eq!(parse_expiry("2h"), Some(Duration::from_secs(7200)));
        assert_eq!(parse_expiry("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_expiry(" 3600 "), Some(Duration::from_secs(3600)));
        assert_eq!(parse_expiry(""), None);
        assert_eq!(parse_expiry("0"), None);
        assert_eq!(parse_expiry("d"), None);
        assert_eq!(parse_expiry("1w"), None);
    }

    #[test]
    fn test_parse_expiry_upper_bound() {
        assert_eq!(parse_expiry("365d"), Some(MAX_EXPIRY));
        assert_eq!(parse_expiry("366d"), None);
        assert_eq!(parse_expiry("8761h"), None);
        assert_eq!(parse_expiry("18446744073709551615"), None);
        assert_eq!(parse_expiry("18446744073709551615d"), None);
    }

    #[test]
    fn test_cookie_max_age_saturates() {
        let config = AccountConfig {
            refresh_token_ttl: Duration::MAX,
            ..AccountConfig::default()
        };
        assert_eq!(config.refresh_cookie().max_age_secs, Some(i64::MAX));
    }

    #[test]
    fn test_development_config() {
        let config = AccountConfig::development();
        assert!(!config.cookie_secure);
        assert_eq!(config.access_token_secret.len(), 32);
        assert_ne!(config.access_token_secret, config.refresh_token_secret);
    }

    #[test]
    fn test_cookies_follow_config() {
        let config = AccountConfig::default();
        let cookie = config.access_cookie().build_set_cookie("tok");
        assert!(cookie.starts_with("accessToken=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=86400"));

        assert_eq!(config.refresh_cookie().name, "refreshToken");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AccountConfig {
            access_token_secret: b"visible-access".to_vec(),
            password_pepper: Some(b"visible-pepper".to_vec()),
            ..AccountConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("visible-access"));
        assert!(!debug.contains("visible-pepper"));
    }
}
