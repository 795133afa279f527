//! Server Configuration
//!
//! Everything is read from the environment (optionally seeded by `.env`).

use std::path::PathBuf;

use account::AccountConfig;
use account::application::config::parse_expiry;
use anyhow::{Context, bail};
use axum::http::HeaderValue;
use platform::media::CloudinaryConfig;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub cors_origins: Vec<HeaderValue>,
    pub account: AccountConfig,
    pub cloudinary: CloudinaryConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port = match get("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {}", port))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = get("CORS_ORIGIN")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        let cloudinary = CloudinaryConfig::new(
            get("CLOUDINARY_CLOUD_NAME").context("CLOUDINARY_CLOUD_NAME must be set")?,
            get("CLOUDINARY_API_KEY").context("CLOUDINARY_API_KEY must be set")?,
            get("CLOUDINARY_API_SECRET").context("CLOUDINARY_API_SECRET must be set")?,
        );

        Ok(Self {
            database_url,
            port,
            cors_origins,
            account: account_config(&get, cfg!(debug_assertions))?,
            cloudinary,
        })
    }
}

fn account_config<F>(get: &F, development: bool) -> anyhow::Result<AccountConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // Development falls back to random secrets, production refuses to start
    let mut config = if development {
        AccountConfig::development()
    } else {
        AccountConfig::default()
    };

    for (key, secret) in [
        ("ACCESS_TOKEN_SECRET", &mut config.access_token_secret),
        ("REFRESH_TOKEN_SECRET", &mut config.refresh_token_secret),
    ] {
        match get(key) {
            Some(value) => *secret = value.into_bytes(),
            None if development => {
                tracing::warn!("{} not set, using a random secret", key);
            }
            None => bail!("{} must be set in production", key),
        }
    }

    if config.access_token_secret == config.refresh_token_secret {
        bail!("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ");
    }

    for (key, ttl) in [
        ("ACCESS_TOKEN_EXPIRY", &mut config.access_token_ttl),
        ("REFRESH_TOKEN_EXPIRY", &mut config.refresh_token_ttl),
    ] {
        if let Some(value) = get(key) {
            *ttl = parse_expiry(&value)
                .with_context(|| format!("{} is not a valid expiry: {}", key, value))?;
        }
    }

    if let Some(value) = get("COOKIE_SECURE") {
        config.cookie_secure = match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => bail!("COOKIE_SECURE must be true or false, got {}", other),
        };
    }

    if let Some(dir) = get("UPLOAD_TEMP_DIR") {
        config.upload_temp_dir = PathBuf::from(dir);
    }

    config.password_pepper = get("PASSWORD_PEPPER").map(String::into_bytes);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 6] = [
        ("DATABASE_URL", "postgres://localhost/videos"),
        ("ACCESS_TOKEN_SECRET", "access-secret"),
        ("REFRESH_TOKEN_SECRET", "refresh-secret"),
        ("CLOUDINARY_CLOUD_NAME", "demo"),
        ("CLOUDINARY_API_KEY", "key"),
        ("CLOUDINARY_API_SECRET", "secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.account.access_token_secret, b"access-secret");
        assert_eq!(config.account.access_token_ttl, Duration::from_secs(86_400));
        assert_eq!(config.account.refresh_token_ttl, Duration::from_secs(864_000));
        assert!(config.account.password_pepper.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "9000"),
            ("CORS_ORIGIN", "https://videos.test"),
            ("ACCESS_TOKEN_EXPIRY", "15m"),
            ("REFRESH_TOKEN_EXPIRY", "7d"),
            ("COOKIE_SECURE", "false"),
            ("UPLOAD_TEMP_DIR", "/tmp/uploads"),
            ("PASSWORD_PEPPER", "pepper"),
        ]);

        let config = ServerConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.cors_origins, vec![HeaderValue::from_static("https://videos.test")]);
        assert_eq!(config.account.access_token_ttl, Duration::from_secs(900));
        assert_eq!(config.account.refresh_token_ttl, Duration::from_secs(7 * 86_400));
        assert!(!config.account.cookie_secure);
        assert_eq!(config.account.upload_temp_dir, PathBuf::from("/tmp/uploads"));
        assert_eq!(config.account.pepper(), Some(&b"pepper"[..]));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("PORT", "eighty"),
            ("ACCESS_TOKEN_EXPIRY", "soon"),
            ("REFRESH_TOKEN_EXPIRY", "400d"),
            ("COOKIE_SECURE", "maybe"),
            ("REFRESH_TOKEN_SECRET", "access-secret"),
        ] {
            let mut pairs = REQUIRED.to_vec();
            pairs.retain(|(k, _)| *k != key);
            pairs.push((key, value));
            assert!(ServerConfig::from_lookup(lookup(&pairs)).is_err(), "{}", key);
        }

        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DATABASE_URL")
            .collect();
        assert!(ServerConfig::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_production_requires_secrets() {
        let get = lookup(&[]);
        assert!(account_config(&get, false).is_err());

        let config = account_config(&get, true).unwrap();
        assert!(!config.cookie_secure);
        assert_ne!(config.access_token_secret, config.refresh_token_secret);
    }
}
