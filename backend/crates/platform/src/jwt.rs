//! JWT Signing and Verification
//!
//! HS256 tokens with a per-purpose secret and lifetime. Callers define the
//! claim set and fill `iat`/`exp` from [`JwtKeys::issue_window`]; verification
//! checks the signature and `exp` with no leeway.

use std::fmt;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Token expired")]
    Expired,

    #[error("Token invalid: {0}")]
    Invalid(String),
}

/// Secret and lifetime for one kind of token
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
            validation,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// `(iat, exp)` in unix seconds for a token minted now
    pub fn issue_window(&self) -> (u64, u64) {
        let now = jsonwebtoken::get_current_timestamp();
        (now, now.saturating_add(self.ttl.as_secs()))
    }

    pub fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        decode::<C>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        sub: String,
        iat: u64,
        exp: u64,
    }

    fn claims_for(keys: &JwtKeys) -> TestClaims {
        let (iat, exp) = keys.issue_window();
        TestClaims {
            sub: "user-1".to_string(),
            iat,
            exp,
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let keys = JwtKeys::new(b"access-secret", Duration::from_secs(60));
        let claims = claims_for(&keys);
        let token = keys.sign(&claims).unwrap();

        let decoded: TestClaims = keys.verify(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_issue_window_saturates() {
        let keys = JwtKeys::new(b"access-secret", Duration::MAX);
        let (iat, exp) = keys.issue_window();
        assert!(iat > 0);
        assert_eq!(exp, u64::MAX);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let access = JwtKeys::new(b"access-secret", Duration::from_secs(60));
        let refresh = JwtKeys::new(b"refresh-secret", Duration::from_secs(60));
        let token = access.sign(&claims_for(&access)).unwrap();

        let result = refresh.verify::<TestClaims>(&token);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_rejected() {
        let keys = JwtKeys::new(b"secret", Duration::from_secs(60));
        let now = jsonwebtoken::get_current_timestamp();
        let token = keys
            .sign(&TestClaims {
                sub: "user-1".to_string(),
                iat: now - 120,
                exp: now - 60,
            })
            .unwrap();

        assert!(matches!(
            keys.verify::<TestClaims>(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let keys = JwtKeys::new(b"secret", Duration::from_secs(60));
        assert!(matches!(
            keys.verify::<TestClaims>("not.a.jwt"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let keys = JwtKeys::new(b"super-secret", Duration::from_secs(60));
        let debug = format!("{:?}", keys);
        assert!(!debug.contains("super-secret"));
    }
}
