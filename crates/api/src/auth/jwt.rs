//! Verification of access tokens minted by the identity service.
//!
//! Tokens are HS256 JWTs signed with the shared `JWT_SECRET`. This service
//! only verifies them; [`issue_token`] exists for the integration tests and
//! for operators minting a staff token by hand.

use std::fmt;

use chimaek_core::types::DbId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Clock skew tolerated on `exp` when `JWT_LEEWAY_SECS` is not set.
const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Payload of an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric user id.
    pub sub: DbId,
    /// `admin` or `customer`; other values are treated as `customer`.
    pub role: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Token verification settings.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub leeway_secs: u64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_LEEWAY_SECS` (default `30`).
    ///
    /// # Panics
    ///
    /// Panics if the secret is missing or empty, or the leeway is not a
    /// number.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let leeway_secs = match std::env::var("JWT_LEEWAY_SECS") {
            Ok(raw) => raw.parse().expect("JWT_LEEWAY_SECS must be a valid u64"),
            Err(_) => DEFAULT_LEEWAY_SECS,
        };

        Self {
            secret,
            leeway_secs,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // `sub` is numeric; the built-in presence check only understands
        // string subjects, so deserializing `Claims` enforces it instead.
        validation.set_required_spec_claims(&["exp"]);
        validation.leeway = self.leeway_secs;
        validation
    }
}

/// Check the signature and expiry of `token` and return its claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config.secret.as_bytes());
    decode::<Claims>(token, &key, &config.validation()).map(|data| data.claims)
}

/// Sign a token for `user_id` that expires after `ttl`.
pub fn issue_token(
    user_id: DbId,
    role: &str,
    ttl: Duration,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: (now + ttl).timestamp(),
        iat: Some(now.timestamp()),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
