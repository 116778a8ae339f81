//! HS256 access tokens.
//!
//! There is no login endpoint: operators mint tokens with
//! `mosaic issue-token` and the API only validates them.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mosaic_core::roles::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim on every token this catalog mints and accepts.
pub const TOKEN_ISSUER: &str = "mosaic-catalog";

/// Default access token expiry in minutes.
pub const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Operator username, recorded as the actor on writes.
    pub sub: String,
    /// Role name. Parsed into [`Role`] by the auth extractor.
    pub role: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    /// Token id, logged when the token is minted.
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify tokens.
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("JWT_ACCESS_EXPIRY_MINS must be a positive integer, got '{0}'")]
    InvalidExpiry(String),
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS` (default 60).
    pub fn try_from_env() -> Result<Self, JwtConfigError> {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(JwtConfigError::MissingSecret)?;

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|mins| *mins > 0)
                .ok_or(JwtConfigError::InvalidExpiry(raw))?,
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Ok(Self {
            secret,
            access_token_expiry_mins,
        })
    }

    /// [`try_from_env`](Self::try_from_env) for server startup.
    ///
    /// # Panics
    ///
    /// Panics when the environment is invalid.
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|e| panic!("{e}"))
    }
}

/// Claims for `username` acting as `role`, expiring after the configured lifetime.
pub fn claims_for(username: &str, role: Role, config: &JwtConfig) -> Claims {
    let now = chrono::Utc::now().timestamp();
    Claims {
        sub: username.to_string(),
        role: role.as_str().to_string(),
        iss: TOKEN_ISSUER.to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    }
}

pub fn encode_claims(
    claims: &Claims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

pub fn generate_access_token(
    username: &str,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode_claims(&claims_for(username, role, config), config)
}

/// Check signature, expiry and issuer, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
