use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{CallerIdentity, Role};
use crate::config::SecurityConfig;

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id, stringified.
    pub sub: String,

    pub username: String,

    pub role: String,

    pub iss: String,

    pub aud: String,

    pub iat: i64,

    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token generation failed: {0}")]
    Generation(String),

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token claim missing or malformed: {0}")]
    BadClaim(&'static str),
}

/// Issues and validates signed, time-bounded session tokens (HS256).
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    issuer: String,
    audience: String,
    expiry_hours: u32,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            expiry_hours: config.jwt_expiry_hours,
        }
    }

    pub fn issue(&self, user_id: i32, username: &str, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = now + Duration::hours(i64::from(self.expiry_hours));

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Verifies signature, issuer, audience and expiry.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| TokenError::Invalid(e.to_string()))?;

        Ok(token_data.claims)
    }

    /// Extracts the caller identity from validated claims. Failure here
    /// means a token we issued is missing a claim, which is a bug.
    pub fn caller_identity(claims: &Claims) -> Result<CallerIdentity, TokenError> {
        let user_id = claims
            .sub
            .parse::<i32>()
            .map_err(|_| TokenError::BadClaim("sub"))?;

        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| TokenError::BadClaim("role"))?;

        Ok(CallerIdentity { user_id, role })
    }
}
