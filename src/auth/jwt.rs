use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use super::claims::Payload;
use crate::config::TokenConfig;

pub const MIN_SECRET_KEY_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid secret key: min length must be {}", MIN_SECRET_KEY_LEN)]
    SecretTooShort,
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 identity tokens.
#[derive(Clone)]
pub struct TokenMaker {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenMaker").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TokenMaker {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_KEY_LEN {
            return Err(TokenError::SecretTooShort);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn from_config(cfg: &TokenConfig) -> Result<Self, TokenError> {
        Self::new(&cfg.secret, Duration::minutes(cfg.ttl_minutes))
    }

    pub fn create_token(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let payload = Payload {
            user_id,
            username: username.to_string(),
            issued_at: now,
            expired_at: now + self.ttl,
        };
        let token = encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)?;
        debug!(user_id, "token signed");
        Ok(token)
    }

    pub fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        // Expiry lives in our own payload, so the registered-claim checks are off.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Payload>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "token rejected");
            TokenError::Invalid
        })?;

        let payload = data.claims;
        if payload.is_expired_at(OffsetDateTime::now_utc()) {
            warn!(user_id = payload.user_id, "token expired");
            return Err(TokenError::Expired);
        }
        debug!(user_id = payload.user_id, "token verified");
        Ok(payload)
    }
}
