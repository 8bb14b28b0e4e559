//! HS256 access tokens carried in the `access_token` cookie.
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::object_id::ObjectId;

pub const TOKEN_LIFETIME_DAYS: i64 = 7;

/// Re-issue once less than this much lifetime remains (3.5 days).
const REFRESH_WINDOW_SECS: i64 = 60 * 60 * 24 * 7 / 2;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.exp - now.timestamp() < REFRESH_WINDOW_SECS
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, id: ObjectId, username: &str) -> Result<String, TokenError> {
        self.issue_at(id, username, Utc::now())
    }

    pub fn issue_at(
        &self,
        id: ObjectId,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}
