use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

use crate::password::check_cost;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Secret {0} not found in environment or /run/secrets")]
    MissingSecret(String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub jwt_secret: String,
    /// scrypt log2(N) used for new password hashes.
    pub password_cost: u8,
    pub secure_cookie: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("PORT", "4000")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            jwt_secret: read_secret("JWT_SECRET")?,
            password_cost: checked_cost(try_load("PASSWORD_COST", "15")?)?,
            secure_cookie: try_load("COOKIE_SECURE", "false")?,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &raw)
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}

fn checked_cost(cost: u8) -> Result<u8, ConfigError> {
    check_cost(cost).map_err(|e| {
        warn!("Invalid PASSWORD_COST value: {e}");
        ConfigError::InvalidValue {
            key: "PASSWORD_COST".to_string(),
            reason: e.to_string(),
        }
    })
}

/// Environment first, then the docker secret mount.
fn read_secret(secret_name: &str) -> Result<String, ConfigError> {
    if let Some(value) = var(secret_name) {
        return Ok(value);
    }

    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            warn!("Failed to read {secret_name} from {path}");
            ConfigError::MissingSecret(secret_name.to_string())
        })
}
