//! Request bodies and their validation rules.
//!
//! [`ValidJson`] parses the body itself rather than going through
//! `axum::Json`, so every malformed payload is a 400 with the same error
//! shape instead of a mix of 400/415/422.
use std::sync::LazyLock;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use regex::Regex;
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::AppError;

static USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{3,20}$").expect("username pattern is valid")
});

pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let value: T =
            serde_json::from_slice(&bytes).map_err(|e| AppError::Validation(e.to_string()))?;
        value.validate()?;

        Ok(Self(value))
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(format!(
            "\"{field}\" is not allowed to be empty"
        )));
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        if !USERNAME.is_match(&self.username) {
            return Err(AppError::Validation(
                "\"username\" must be 3-20 alphanumeric characters".to_string(),
            ));
        }

        require_non_empty("password", &self.password)
    }
}

/// Missing credentials are an auth failure (401), not a bad request.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username, password))
            }
            _ => None,
        }
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WritePostRequest {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl Validate for WritePostRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("body", &self.body)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Validate for UpdatePostRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            require_non_empty("title", title)?;
        }
        if let Some(body) = &self.body {
            require_non_empty("body", body)?;
        }

        Ok(())
    }
}
