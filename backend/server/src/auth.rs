//! # Auth
//!
//! Login state travels in the `access_token` cookie as a signed JWT.
//!
//! - [`jwt_middleware`] runs on every request. A valid token puts an
//!   [`AuthUser`] into the request extensions. Missing or bad tokens leave the
//!   request anonymous; routes that need a user reject it themselves.
//! - Tokens with less than half their lifetime left are re-issued on the way
//!   out, so active users never get logged out.
//! - [`AuthUser`] as a handler argument answers 401 for anonymous requests.
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use tracing::{debug, warn};

use crate::{config::Config, error::AppError, object_id::ObjectId, state::AppState, token};

pub const ACCESS_TOKEN: &str = "access_token";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: ObjectId,
    pub username: String,
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

pub fn token_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookie)
        .max_age(time::Duration::days(token::TOKEN_LIFETIME_DAYS))
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN).path("/").build()
}

pub async fn jwt_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(ACCESS_TOKEN).map(|c| c.value().to_string()) else {
        return next.run(req).await;
    };

    let claims = match state.tokens.verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Ignoring access token: {e}");
            return next.run(req).await;
        }
    };

    req.extensions_mut().insert(AuthUser {
        id: claims.id,
        username: claims.username.clone(),
    });

    let response = next.run(req).await;

    // login/logout already decided what the cookie should be
    if !claims.needs_refresh(Utc::now()) || response.headers().contains_key(SET_COOKIE) {
        return response;
    }

    match state.tokens.issue(claims.id, &claims.username) {
        Ok(token) => {
            debug!("Refreshed access token for {}", claims.username);
            (jar.add(token_cookie(&state.config, token)), response).into_response()
        }
        Err(e) => {
            warn!("Failed to refresh access token: {e}");
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secure_cookie: bool) -> Config {
        Config {
            port: 0,
            redis_url: String::new(),
            jwt_secret: "secret".to_string(),
            password_cost: 4,
            secure_cookie,
        }
    }

    #[test]
    fn test_token_cookie_attributes() {
        let cookie = token_cookie(&config(false), "abc".to_string());
        let header = cookie.to_string();

        assert!(header.starts_with("access_token=abc"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=604800"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn test_secure_cookie() {
        let cookie = token_cookie(&config(true), "abc".to_string());
        assert!(cookie.to_string().contains("Secure"));
    }

    #[tokio::test]
    async fn test_extractor_rejects_anonymous() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_extractor_reads_extension() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let user = AuthUser {
            id: ObjectId::from_parts(1, [0; 5], 1),
            username: "kdcdev".to_string(),
        };
        parts.extensions.insert(user.clone());

        let found = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found, user);
    }
}
