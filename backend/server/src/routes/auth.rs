use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use tokio::task::spawn_blocking;
use tracing::info;

use crate::{
    auth::{AuthUser, removal_cookie, token_cookie},
    error::AppError,
    models::{PublicUser, User},
    object_id::ObjectId,
    state::AppState,
    validate::{LoginRequest, RegisterRequest, ValidJson},
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/check", get(check))
        .route("/logout", post(logout))
}

fn logged_in(state: &AppState, jar: CookieJar, user: &User) -> Result<CookieJar, AppError> {
    let token = state.tokens.issue(user.id, &user.username)?;
    Ok(jar.add(token_cookie(&state.config, token)))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<(CookieJar, Json<PublicUser>), AppError> {
    if state.store.find_user(&payload.username).await?.is_some() {
        return Err(AppError::Conflict);
    }

    let hasher = state.passwords;
    let hashed_password = spawn_blocking(move || hasher.hash(&payload.password)).await??;

    let user = User {
        id: ObjectId::new(),
        username: payload.username,
        hashed_password,
    };

    // lost the race against a concurrent registration
    if !state.store.insert_user(&user).await? {
        return Err(AppError::Conflict);
    }

    info!("Registered {}", user.username);

    let jar = logged_in(&state, jar, &user)?;
    Ok((jar, Json(user.to_public())))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<(CookieJar, Json<PublicUser>), AppError> {
    let (username, password) = payload.credentials().ok_or(AppError::Unauthorized)?;
    let password = password.to_string();

    let user = state.store.find_user(username).await?;
    let hasher = state.passwords;

    let Some(user) = user else {
        spawn_blocking(move || hasher.burn(&password)).await?;
        return Err(AppError::Unauthorized);
    };

    let encoded = user.hashed_password.clone();
    let valid = spawn_blocking(move || hasher.verify(&password, &encoded)).await??;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    let jar = logged_in(&state, jar, &user)?;
    Ok((jar, Json(user.to_public())))
}

/// GET /api/auth/check
pub async fn check(user: AuthUser) -> Json<PublicUser> {
    Json(PublicUser {
        id: user.id,
        username: user.username,
    })
}

/// POST /api/auth/logout
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (StatusCode::NO_CONTENT, jar.remove(removal_cookie()))
}
