use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod posts;

/// Everything mounted under `/api`.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/posts", posts::routes())
}
