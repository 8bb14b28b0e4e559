//! Documentation of a small blog platform backend.
//!
//!
//!
//! # General Infrastructure
//! - Single axum server exposing a JSON REST API under `/api`
//! - Redis holds both users and posts, see [`database`]
//! - Login state is a signed JWT in an `HttpOnly` cookie, see [`auth`]
//! - The frontend (and the `client` crate) talks to the API through a same-origin proxy
//!
//!
//!
//! # API
//!
//! ## Auth
//! - `POST /api/auth/register` creates an account and logs in
//! - `POST /api/auth/login` checks the password and sets the cookie
//! - `GET /api/auth/check` returns the logged in user or 401
//! - `POST /api/auth/logout` clears the cookie
//!
//! ## Posts
//! - `GET /api/posts?page=&tag=&username=` lists 10 posts per page, newest first
//!   - Bodies are shortened to 200 characters
//!   - `Last-Page` header carries the number of pages
//! - `POST /api/posts` writes a post as the logged in user
//! - `GET /api/posts/{id}` reads one post
//! - `PATCH /api/posts/{id}` edits your own post
//! - `DELETE /api/posts/{id}` removes your own post
//!
//!
//!
//! # Setup
//!
//! Environment, all optional except the secret.
//! ```sh
//! PORT=4000
//! REDIS_URL=redis://127.0.0.1:6379
//! JWT_SECRET=...            # or /run/secrets/JWT_SECRET
//! PASSWORD_COST=15
//! COOKIE_SECURE=false
//! RUST_LOG=info
//! ```
//!
//! Run.
//! ```sh
//! cargo run --bin blog
//! ```
//!
//! Fake posts for local testing.
//! ```sh
//! cargo run --bin seed -- --count 40
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    middleware::from_fn_with_state,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod memory;
pub mod models;
pub mod object_id;
pub mod password;
pub mod routes;
pub mod state;
pub mod store;
pub mod token;
pub mod utils;
pub mod validate;

use auth::jwt_middleware;
use config::Config;
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(from_fn_with_state(state.clone(), jwt_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).await?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
