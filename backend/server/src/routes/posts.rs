use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, Query, State},
    http::{HeaderName, StatusCode, request::Parts},
    routing::get,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::AuthUser,
    error::AppError,
    models::{Post, PublicUser},
    object_id::ObjectId,
    state::AppState,
    store::PostQuery,
    utils::{parse_page, preview},
    validate::{UpdatePostRequest, ValidJson, WritePostRequest},
};

pub const LAST_PAGE: HeaderName = HeaderName::from_static("last-page");

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list).post(write))
        .route("/{id}", get(read).patch(update).delete(remove))
}

/// `:id` path segment; anything that is not a well-formed object id is a 400
/// before any lookup happens.
pub struct PostId(pub ObjectId);

impl<S: Send + Sync> FromRequestParts<S> for PostId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::InvalidId)?;

        raw.parse().map(Self).map_err(|_| AppError::InvalidId)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub tag: Option<String>,
    pub username: Option<String>,
}

impl ListParams {
    fn into_query(self) -> Result<PostQuery, AppError> {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());

        Ok(PostQuery {
            page: parse_page(self.page.as_deref())?,
            tag: non_empty(self.tag),
            username: non_empty(self.username),
        })
    }
}

async fn owned_post(state: &AppState, id: &ObjectId, user: &AuthUser) -> Result<Post, AppError> {
    let post = state.store.find_post(id).await?.ok_or(AppError::NotFound)?;

    if !post.is_owned_by(&user.id) {
        return Err(AppError::Forbidden);
    }

    Ok(post)
}

/// GET /api/posts?page=&tag=&username=
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<([(HeaderName, String); 1], Json<Vec<Post>>), AppError> {
    let query = params.into_query()?;
    let page = state.store.list_posts(&query).await?;

    let last_page = page.last_page();
    let posts = page.posts.into_iter().map(preview).collect();

    Ok(([(LAST_PAGE, last_page.to_string())], Json(posts)))
}

/// POST /api/posts
pub async fn write(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidJson(payload): ValidJson<WritePostRequest>,
) -> Result<Json<Post>, AppError> {
    let author = PublicUser {
        id: user.id,
        username: user.username,
    };
    let post = Post::new(payload.title, payload.body, payload.tags, author);

    state.store.insert_post(&post).await?;
    info!("{} wrote post {}", post.user.username, post.id);

    Ok(Json(post))
}

/// GET /api/posts/{id}
pub async fn read(
    State(state): State<Arc<AppState>>,
    PostId(id): PostId,
) -> Result<Json<Post>, AppError> {
    let post = state.store.find_post(&id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(post))
}

/// PATCH /api/posts/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    PostId(id): PostId,
    user: AuthUser,
    ValidJson(payload): ValidJson<UpdatePostRequest>,
) -> Result<Json<Post>, AppError> {
    let mut post = owned_post(&state, &id, &user).await?;

    if let Some(title) = payload.title {
        post.title = title;
    }
    if let Some(body) = payload.body {
        post.body = body;
    }
    if let Some(tags) = payload.tags {
        post.tags = tags;
    }

    if !state.store.update_post(&post).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(post))
}

/// DELETE /api/posts/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    PostId(id): PostId,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    owned_post(&state, &id, &user).await?;
    state.store.delete_post(&id).await?;

    info!("{} removed post {id}", user.username);

    Ok(StatusCode::NO_CONTENT)
}
