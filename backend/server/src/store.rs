//! Persistence seam shared by the Redis store and the in-memory store.
use async_trait::async_trait;
use thiserror::Error;

use crate::{
    models::{Post, User},
    object_id::ObjectId,
};

pub const POSTS_PER_PAGE: usize = 10;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostQuery {
    /// 1-based.
    pub page: usize,
    pub tag: Option<String>,
    pub username: Option<String>,
}

impl PostQuery {
    pub fn page(page: usize) -> Self {
        Self {
            page,
            tag: None,
            username: None,
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.tag.is_some() || self.username.is_some()
    }

    pub fn matches(&self, post: &Post) -> bool {
        let tag_ok = self
            .tag
            .as_ref()
            .is_none_or(|tag| post.tags.iter().any(|t| t == tag));
        let user_ok = self
            .username
            .as_ref()
            .is_none_or(|username| &post.user.username == username);

        tag_ok && user_ok
    }

    /// Saturates, so a page far past the end is simply empty.
    pub fn skip(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(POSTS_PER_PAGE)
    }
}

#[derive(Debug, Default)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// Every post matching the filter, not just this page.
    pub total: usize,
}

impl PostPage {
    pub fn last_page(&self) -> usize {
        self.total.div_ceil(POSTS_PER_PAGE)
    }
}

/// Filters, orders newest first, then cuts out the requested page.
pub fn paginate(posts: impl IntoIterator<Item = Post>, query: &PostQuery) -> PostPage {
    let mut matching: Vec<Post> = posts.into_iter().filter(|p| query.matches(p)).collect();
    matching.sort_by(|a, b| b.id.cmp(&a.id));

    let total = matching.len();
    let posts = matching
        .into_iter()
        .skip(query.skip())
        .take(POSTS_PER_PAGE)
        .collect();

    PostPage { posts, total }
}

#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Returns `false` when the username is already taken.
    async fn insert_user(&self, user: &User) -> Result<bool, StoreError>;

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError>;

    async fn find_post(&self, id: &ObjectId) -> Result<Option<Post>, StoreError>;

    /// Returns `false` when the post no longer exists.
    async fn update_post(&self, post: &Post) -> Result<bool, StoreError>;

    async fn delete_post(&self, id: &ObjectId) -> Result<bool, StoreError>;

    async fn list_posts(&self, query: &PostQuery) -> Result<PostPage, StoreError>;
}
