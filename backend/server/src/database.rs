//! # Redis
//!
//! Primary database for users and posts.
//!
//! ## Layout
//!
//! - `users`: hash, username -> user JSON. `HSETNX` makes registration
//!   race-free without a separate lock.
//! - `posts`: hash, post id -> post JSON.
//! - `posts:recent`: list of post ids, newest first. Unfiltered listing pages
//!   through it with `LRANGE` and counts with `LLEN`, so the common path never
//!   touches every post.
//!
//! Filtered listing (by tag or author) falls back to `HVALS posts` and filters
//! in process. Fine for a blog-sized dataset.
use std::time::Duration;

use async_trait::async_trait;
use redis::{
    Client, Script,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::info;

use crate::{
    models::{Post, User},
    object_id::ObjectId,
    store::{POSTS_PER_PAGE, PostPage, PostQuery, Store, StoreError, paginate},
};

pub const USERS_KEY: &str = "users";
pub const POSTS_KEY: &str = "posts";
pub const RECENT_POSTS_KEY: &str = "posts:recent";

/// Overwrite only if the field is still there, so an update racing a delete
/// cannot bring the post back.
const REPLACE_IF_EXISTS: &str = r#"
if redis.call('HEXISTS', KEYS[1], ARGV[1]) == 1 then
    redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
    return 1
end
return 0
"#;

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, StoreError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Some(Duration::from_millis(500)));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    info!("Connected to Redis");

    Ok(connection_manager)
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    replace_script: Script,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self {
            connection,
            replace_script: Script::new(REPLACE_IF_EXISTS),
        }
    }

    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(init_redis(redis_url).await?))
    }

    async fn posts_by_ids(&self, ids: &[String]) -> Result<Vec<Post>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut con = self.connection.clone();
        let raw: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(POSTS_KEY)
            .arg(ids)
            .query_async(&mut con)
            .await?;

        decode_all(raw.into_iter().flatten())
    }
}

fn decode_all(raw: impl IntoIterator<Item = String>) -> Result<Vec<Post>, StoreError> {
    raw.into_iter()
        .map(|json| serde_json::from_str(&json).map_err(StoreError::from))
        .collect()
}

#[async_trait]
impl Store for RedisStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut con = self.connection.clone();
        let raw: Option<String> = redis::cmd("HGET")
            .arg(USERS_KEY)
            .arg(username)
            .query_async(&mut con)
            .await?;

        Ok(raw.map(|json| serde_json::from_str(&json)).transpose()?)
    }

    async fn insert_user(&self, user: &User) -> Result<bool, StoreError> {
        let json = serde_json::to_string(user)?;

        let mut con = self.connection.clone();
        let created: bool = redis::cmd("HSETNX")
            .arg(USERS_KEY)
            .arg(&user.username)
            .arg(json)
            .query_async(&mut con)
            .await?;

        Ok(created)
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        let id = post.id.to_string();
        let json = serde_json::to_string(post)?;

        let mut con = self.connection.clone();
        redis::pipe()
            .atomic()
            .cmd("HSET")
            .arg(POSTS_KEY)
            .arg(&id)
            .arg(json)
            .ignore()
            .cmd("LPUSH")
            .arg(RECENT_POSTS_KEY)
            .arg(&id)
            .ignore()
            .query_async::<()>(&mut con)
            .await?;

        Ok(())
    }

    async fn find_post(&self, id: &ObjectId) -> Result<Option<Post>, StoreError> {
        let mut con = self.connection.clone();
        let raw: Option<String> = redis::cmd("HGET")
            .arg(POSTS_KEY)
            .arg(id.to_string())
            .query_async(&mut con)
            .await?;

        Ok(raw.map(|json| serde_json::from_str(&json)).transpose()?)
    }

    async fn update_post(&self, post: &Post) -> Result<bool, StoreError> {
        let json = serde_json::to_string(post)?;

        let mut con = self.connection.clone();
        let replaced: i64 = self
            .replace_script
            .key(POSTS_KEY)
            .arg(post.id.to_string())
            .arg(json)
            .invoke_async(&mut con)
            .await?;

        Ok(replaced == 1)
    }

    async fn delete_post(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let id = id.to_string();

        let mut con = self.connection.clone();
        let (removed, _): (i64, i64) = redis::pipe()
            .atomic()
            .cmd("HDEL")
            .arg(POSTS_KEY)
            .arg(&id)
            .cmd("LREM")
            .arg(RECENT_POSTS_KEY)
            .arg(0)
            .arg(&id)
            .query_async(&mut con)
            .await?;

        Ok(removed > 0)
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<PostPage, StoreError> {
        let mut con = self.connection.clone();

        if query.is_filtered() {
            let raw: Vec<String> = redis::cmd("HVALS")
                .arg(POSTS_KEY)
                .query_async(&mut con)
                .await?;

            return Ok(paginate(decode_all(raw)?, query));
        }

        let total: usize = redis::cmd("LLEN")
            .arg(RECENT_POSTS_KEY)
            .query_async(&mut con)
            .await?;

        let start = query.skip();
        if start >= total {
            return Ok(PostPage {
                posts: Vec::new(),
                total,
            });
        }

        let ids: Vec<String> = redis::cmd("LRANGE")
            .arg(RECENT_POSTS_KEY)
            .arg(start)
            .arg(start + POSTS_PER_PAGE - 1)
            .query_async(&mut con)
            .await?;

        let posts = self.posts_by_ids(&ids).await?;

        Ok(PostPage { posts, total })
    }
}
