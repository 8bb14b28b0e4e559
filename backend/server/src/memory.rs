//! In-process store for tests and running without Redis.
use std::collections::{BTreeMap, HashMap, hash_map::Entry};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    models::{Post, User},
    object_id::ObjectId,
    store::{PostPage, PostQuery, Store, StoreError, paginate},
};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    posts: RwLock<BTreeMap<ObjectId, Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<bool, StoreError> {
        match self.users.write().await.entry(user.username.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(user.clone());
                Ok(true)
            }
            Entry::Occupied(_) => Ok(false),
        }
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_post(&self, id: &ObjectId) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn update_post(&self, post: &Post) -> Result<bool, StoreError> {
        match self.posts.write().await.get_mut(&post.id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_post(&self, id: &ObjectId) -> Result<bool, StoreError> {
        Ok(self.posts.write().await.remove(id).is_some())
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<PostPage, StoreError> {
        let posts = self.posts.read().await;
        Ok(paginate(posts.values().cloned(), query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PublicUser;

    fn user(name: &str) -> User {
        User {
            id: ObjectId::new(),
            username: name.to_string(),
            hashed_password: String::new(),
        }
    }

    fn post(title: &str) -> Post {
        Post::new(
            title.to_string(),
            String::new(),
            vec![],
            PublicUser {
                id: ObjectId::new(),
                username: "author".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        assert!(store.insert_user(&user("alice")).await.unwrap());
        assert!(!store.insert_user(&user("alice")).await.unwrap());
        assert!(store.find_user("alice").await.unwrap().is_some());
        assert!(store.find_user("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let store = MemoryStore::new();
        assert!(!store.update_post(&post("ghost")).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::new();
        let mut p = post("first");
        store.insert_post(&p).await.unwrap();

        p.title = "changed".to_string();
        assert!(store.update_post(&p).await.unwrap());
        let found = store.find_post(&p.id).await.unwrap().unwrap();
        assert_eq!(found.title, "changed");

        assert!(store.delete_post(&p.id).await.unwrap());
        assert!(!store.delete_post(&p.id).await.unwrap());
        assert!(store.find_post(&p.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_counts_all() {
        let store = MemoryStore::new();
        for i in 0..12 {
            store.insert_post(&post(&format!("post {i}"))).await.unwrap();
        }

        let page = store.list_posts(&PostQuery::page(2)).await.unwrap();
        assert_eq!(page.total, 12);
        assert_eq!(page.posts.len(), 2);
    }
}
