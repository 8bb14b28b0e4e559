use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::object_id::ObjectId;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    #[serde(rename = "hashedPassword")]
    pub hashed_password: String,
}

impl User {
    /// What clients get to see; never carries the password hash.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub published_date: DateTime<Utc>,
    pub user: PublicUser,
}

impl Post {
    pub fn new(title: String, body: String, tags: Vec<String>, user: PublicUser) -> Self {
        Self {
            id: ObjectId::new(),
            title,
            body,
            tags,
            published_date: Utc::now(),
            user,
        }
    }

    pub fn is_owned_by(&self, user_id: &ObjectId) -> bool {
        &self.user.id == user_id
    }
}
