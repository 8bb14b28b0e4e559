//! Typed access to the blog REST API.
//!
//! The server keeps login state in an `HttpOnly` cookie, so the underlying
//! `reqwest::Client` runs with a cookie store: after `register` or `login`
//! every later call on the same [`ApiClient`] is authenticated.
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::forms::Credentials;

const LAST_PAGE: &str = "last-page";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server answered {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub published_date: String,
    pub user: User,
}

#[derive(Clone, Debug, Serialize)]
pub struct WritePost {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdatePost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PostList {
    pub posts: Vec<Post>,
    pub last_page: u32,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<User, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(credentials)
            .send()
            .await?;

        json(response).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;

        json(response).await
    }

    pub async fn check(&self) -> Result<User, ClientError> {
        let response = self.http.get(self.url("/auth/check")).send().await?;
        json(response).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.http.post(self.url("/auth/logout")).send().await?;
        success(response).await.map(|_| ())
    }

    pub async fn list_posts(&self, query: &ListQuery) -> Result<PostList, ClientError> {
        let response = self
            .http
            .get(self.url("/posts"))
            .query(query)
            .send()
            .await?;
        let response = success(response).await?;

        let last_page = response
            .headers()
            .get(LAST_PAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        let posts = response.json().await?;

        Ok(PostList { posts, last_page })
    }

    pub async fn read_post(&self, id: &str) -> Result<Post, ClientError> {
        let response = self.http.get(self.url(&format!("/posts/{id}"))).send().await?;
        json(response).await
    }

    pub async fn write_post(&self, post: &WritePost) -> Result<Post, ClientError> {
        let response = self.http.post(self.url("/posts")).json(post).send().await?;
        json(response).await
    }

    pub async fn update_post(&self, id: &str, update: &UpdatePost) -> Result<Post, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/posts/{id}")))
            .json(update)
            .send()
            .await?;

        json(response).await
    }

    pub async fn remove_post(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/posts/{id}")))
            .send()
            .await?;

        success(response).await.map(|_| ())
    }
}

async fn success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}

async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(success(response).await?.json().await?)
}
