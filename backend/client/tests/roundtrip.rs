use std::sync::Arc;

use blog::{app, config::Config, memory::MemoryStore, state::AppState};
use client::{
    ApiClient,
    api::{ListQuery, UpdatePost, WritePost},
    forms::Credentials,
    smoke,
};
use reqwest::StatusCode;
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let config = Config {
        port: 0,
        redis_url: String::new(),
        jwt_secret: "test-secret".to_string(),
        password_cost: 4,
        secure_cookie: false,
    };
    let state = AppState::with_store(config, Arc::new(MemoryStore::new()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });

    format!("http://{address}")
}

fn credentials(username: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: "mypass123".to_string(),
    }
}

#[tokio::test]
async fn test_session_cookie_carries_over() {
    let base = spawn_server().await;
    let api = ApiClient::new(&base).unwrap();

    let err = api.check().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

    let user = api.register(&credentials("kdcdev")).await.unwrap();
    assert_eq!(api.check().await.unwrap(), user);

    api.logout().await.unwrap();
    let err = api.check().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

    let again = api.login(&credentials("kdcdev")).await.unwrap();
    assert_eq!(again, user);
}

#[tokio::test]
async fn test_post_lifecycle() {
    let base = spawn_server().await;
    let api = ApiClient::new(&base).unwrap();
    api.register(&credentials("kdcdev")).await.unwrap();

    let post = api
        .write_post(&WritePost {
            title: "title".to_string(),
            body: "b".repeat(250),
            tags: vec!["rust".to_string()],
        })
        .await
        .unwrap();

    let list = api.list_posts(&ListQuery::default()).await.unwrap();
    assert_eq!(list.last_page, 1);
    assert_eq!(list.posts.len(), 1);
    assert!(list.posts[0].body.ends_with("..."));

    let updated = api
        .update_post(
            &post.id,
            &UpdatePost {
                tags: Some(vec!["go".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.tags, vec!["go".to_string()]);
    assert_eq!(updated.title, "title");

    let tagged = api
        .list_posts(&ListQuery {
            tag: Some("rust".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(tagged.posts.is_empty());

    api.remove_post(&post.id).await.unwrap();
    let err = api.read_post(&post.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_other_users_cannot_edit() {
    let base = spawn_server().await;
    let owner = ApiClient::new(&base).unwrap();
    let other = ApiClient::new(&base).unwrap();

    owner.register(&credentials("owner")).await.unwrap();
    other.register(&credentials("other")).await.unwrap();

    let post = owner
        .write_post(&WritePost {
            title: "mine".to_string(),
            body: "body".to_string(),
            tags: vec![],
        })
        .await
        .unwrap();

    let err = other.remove_post(&post.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn test_smoke_run_is_repeatable() {
    let base = spawn_server().await;

    let fresh = ApiClient::new(&base).unwrap();
    smoke::run(&fresh, "smoketest", "smoke123").await.unwrap();

    // second run hits 409 on register and relies on login alone
    let returning = ApiClient::new(&base).unwrap();
    smoke::run(&returning, "smoketest", "smoke123").await.unwrap();

    let list = fresh.list_posts(&ListQuery::default()).await.unwrap();
    assert!(list.posts.is_empty());
}

#[tokio::test]
async fn test_smoke_run_fails_on_wrong_password() {
    let base = spawn_server().await;
    let api = ApiClient::new(&base).unwrap();
    api.register(&credentials("smoketest")).await.unwrap();
    api.logout().await.unwrap();

    let other = ApiClient::new(&base).unwrap();
    assert!(smoke::run(&other, "smoketest", "wrong123").await.is_err());
}
