use reqwest::StatusCode;
use tracing::info;

use crate::{
    ApiClient,
    api::{ListQuery, UpdatePost, WritePost},
    forms::{AuthForms, Field, FormKind, change_field, reduce},
};

/// Walks every endpoint once. Safe to repeat: an existing account is reused.
pub async fn run(api: &ApiClient, username: &str, password: &str) -> anyhow::Result<()> {
    let mut forms = AuthForms::default();
    for action in [
        change_field(FormKind::Register, Field::Username, username),
        change_field(FormKind::Register, Field::Password, password),
        change_field(FormKind::Register, Field::PasswordConfirm, password),
    ] {
        forms = reduce(&forms, action);
    }
    let credentials = forms.register.credentials()?;

    match api.register(&credentials).await {
        Ok(user) => info!("Registered {}", user.username),
        Err(e) if e.status() == Some(StatusCode::CONFLICT) => {
            info!("{username} already exists");
        }
        Err(e) => return Err(e.into()),
    }

    api.login(&credentials).await?;

    let me = api.check().await?;
    println!("Logged in as {} ({})", me.username, me.id);

    let post = api
        .write_post(&WritePost {
            title: "Smoke test".to_string(),
            body: "Written by the client smoke test.".to_string(),
            tags: vec!["smoke".to_string()],
        })
        .await?;
    println!("Wrote {}", post.id);

    let list = api
        .list_posts(&ListQuery {
            username: Some(me.username.clone()),
            ..Default::default()
        })
        .await?;
    println!("{} has {} post(s) on page 1", me.username, list.posts.len());

    let read = api.read_post(&post.id).await?;
    println!("Read back \"{}\"", read.title);

    let updated = api
        .update_post(
            &post.id,
            &UpdatePost {
                title: Some("Smoke test (edited)".to_string()),
                ..Default::default()
            },
        )
        .await?;
    println!("Updated title to \"{}\"", updated.title);

    api.remove_post(&post.id).await?;
    println!("Removed {}", post.id);

    api.logout().await?;
    println!("Logged out");

    Ok(())
}
