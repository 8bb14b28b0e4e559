//! # Fake Data
//!
//! Fills the blog database with throwaway posts so listing, paging and the
//! body preview can be tried without writing forty posts by hand.
//!
//! ## Flow
//! 1. Look up the author. If missing, register it with the given password
//!    using the same scrypt encoding as the server.
//!
//! 2. Generate `count` posts with lorem-ipsum titles, multi-paragraph bodies
//!    (always longer than the 200 character preview) and one or two tags.
//!
//! 3. Write them through the regular [`Store`] so the Redis recent-posts list
//!    stays consistent with the posts hash.
//!
//! ## Notes
//! - Running it twice adds another batch; nothing is deduplicated.
//! - Posts made in the same second still list in creation order since the
//!   object id counter breaks ties.
use anyhow::bail;
use blog::{
    models::{Post, PublicUser, User},
    object_id::ObjectId,
    password::PasswordHasher,
    store::Store,
};
use indicatif::{ProgressBar, ProgressStyle};

pub mod utils;

pub async fn ensure_author<S: Store + ?Sized>(
    store: &S,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> anyhow::Result<PublicUser> {
    if let Some(user) = store.find_user(username).await? {
        println!("Using existing author: {username}");
        return Ok(user.to_public());
    }

    let user = User {
        id: ObjectId::new(),
        username: username.to_string(),
        hashed_password: hasher.hash(password)?,
    };

    if !store.insert_user(&user).await? {
        bail!("{username} was registered concurrently, rerun to use it");
    }

    println!("Created author: {username}");
    Ok(user.to_public())
}

fn fake_post(author: &PublicUser, index: u32) -> Post {
    let mut rng = rand::rng();

    Post::new(
        format!("Post #{index}: {}", utils::sentence(&mut rng, 3)),
        utils::body(&mut rng),
        utils::tags(&mut rng),
        author.clone(),
    )
}

pub async fn create_fake_posts<S: Store + ?Sized>(
    store: &S,
    author: &PublicUser,
    count: u32,
) -> anyhow::Result<()> {
    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    for index in 1..=count {
        let post = fake_post(author, index);
        pb.set_message(format!("Writing {}", post.id));

        store.insert_post(&post).await?;

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    println!("Total New Posts: {count}");

    Ok(())
}
