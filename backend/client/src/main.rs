use clap::{Parser, Subcommand};
use client::{ApiClient, api::ListQuery, smoke};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "BLOG_URL", default_value = "http://localhost:4000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register, write, read, edit and delete a post, then log out.
    Smoke {
        #[arg(short, long, default_value = "smoketest")]
        username: String,

        #[arg(short, long, default_value = "smoke123")]
        password: String,
    },

    /// List one page of posts.
    List {
        #[arg(short, long)]
        page: Option<u32>,

        #[arg(short, long)]
        tag: Option<String>,

        #[arg(short, long)]
        username: Option<String>,
    },

    /// Print one post in full.
    Read { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let api = ApiClient::new(&args.base_url)?;

    match args.command {
        Command::Smoke { username, password } => smoke::run(&api, &username, &password).await,
        Command::List {
            page,
            tag,
            username,
        } => {
            let list = api
                .list_posts(&ListQuery {
                    page,
                    tag,
                    username,
                })
                .await?;

            for post in &list.posts {
                println!("{}  {}  ({})", post.id, post.title, post.user.username);
            }
            println!("Last page: {}", list.last_page);

            Ok(())
        }
        Command::Read { id } => {
            let post = api.read_post(&id).await?;
            println!("{}\n\n{}\n\n#{}", post.title, post.body, post.tags.join(" #"));

            Ok(())
        }
    }
}
