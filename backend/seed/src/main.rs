use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fill the blog database with fake posts")]
struct Args {
    /// Number of posts to create.
    #[arg(short, long, default_value_t = 40)]
    count: u32,

    /// Author of the fake posts; created if missing.
    #[arg(short, long, default_value = "tester")]
    username: String,

    #[arg(short, long, default_value = "tester123")]
    password: String,

    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    #[arg(long, env = "PASSWORD_COST", default_value_t = 15, value_parser = password_cost)]
    password_cost: u8,
}

fn password_cost(raw: &str) -> Result<u8, String> {
    let cost: u8 = raw.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    blog::password::check_cost(cost).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let store = blog::database::RedisStore::connect(&args.redis_url).await?;
    let hasher = blog::password::PasswordHasher::new(args.password_cost);

    let author = seed::ensure_author(&store, &hasher, &args.username, &args.password).await?;
    seed::create_fake_posts(&store, &author, args.count).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_cost_flag() {
        let args = Args::try_parse_from(["seed", "--password-cost", "4"]).unwrap();
        assert_eq!(args.password_cost, 4);

        assert!(Args::try_parse_from(["seed", "--password-cost", "64"]).is_err());
        assert!(Args::try_parse_from(["seed", "--password-cost", "nope"]).is_err());
    }
}
