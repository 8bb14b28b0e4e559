#[tokio::main]
async fn main() -> anyhow::Result<()> {
    blog::start_server().await
}
