#[tokio::main]
async fn main() -> anyhow::Result<()> {
    restaurants::start_server().await
}
