use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    chatboat::cli::run().await
}
