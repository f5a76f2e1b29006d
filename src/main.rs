use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    avrpush::cli::run().await
}
