#[tokio::main]
async fn main() -> anyhow::Result<()> {
    deckgen_backend::run().await
}
