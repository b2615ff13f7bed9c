#[tokio::main]
async fn main() -> anyhow::Result<()> {
    habesha_admin::bootstrapper::run().await
}
