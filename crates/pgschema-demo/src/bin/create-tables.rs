//! Creates every demo table in the database named by `DATABASE_URL`.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

    let registry = pgschema_demo::schema::registry()?;
    let pool = pgschema::create_pool(&database_url)?;
    let client = pgschema::checkout(&pool).await?;

    registry.create_all(&client).await?;
    tracing::info!(tables = registry.len(), "tables created");
    Ok(())
}
