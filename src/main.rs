//! Glace blog - bootstrap the content store and report what it holds

use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glace_blog::{config::Config, db, services::ContentServices};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting glace blog...");

    // Initialize database
    let pool = db::create_pool(&config.database)
        .await
        .context("Failed to open the content database")?;
    pool.ping().await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    let pending = db::migrations::pending_count(&pool).await?;
    tracing::debug!("{} pending migration(s)", pending);
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    let services = ContentServices::from_pool(pool.clone());

    let articles = services.articles.list().await?;
    let tags = services.tags.list().await?;
    let catalogues = services.catalogues.list().await?;
    tracing::info!(
        "Content: {} article(s), {} tag(s), {} catalogue(s)",
        articles.len(),
        tags.len(),
        catalogues.len()
    );
    for catalogue in &catalogues {
        let filed = services.articles.list_by_catalogue(catalogue.id).await?;
        tracing::debug!("Catalogue {} holds {} article(s)", catalogue.name, filed.len());
    }

    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}
