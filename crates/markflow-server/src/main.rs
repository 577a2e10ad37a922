//! Markflow - marketing content hub entry point

use anyhow::Result;
use markflow_api::{create_router, AppState};
use markflow_common::config::Config;
use markflow_core::analyzer::PageAnalyzer;
use markflow_core::synth::{
    HttpImageGenerator, HttpTextGenerator, ImageGenerator, Synthesizer, TextGenerator,
};
use markflow_storage::cache::LocalTemplateCache;
use markflow_storage::db::DatabasePool;
use markflow_storage::repository::TemplateRepository;
use markflow_storage::store::TemplateStore;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config);

    info!("Starting Markflow server...");

    // Initialize database; a connection failure degrades to cache-only
    // persistence instead of refusing to start
    let db_pool = match DatabasePool::new(&config.database).await {
        Ok(pool) => {
            pool.migrate().await?;
            info!("Database connection established, migrations applied");
            Some(pool)
        }
        Err(e) => {
            warn!(error = %e, "Database unavailable; running cache-only");
            None
        }
    };

    // Initialize the local template cache
    let cache = LocalTemplateCache::new(&config.cache)?;

    let store = match &db_pool {
        Some(pool) => TemplateStore::new(TemplateRepository::new(pool.pool().clone()), cache),
        None => TemplateStore::cache_only(cache),
    };

    // Initialize generation clients
    let generator: Arc<dyn TextGenerator> =
        Arc::new(HttpTextGenerator::new(config.generation.clone())?);

    let images: Option<Arc<dyn ImageGenerator>> = match &config.images {
        Some(image_config) => {
            info!("Image generation enabled");
            Some(Arc::new(HttpImageGenerator::new(image_config.clone())?))
        }
        None => None,
    };

    let synthesizer = Arc::new(Synthesizer::new(
        generator,
        images,
        store.clone(),
        config.brands.clone(),
    ));

    // Initialize the page analyzer
    let analyzer = PageAnalyzer::new(&config.analyzer)?;

    // Start the API server
    let app = create_router(AppState {
        store,
        synthesizer,
        analyzer,
        db_pool,
    });

    let bind = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Markflow API listening on {}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Markflow server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},markflow=debug", config.logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_level(true))
            .init();
    }
}
