use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_recommender::{
    api::{create_router, AppState, RecommendationLimits},
    config::Config,
    db::{self, Cache},
    services::providers::TmdbProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let recommender = db::load_recommender(&config.catalog_path, &config.similarity_path)?;

    let (cache, cache_handle) = match &config.redis_url {
        Some(redis_url) => {
            let client = db::create_redis_client(redis_url)?;
            let (cache, handle) = Cache::new(client);
            tracing::info!("Metadata cache enabled");
            (Some(cache), Some(handle))
        }
        None => (None, None),
    };

    let limits = RecommendationLimits {
        default_count: config.default_recommendations,
        max_count: config.max_recommendations,
    };
    let mut state = AppState::new(recommender).with_limits(limits);

    match config.tmdb_settings() {
        Some(settings) => {
            let provider = TmdbProvider::new(settings, cache)
                .context("Failed to build TMDB client")?;
            state = state.with_metadata(Arc::new(provider));
            tracing::info!("TMDB metadata enrichment enabled");
        }
        None => tracing::warn!("TMDB_API_KEY not set, recommendations will not include details"),
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
