use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use waypoint_api::{
    config::Config,
    db::{
        create_pool, create_redis_client, run_migrations, Cache, CacheWriterHandle,
        CachedPlaceStore, PgPlaceStore, PgTrustEdgeStore, PlaceReviewStore,
    },
    routes::{create_router, AppState},
    services::RankingConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("waypoint_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    let edge_store = Arc::new(PgTrustEdgeStore::new(pool.clone()));
    let place_store = PgPlaceStore::new(pool);

    let (place_store, cache_writer): (Arc<dyn PlaceReviewStore>, Option<CacheWriterHandle>) =
        if config.candidate_cache_ttl_secs > 0 {
            let client = create_redis_client(&config.redis_url)?;
            let (cache, writer) = Cache::new(client);
            let cached = CachedPlaceStore::new(place_store, cache, config.candidate_cache_ttl_secs);
            (Arc::new(cached), Some(writer))
        } else {
            tracing::info!("Candidate cache disabled");
            (Arc::new(place_store), None)
        };

    let state = AppState::new(
        edge_store,
        place_store,
        RankingConfig::default(),
        config.store_timeout(),
    )?;
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = cache_writer {
        writer.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
