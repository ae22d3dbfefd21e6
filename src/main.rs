mod aggregator;
mod config;
mod enrich;
mod fetcher;
mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newswire=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path =
        std::env::var("NEWSWIRE_CONFIG").unwrap_or_else(|_| "sources.toml".to_string());
    let config = Config::load_or_default(&config_path)?;
    info!("Serving {} news sources", config.sources.len());

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.port);

    let cors = routes::cors_layer(&config.allowed_origins)?;

    // Create app state
    let config = Arc::new(config);
    let state = Arc::new(AppState {
        config: config.clone(),
        aggregator: Aggregator::new(config),
    });

    // Build router
    let app = Router::new()
        .route("/", get(routes::root))
        .route("/news", get(routes::news))
        .route("/news/today", get(routes::news_today))
        .route("/docs", get(routes::docs))
        .route("/health", get(routes::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server starting on http://localhost:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
