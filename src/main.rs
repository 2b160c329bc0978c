mod api;
mod config;
mod db;
mod domain;
mod eligibility;
mod error;
mod geo;
mod store;
mod workflow;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use config::ServerConfig;
use error::ServerError;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fra_atlas=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let db_path = config.database_path();
    let db = db::init_database(&db_path).await?;
    tracing::info!("Database initialized at {:?}", db_path);

    let state = Arc::new(AppState::new(db));

    let app = Router::new()
        .nest("/api/v1", api::router())
        .route("/health", get(api::health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(TraceLayer::new_for_http());

    tracing::info!("FRA Atlas starting on http://{}", config.bind);
    tracing::info!("  PUT /api/v1/claims/:id/polygon      - Allocate a drawn boundary");
    tracing::info!("  GET /api/v1/schemes/:scheme/eligible - Eligible pattas as GeoJSON");

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
