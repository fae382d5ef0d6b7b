pub mod auth;
pub mod booking;
pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod services;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use booking::postgres::{PgBookingLedger, PgSeatStore};
use booking::BookingOrchestrator;

// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub redis: redis_client::RedisClient,
    pub cache: cache::CacheService,
    pub config: config::Config,
    pub booking: BookingOrchestrator,
}

impl AppState {
    /// Connects to Postgres and Redis, applies migrations and wires the
    /// booking core to the database.
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::connect(&config.database).await?;
        db.run_migrations().await?;
        info!("Database connected");

        let redis = redis_client::RedisClient::connect(&config.redis).await?;
        info!("Redis connected");

        let cache = cache::CacheService::new(redis.clone(), config.cache.ttl_seconds);
        let booking = BookingOrchestrator::new(
            Arc::new(PgSeatStore::new(db.clone())),
            Arc::new(PgBookingLedger::new(db.clone())),
        );

        Ok(Arc::new(Self {
            db,
            redis,
            cache,
            config,
            booking,
        }))
    }
}

/// Full HTTP application: service routes plus the versioned API.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Cinema Tickets API v1.0" }))
        .route("/health", get(health))
        .nest("/api/v1", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = state.db.ping().await;
    let redis = state.redis.ping().await;

    if let Err(e) = &database {
        error!("Health check: database unavailable: {}", e);
    }
    if let Err(e) = &redis {
        error!("Health check: redis unavailable: {}", e);
    }

    let status = if database.is_ok() && redis.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "database": if database.is_ok() { "ok" } else { "down" },
            "redis": if redis.is_ok() { "ok" } else { "down" },
        })),
    )
}
