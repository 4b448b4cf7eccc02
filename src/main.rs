//! Conversational Banking Fulfillment Service - Main Application Entry Point
//!
//! This is the webhook fulfillment layer behind a Dialogflow CX banking
//! assistant. Each endpoint validates the customer ID, runs a battery of
//! analytical SQL statements concurrently, applies the account health
//! thresholds, and asks a hosted generative model to phrase the figures as
//! the reply returned to the dialogue platform.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Model**: hosted generative language API, consumed as an SSE stream
//! - **Maps**: distance matrix API for dealer ranking
//! - **Format**: Dialogflow CX webhook JSON in, fulfillment envelope out
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build the outbound API clients
//! 5. Build HTTP router and start server on configured port

mod config;
mod db;
mod dialogflow;
mod error;
mod genai;
mod handlers;
mod maps;
mod models;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Build the shared state: pool plus model and maps clients
    let state = AppState::new(pool, &config)?;

    let app = Router::new()
        // Dialogue webhook routes, one per fulfillment
        .route(
            "/webhooks/validate-customer",
            post(handlers::validate_customer::validate_customer),
        )
        .route(
            "/webhooks/account-health",
            post(handlers::account_health::account_health),
        )
        .route(
            "/webhooks/travel-card",
            post(handlers::travel_card::travel_card),
        )
        .route(
            "/webhooks/card-issuance",
            post(handlers::card_issuance::card_issuance),
        )
        .route(
            "/webhooks/dealer-locator",
            post(handlers::dealer_locator::dealer_locator),
        )
        // Liveness endpoint
        .route("/health", get(handlers::health::health_check))
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share state with all handlers via State extraction
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
