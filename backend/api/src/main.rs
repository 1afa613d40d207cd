//! Revenue-share engine service — entry point.
//!
//! Hosts the in-memory offering engine behind an Axum REST API, journals
//! every accepted operation to SQLite, and runs a background gateway task
//! that submits journaled operations to the external ledger RPC.

mod api;
mod auth;
mod config;
mod errors;
mod events;
mod gateway;
mod journal;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewshare_engine::Engine;

use auth::ChallengeStore;
use config::Config;
use gateway::GatewayState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    // Load config from environment.
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up the SQLite journal and run migrations.
    let pool = journal::init_pool(&config.database_url).await?;

    // HTTP client for ledger submissions.
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let engine = Arc::new(Engine::new());
    let shutdown = CancellationToken::new();

    // ─── Background gateway ───────────────────────────────
    let gateway_state = Arc::new(GatewayState {
        pool: pool.clone(),
        config: config.clone(),
        client,
    });
    let gateway_task = tokio::spawn(gateway::run(gateway_state, shutdown.clone()));

    // ─── REST API ─────────────────────────────────────────
    let api_state = api::ApiState {
        engine,
        pool,
        challenges: Arc::new(ChallengeStore::new(config.challenge_ttl_secs)),
    };

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/offerings", post(api::create_offering))
        .route("/offerings/:id", get(api::get_offering))
        .route("/offerings/:id/purchase", post(api::buy_shares))
        .route("/offerings/:id/deposits", post(api::deposit_revenue))
        .route("/offerings/:id/claims", post(api::claim_revenue))
        .route("/offerings/:id/price", get(api::get_current_price))
        .route("/offerings/:id/status", get(api::get_stream_status))
        .route("/offerings/:id/investments", get(api::get_investments))
        .route("/offerings/:id/revenue", get(api::get_revenue))
        .route("/offerings/:id/events", get(api::get_offering_operations))
        .route("/events", get(api::get_all_operations))
        .route("/auth/challenge", post(api::issue_challenge))
        .route("/auth/verify", post(api::verify_challenge))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api_state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
                shutdown.cancel();
            }
        })
        .await?;

    shutdown.cancel();
    let _ = gateway_task.await;

    Ok(())
}
