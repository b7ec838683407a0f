// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::report_service::ReportService;
use crate::application::revenue_queries::RevenueQueries;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::snowflake_warehouse::SnowflakeSession;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    export_top5_csv, health_check, index, monthly_top_restaurants, year_sections,
};
use crate::presentation::page::YEAR_SECTIONS_PATH;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Open the warehouse session (infrastructure layer)
    let session = Arc::new(SnowflakeSession::open(&config.warehouse)?);

    // Create services (application layer)
    let queries = RevenueQueries::new(session, config.views)?;
    let report_service = ReportService::new(queries, config.report.title);

    // Create application state
    let state = Arc::new(AppState { report_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/", get(index))
        .route(YEAR_SECTIONS_PATH, get(year_sections))
        .route("/exports/top5_restaurants.csv", get(export_top5_csv))
        .route("/api/restaurants/monthly", get(monthly_top_restaurants))
        .route("/healthz", get(health_check))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind_addr.parse()?;
    tracing::info!("Starting revenue dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
