// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::source_service::SourceService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::csv_repository::CsvSampleRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dashboard, get_trend, health_check, list_sources};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config().context("Failed to load configuration")?;
    let sources = config.sample_sources()?;
    tracing::info!("Configured {} sample sources", sources.len());

    // Create repository (infrastructure layer)
    let repository = Arc::new(CsvSampleRepository::new(sources));

    // Create services (application layer)
    let source_service = SourceService::new(repository.clone());
    let dashboard_service = DashboardService::new(repository.clone(), config.trend);

    // Create application state
    let state = Arc::new(AppState {
        source_service,
        dashboard_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/sources", get(list_sources))
        .route("/dashboards/:id", get(get_dashboard))
        .route("/trends/:id", get(get_trend))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_addr))?;
    tracing::info!("Starting weight-tracker service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
