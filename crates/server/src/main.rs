//! petwell server entry point.
//!
//! Boots the HTTP API: loads configuration, hydrates the clinic directory,
//! starts the session sweeper and background enrichment, and serves the
//! axum routes until ctrl-c. Logging goes to stderr.

use std::sync::Arc;

use anyhow::Result;
use petwell_client::{AssistantClient, PlacesClient, PlacesConfig};
use petwell_core::{AppConfig, ClinicStore, DirectoryCache, SessionStore};
use petwell_server::{routes, state::AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(bind_addr = %config.bind_addr, "starting petwell server");

    let store = ClinicStore::new(&config.clinics_csv);
    let directory = Arc::new(DirectoryCache::load(store, config.maps_api_key.clone()));
    tracing::info!(clinics = directory.clinic_count().await, "clinic directory loaded");

    let sessions = SessionStore::new(config.session_ttl());
    sessions.start_sweeper(config.sweep_interval()).await;

    let assistant = AssistantClient::new(config.assistant_url.clone(), config.timeout())?;

    let places = match &config.maps_api_key {
        Some(key) => {
            let places = PlacesClient::new(PlacesConfig {
                api_key: key.clone(),
                timeout: config.timeout(),
                user_agent: config.user_agent.clone(),
                ..Default::default()
            })?;
            directory
                .spawn_enrichment(Arc::new(places.clone()), config.enrich_concurrency)
                .await;
            Some(places)
        }
        None => {
            tracing::info!("no places API key; clinic enrichment and live vet search disabled");
            None
        }
    };

    let state = AppState::new(sessions, directory, assistant, places);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, routes::app(Arc::clone(&state)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");
    state.sessions.stop_sweeper().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
