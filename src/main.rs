//! rpg-search: HTTP API over RPG collections stored in Elasticsearch
//!
//! This is the main entry point for the application.

use anyhow::{bail, Result};
use rpg_search::{
    config::Settings,
    network::{ElasticClient, SearchBackend},
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so debug mode can raise the level
    let (settings, source) = load_settings()?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting rpg-search v{}", rpg_search::VERSION);
    info!("Loaded configuration from {}", source);
    settings.validate()?;

    // Initialize the engine client
    let client = ElasticClient::with_settings(&settings.elasticsearch)?;
    if !client.ping().await.unwrap_or(false) {
        bail!(
            "Elasticsearch is not reachable at {}",
            settings.elasticsearch.url
        );
    }
    info!("Connected to Elasticsearch at {}", client.base_url());

    for collection in rpg_search::Collection::ALL {
        info!(
            "Collection {} -> index {}",
            collection,
            settings.collections.index_for(collection)
        );
    }

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    // Create application state and router
    let state = AppState::new(settings, Arc::new(client));
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load settings from file or use defaults, returning where they came from
fn load_settings() -> Result<(Settings, String)> {
    // Check environment variable first
    if let Ok(path) = std::env::var("RPG_SEARCH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok((settings, path.display().to_string()));
        }
    }

    let paths = [
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/rpg-search/settings.yml"),
        dirs::config_dir()
            .map(|p| p.join("rpg-search/settings.yml"))
            .unwrap_or_default(),
    ];

    // Try each default path
    for path in paths.iter() {
        if path.exists() {
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok((settings, path.display().to_string()));
        }
    }

    // Use defaults
    let mut settings = Settings::default();
    settings.merge_env();
    Ok((settings, "defaults".to_string()))
}
