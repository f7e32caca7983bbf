//! Widget service entry point
//!
//! Serves embeddable profile and activity feed widgets backed by the
//! public people API, with optional HTML caching and image mirroring.

use gplus_widgets::config::{ServerConfig, WidgetConfig};
use gplus_widgets::error::{Result, WidgetError};
use gplus_widgets::render::WidgetRenderer;
use gplus_widgets::server::{start_server, ServerState, SharedState};
use gplus_widgets::templates::BuiltinTemplates;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("gplus_widgets=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting widget service...");

    let server_config = ServerConfig::from_env();
    let widget_config = WidgetConfig::load(&server_config.config_path)?;

    info!("Port: {}", server_config.port);
    info!("Files root: {:?}", server_config.files_root);
    info!("Cache: {}", widget_config.cache);
    info!("Defer: {}", widget_config.defer);
    info!("File mirroring: {}", widget_config.files);
    if widget_config.developer_key().is_none() {
        info!("No developer key configured, widgets will show setup instructions");
    }

    let renderer = WidgetRenderer::new(
        widget_config,
        server_config.files_root,
        Arc::new(BuiltinTemplates),
    )?;

    let state: SharedState = Arc::new(ServerState::new(renderer));

    start_server(state, server_config.port)
        .await
        .map_err(|e| WidgetError::Config(format!("Server error: {}", e)))?;

    Ok(())
}
