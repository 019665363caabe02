//! Relay server command handler.

use anyhow::Result;
use std::time::Duration;

use crate::completion::DEFAULT_TIMEOUT;
use crate::config::{Backend, ConfigManager, ResolveOptions, resolve_provider};
use crate::server;

pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub cors_origins: Vec<String>,
}

/// Runs the chat relay in front of the configured provider.
pub async fn run_serve(options: ServeOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default()?;

    let resolve = ResolveOptions {
        provider: options.provider,
        model: options.model,
        ..ResolveOptions::default()
    };
    let provider = resolve_provider(&resolve, &config_file)?;

    let timeout = config_file
        .charla
        .request_timeout_secs
        .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

    tracing::info!(
        provider = %provider.name,
        model = %provider.model,
        "Relaying to {}",
        provider.endpoint
    );
    let origins = if options.cors_origins.is_empty() {
        config_file.charla.cors_origins.unwrap_or_default()
    } else {
        options.cors_origins
    };
    let cors = server::cors_layer(&origins)?;
    tracing::debug!(origins = ?origins, "CORS origins");

    let upstream = Backend::Provider(provider).connect(timeout);

    server::bind_and_serve(&options.host, options.port, upstream, cors).await
}
