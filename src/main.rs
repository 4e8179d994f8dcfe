//! `nexus-match-view` binary entrypoint.
//!
//! Loads configuration from environment variables and starts the HTTP server.

use anyhow::{Context, Result};

use nexus_match_view::config::Config;
use nexus_match_view::observability::init_logging;
use nexus_match_view::server;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    init_logging(config.log_format);

    if config.nexus_api_key.is_none() {
        tracing::warn!("NEXUS_API_KEY not set; upstream requests will be unauthenticated");
    }
    tracing::debug!(?config, "loaded configuration");

    server::serve(&config).await.context("server error")?;
    Ok(())
}
