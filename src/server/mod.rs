//! HTTP server: routes, error mapping and the HTML adapters.
//!
//! Every request fetches a fresh snapshot; handlers share nothing mutable.

pub mod error;
pub mod render;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::client::NexusClient;
use crate::config::Config;
use render::Presentation;

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: NexusClient,
    pub presentation: Presentation,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: NexusClient::new(config.nexus_settings()),
            presentation: Presentation {
                timezone: config.display_timezone,
                refresh: config.refresh,
            },
        }
    }
}

/// Build the router. The raw upstream passthrough is only mounted when
/// `enable_raw_event` is set.
pub fn router(state: Arc<AppState>, enable_raw_event: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(routes::team_page))
        .route("/embed", get(routes::embed_page))
        .route("/api/data-check", get(routes::data_check))
        .route("/api/health", get(routes::health));
    if enable_raw_event {
        tracing::warn!("raw event passthrough enabled at /api/raw-event");
        router = router.route("/api/raw-event", get(routes::raw_event));
    }
    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &Config) -> std::io::Result<()> {
    let state = Arc::new(AppState::from_config(config));
    let router = router(state, config.enable_raw_event);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, upstream = %config.nexus_base_url, "starting server");
    axum::serve(listener, router).await
}
