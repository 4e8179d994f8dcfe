//! Logging setup.

use std::sync::Once;

use strum_macros::EnumString;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable multi-line output.
    #[default]
    Pretty,
}

/// Filter used when `RUST_LOG` is unset: this crate and request traces at
/// `info`, dependencies at `warn`.
pub const DEFAULT_FILTER: &str = "warn,nexus_match_view=info,tower_http=info";

/// Install the global tracing subscriber. Only the first call has any effect,
/// and an already-installed subscriber is left in place.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let registry = tracing_subscriber::registry().with(env_filter);

        // Json lines carry the upstream span (event key, team) on every record.
        let installed = match format {
            LogFormat::Json => registry
                .with(fmt::layer().json().with_current_span(true).with_span_list(false))
                .try_init(),
            LogFormat::Pretty => registry
                .with(fmt::layer().pretty().with_target(false))
                .try_init(),
        };
        if installed.is_err() {
            tracing::debug!(%format, "tracing subscriber already installed");
        }
    });
}
