//! Server configuration.

use std::fmt;
use std::time::Duration;

use chrono_tz::Tz;
use reqwest::Url;

use crate::client::{NexusSettings, DEFAULT_TIMEOUT};
use crate::observability::LogFormat;
use crate::refresh::RefreshPolicy;

pub const DEFAULT_BASE_URL: &str = "https://frc.nexus/api/v1/event";
pub const DEFAULT_PORT: u16 = 3002;

/// A configuration value was present but unusable.
#[derive(thiserror::Error, Debug)]
#[error("{name}: {message}")]
pub struct ConfigError {
    pub name: &'static str,
    pub message: String,
}

impl ConfigError {
    fn new(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub nexus_base_url: Url,
    pub nexus_api_key: Option<String>,
    pub upstream_timeout: Duration,
    /// Exposes upstream payloads fetched with the private key. Off unless
    /// explicitly enabled.
    pub enable_raw_event: bool,
    pub display_timezone: Tz,
    pub refresh: RefreshPolicy,
    pub log_format: LogFormat,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("nexus_base_url", &self.nexus_base_url.as_str())
            .field(
                "nexus_api_key",
                &self.nexus_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("upstream_timeout", &self.upstream_timeout)
            .field("enable_raw_event", &self.enable_raw_event)
            .field("display_timezone", &self.display_timezone)
            .field("refresh", &self.refresh)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Defaults for everything, pointed at the given upstream.
    pub fn new(nexus_base_url: Url) -> Self {
        Self {
            port: DEFAULT_PORT,
            nexus_base_url,
            nexus_api_key: None,
            upstream_timeout: DEFAULT_TIMEOUT,
            enable_raw_event: false,
            display_timezone: chrono_tz::America::Toronto,
            refresh: RefreshPolicy::default(),
            log_format: LogFormat::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { lookup };

        let base_url = env
            .string("NEXUS_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let nexus_base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::new("NEXUS_BASE_URL", format!("invalid url: {e}")))?;
        if nexus_base_url.cannot_be_a_base() {
            return Err(ConfigError::new("NEXUS_BASE_URL", "must be a hierarchical url"));
        }

        let mut config = Self::new(nexus_base_url);
        config.nexus_api_key = env.string("NEXUS_API_KEY");

        if let Some(port) = env.parse::<u16>("PORT")? {
            config.port = port;
        }
        if let Some(secs) = env.parse::<u64>("NEXUS_VIEW_UPSTREAM_TIMEOUT_SECS")? {
            if secs == 0 {
                return Err(ConfigError::new(
                    "NEXUS_VIEW_UPSTREAM_TIMEOUT_SECS",
                    "must be greater than zero",
                ));
            }
            config.upstream_timeout = Duration::from_secs(secs);
        }
        if let Some(enabled) = env.bool("NEXUS_VIEW_ENABLE_RAW_EVENT")? {
            config.enable_raw_event = enabled;
        }
        if let Some(tz) = env.string("NEXUS_VIEW_DISPLAY_TIMEZONE") {
            config.display_timezone = tz.parse::<Tz>().map_err(|e| {
                ConfigError::new("NEXUS_VIEW_DISPLAY_TIMEZONE", e.to_string())
            })?;
        }
        if let Some(secs) = env.parse::<u64>("NEXUS_VIEW_REFRESH_INTERVAL_SECS")? {
            config.refresh.interval = Duration::from_secs(secs.max(1));
        }
        if let Some(backoff) = env.parse::<f64>("NEXUS_VIEW_REFRESH_BACKOFF")? {
            if !backoff.is_finite() || backoff < 1.0 {
                return Err(ConfigError::new(
                    "NEXUS_VIEW_REFRESH_BACKOFF",
                    "must be a finite number >= 1.0",
                ));
            }
            config.refresh.backoff = backoff;
        }
        if let Some(secs) = env.parse::<u64>("NEXUS_VIEW_REFRESH_MAX_SECS")? {
            config.refresh.max_interval = Duration::from_secs(secs);
        }
        config.refresh.max_interval = config.refresh.max_interval.max(config.refresh.interval);
        if let Some(format) = env.parse::<LogFormat>("NEXUS_VIEW_LOG_FORMAT")? {
            config.log_format = format;
        }

        Ok(config)
    }

    pub fn nexus_settings(&self) -> NexusSettings {
        let settings =
            NexusSettings::new(self.nexus_base_url.clone()).timeout(self.upstream_timeout);
        match &self.nexus_api_key {
            Some(key) => settings.api_key(key.clone()),
            None => settings,
        }
    }
}

struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse<T>(&self, name: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: fmt::Display,
    {
        let Some(v) = self.string(name) else {
            return Ok(None);
        };
        v.parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::new(name, format!("invalid value {v:?}: {e}")))
    }

    fn bool(&self, name: &'static str) -> Result<Option<bool>, ConfigError> {
        let Some(v) = self.string(name) else {
            return Ok(None);
        };
        match v.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Ok(Some(true)),
            "false" | "0" | "no" | "n" => Ok(Some(false)),
            _ => Err(ConfigError::new(
                name,
                "must be a boolean (true/false/1/0)",
            )),
        }
    }
}
