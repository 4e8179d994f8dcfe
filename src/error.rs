use std::num::ParseIntError;
use std::time::Duration;

/// All errors that can occur while fetching an event or deriving views from it.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// HTTP request to the upstream service failed (network, DNS, TLS, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// The upstream service did not answer within the configured timeout.
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// Upstream returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read or decode the upstream response body.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// Upstream has no data for the requested event.
    #[error("event not found: {event_key}")]
    EventNotFound { event_key: String },

    /// A required request parameter was absent or empty.
    #[error("missing required parameter: {name}")]
    MissingParameter { name: &'static str },

    /// A match label did not have the `<Phase> <Number>` shape.
    #[error("malformed match label {label:?}: {reason}")]
    MalformedLabel { label: String, reason: LabelReason },

    /// Catch-all for faults while inferring statuses or fingerprinting.
    #[error("internal computation failure: {0}")]
    Computation(String),
}

/// Why a match label failed to parse.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelReason {
    #[error("no space separating phase and number")]
    MissingSeparator,
    #[error("empty phase")]
    EmptyPhase,
    #[error("invalid match number: {0}")]
    InvalidNumber(#[from] ParseIntError),
}

/// Coarse classification of [`Error`], used to pick a client-facing response.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    UpstreamUnavailable,
    EventNotFound,
    MissingParameter,
    MalformedLabel,
    InternalComputationFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http { .. }
            | Error::Timeout { .. }
            | Error::UnexpectedStatus { .. }
            | Error::ResponseBody { .. } => ErrorKind::UpstreamUnavailable,
            Error::EventNotFound { .. } => ErrorKind::EventNotFound,
            Error::MissingParameter { .. } => ErrorKind::MissingParameter,
            Error::MalformedLabel { .. } => ErrorKind::MalformedLabel,
            Error::Computation(_) => ErrorKind::InternalComputationFailure,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Computation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
