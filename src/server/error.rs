//! HTTP mapping for crate errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::{Error, ErrorKind};

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable message, safe for clients.
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status,
            code: kind.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let kind = err.kind();
        match kind {
            ErrorKind::MissingParameter => {
                Self::new(StatusCode::BAD_REQUEST, kind, err.to_string())
            }
            ErrorKind::EventNotFound => Self::new(StatusCode::NOT_FOUND, kind, "Event not found"),
            ErrorKind::UpstreamUnavailable => {
                error!(error = %err, "upstream request failed");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    kind,
                    "Failed to fetch event data from upstream",
                )
            }
            ErrorKind::MalformedLabel | ErrorKind::InternalComputationFailure => {
                error!(error = %err, kind = %kind, "failed to process event data");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    kind,
                    "Failed to generate match data",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiErrorBody {
                code: self.code.to_string(),
                message: self.message,
            }),
        )
            .into_response()
    }
}
