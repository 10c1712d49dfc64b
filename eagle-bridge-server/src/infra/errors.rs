use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::warn;

use eagle_bridge_core::GatewayError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    /// Error carrying the host application's own status code.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        match StatusCode::from_u16(status) {
            Ok(status) if status.is_client_error() || status.is_server_error() => {
                Self::new(status, message)
            }
            _ => Self::bad_gateway(message),
        }
    }

    /// Map a host failure onto `detail`, keeping the host's status.
    pub fn from_upstream(err: GatewayError, detail: &str) -> Self {
        match err {
            GatewayError::UpstreamUnavailable { status, body } => {
                warn!(status, body = %body, "{detail}");
                Self::upstream(status, detail)
            }
            other => other.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.message }));

        (self.status, body).into_response()
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(msg) => Self::not_found(msg),
            GatewayError::UpstreamUnavailable { status, body } => {
                warn!(status, body = %body, "host application request failed");
                Self::upstream(
                    status,
                    format!("Host application responded with status {status}"),
                )
            }
            GatewayError::Internal(msg) => Self::internal(msg),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}
