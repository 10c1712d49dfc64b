use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),

    /// The host application answered with something other than success,
    /// or could not be reached at all.
    #[error("Host application responded with status {status}: {body}")]
    UpstreamUnavailable { status: u16, body: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            status,
            body: body.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
