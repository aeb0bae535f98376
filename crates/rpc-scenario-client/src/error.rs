use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {status} without a JSON-RPC body: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to encode or decode JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("RPC error ({code}): {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Whether the failure happened before any server reply was read.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::InvalidUrl(_))
    }
}
