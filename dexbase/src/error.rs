use std::sync::Arc;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    RequestFailed(Arc<reqwest::Error>),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error("invalid response: {0}")]
    InvalidResponse(Arc<serde_json::Error>),
    #[error("unknown type: {0}")]
    UnknownType(String),
}

impl Error {
    /// Whether the resource is definitively absent, as opposed to temporarily
    /// unavailable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::RequestFailed(Arc::new(error))
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidResponse(Arc::new(error))
    }
}
