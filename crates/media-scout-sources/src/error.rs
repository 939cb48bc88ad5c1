use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl SourceError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        SourceError::Api {
            status,
            message: message.into(),
        }
    }
}
