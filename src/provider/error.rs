//! Chat provider errors

pub type Result<T> = std::result::Result<T, ProviderError>;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("No chat API key configured (set CHATBOAT_API_KEY or [chat] api_key in keys.toml)")]
    MissingApiKey,

    #[error("API key contains invalid characters")]
    InvalidApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Request was cancelled before a reply arrived")]
    Cancelled,
}

impl ProviderError {
    /// Collapse reqwest timeouts into [`ProviderError::Timeout`]
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e)
        }
    }
}
