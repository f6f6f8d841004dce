use thiserror::Error;

/// Failures constructing the client itself, before any request is made.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("upstream returned no completion content")]
    EmptyResponse,

    /// Any other upstream failure. `message` is present only when the
    /// upstream supplied one in its error body; transport errors, timeouts
    /// and unparseable bodies leave it `None` so callers can substitute
    /// their own fallback text.
    #[error("{}", message.as_deref().unwrap_or("upstream request failed"))]
    Upstream { message: Option<String> },
}

impl From<reqwest::Error> for CompletionError {
    fn from(_: reqwest::Error) -> Self {
        CompletionError::Upstream { message: None }
    }
}
