//! Scheduler client error types.

/// Errors from fetching route metadata or schedules.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The route store has no route with this id
    #[error("route {0} not found")]
    RouteNotFound(String),

    /// The scheduler or route store returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Client could not be set up
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl From<super::convert::ConversionError> for SchedulerError {
    fn from(err: super::convert::ConversionError) -> Self {
        SchedulerError::Json {
            message: err.to_string(),
            body: None,
        }
    }
}
