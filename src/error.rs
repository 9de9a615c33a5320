use thiserror::Error;

/// Failures at the submission boundary. Everything past this point reports
/// problems as data instead.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Nothing to analyze: text is empty")]
    EmptyText,

    #[error("An analysis is already in progress")]
    Busy,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Message comes from the endpoint's `error` field when it sent one
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from analysis endpoint: {0}")]
    Decode(String),

    #[error("Analysis request timed out after {0}s")]
    Timeout(u64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}
