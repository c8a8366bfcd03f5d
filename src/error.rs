use thiserror::Error;

pub const HTTP_FAILURE_MESSAGE: &str = "Failed to generate a response. Please try again later.";
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Failed to connect to the server. Please check your internet connection.";
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Returned by the pipeline when something escapes every inner handler.
pub const PIPELINE_FAILURE_MESSAGE: &str = "Something went wrong, sugar. Try again later.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Entity recognizer failures. Logged and replaced by an empty extraction.
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum ClassificationError {
    #[error("entity recognition failed: {0}")]
    Recognizer(String),
}

/// Failures of a remote completion call. Never shown to users directly,
/// see [`CompletionError::user_message`].
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    #[error("Request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl CompletionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CompletionError::Http { .. } => HTTP_FAILURE_MESSAGE,
            CompletionError::Network(_) => NETWORK_FAILURE_MESSAGE,
            CompletionError::Unexpected(_) => UNEXPECTED_FAILURE_MESSAGE,
        }
    }
}
