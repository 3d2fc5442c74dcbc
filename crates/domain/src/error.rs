use crate::validation::FieldError;

/// Shared error type used across all Scriptwright crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    /// A model-gateway stage failed. The message is already localized and
    /// carries the provider's original error text.
    #[error("{0}")]
    Generation(String),

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store: {0}")]
    Store(String),

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a validation error from a list of field issues.
    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Error::Validation {
            message: message.into(),
            details,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
