use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// Carries the backend's `{message}` when the body had one.
    #[error("Entity not found")]
    NotFound(Option<String>),

    #[error("Authentication required")]
    Unauthorized(Option<String>),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Decode(err.to_string())
        } else if err.is_builder() {
            RepositoryError::InvalidRequest(err.to_string())
        } else {
            RepositoryError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for RepositoryError {
    fn from(err: url::ParseError) -> Self {
        RepositoryError::InvalidRequest(format!("Invalid URL: {err}"))
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Decode(err.to_string())
    }
}
