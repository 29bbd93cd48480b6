//! Service layer: validates input, talks to the repository traits and maps
//! failures into [`ServiceError`] for the controller to display.

use thiserror::Error;

use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod auth;
pub mod dashboard;
pub mod lansia;
pub mod upload;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{}", .0.as_deref().unwrap_or("Authentication required"))]
    Unauthorized(Option<String>),

    #[error("{}", .0.as_deref().unwrap_or("Data tidak ditemukan"))]
    NotFound(Option<String>),

    #[error("{0}")]
    Form(String),

    #[error("{0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(message) => ServiceError::NotFound(message),
            RepositoryError::Unauthorized(message) => ServiceError::Unauthorized(message),
            RepositoryError::Server { message, .. } => ServiceError::Server(message),
            RepositoryError::Network(message) => ServiceError::Network(message),
            RepositoryError::Decode(message) | RepositoryError::InvalidRequest(message) => {
                ServiceError::Internal(message)
            }
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl ServiceError {
    /// Message shown to the user, falling back to `fallback` for failures
    /// that carry no server explanation.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ServiceError::Form(message) | ServiceError::Server(message)
                if !message.is_empty() =>
            {
                message.clone()
            }
            ServiceError::Unauthorized(Some(message)) | ServiceError::NotFound(Some(message)) => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}
