pub mod incident_service;
pub mod options_service;
pub mod user_service;
pub mod validation;

pub use incident_service::IncidentService;
pub use options_service::OptionsService;
pub use user_service::UserService;

use thiserror::Error;

use crate::auth::AuthError;
use crate::database::manager::DatabaseError;

/// Errors returned by the domain services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// One message per failing field, ordered by field name
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    Authentication(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![message.into()])
    }
}
