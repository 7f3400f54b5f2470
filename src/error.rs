//! Error types shared across the crate.
//!
//! Service failures are classified once, at the HTTP boundary, and carried
//! unchanged as the `source` of the controller's mutation errors.

use thiserror::Error;

use crate::model::UserId;

/// Failures of a call to the remote user service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Transport-level failure (no connectivity, refused, timed out).
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-2xx status.
    #[error("service responded with HTTP {status}")]
    Http { status: u16 },

    /// A 2xx answer whose body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Base URL rejected at construction time.
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),
}

impl ServiceError {
    /// HTTP status of the failure, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            ServiceError::Http { status: status.as_u16() }
        } else if e.is_decode() {
            ServiceError::Decode(e.to_string())
        } else {
            ServiceError::Network(e.to_string())
        }
    }
}

/// Errors of the pagination engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("invalid configuration: page size must be positive, got {0}")]
    InvalidConfiguration(i64),
}

/// Outcomes of a list mutation that did not go through.
#[derive(Error, Debug)]
pub enum MutationError {
    #[error("failed to load users")]
    LoadFailed(#[source] ServiceError),

    #[error("failed to create user")]
    CreateFailed(#[source] ServiceError),

    #[error("failed to delete user {id}")]
    DeleteFailed {
        id: UserId,
        #[source]
        source: ServiceError,
    },

    #[error("failed to fetch user {id}")]
    FetchFailed {
        id: UserId,
        #[source]
        source: ServiceError,
    },

    /// The same logical operation is already waiting for the service.
    #[error("{0} already in flight")]
    AlreadyInFlight(String),

    /// A required form field is blank.
    #[error("{0} is required")]
    InvalidUser(&'static str),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
pub type Result<T, E = MutationError> = std::result::Result<T, E>;
