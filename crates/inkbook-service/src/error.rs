use thiserror::Error;

use crate::scheduling::error::SchedulingError;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error(transparent)]
    DatabaseError(#[from] inkbook_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] inkbook_core::error::CoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The store's own non-overlap rule refused a write that passed the
    /// pre-flight check, i.e. a concurrent booking won the slot.
    #[error("Overlapping appointment rejected by the store")]
    OverlapRejected,
}

impl From<diesel::result::Error> for ServiceError {
    fn from(err: diesel::result::Error) -> Self {
        Self::DatabaseError(err.into())
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
