use salvo::http::StatusCode;
use thiserror::Error;

use inkbook_core::error::CoreError;
use inkbook_service::error::ServiceError;
use inkbook_service::scheduling::SchedulingError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    /// Request could not be read: bad JSON, bad path or query parameter.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        Self::ServiceError(err.into())
    }
}

impl AppError {
    /// ## Summary
    /// HTTP status and machine-readable code for this error.
    #[must_use]
    pub const fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Self::ServiceError(err) => service_status(err),
            Self::CoreError(err) => core_status(err),
        }
    }
}

const fn service_status(err: &ServiceError) -> (StatusCode, &'static str) {
    match err {
        ServiceError::Scheduling(err) => scheduling_status(err),
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        ServiceError::OverlapRejected => (StatusCode::CONFLICT, "scheduling_conflict"),
        ServiceError::CoreError(err) => core_status(err),
        ServiceError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error"),
    }
}

const fn scheduling_status(err: &SchedulingError) -> (StatusCode, &'static str) {
    match err {
        SchedulingError::ValidationError { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "validation_error")
        }
        SchedulingError::MalformedScheduleInput(_) => {
            (StatusCode::BAD_REQUEST, "malformed_schedule_input")
        }
        SchedulingError::InvalidDuration(_) => (StatusCode::BAD_REQUEST, "invalid_duration"),
        SchedulingError::SchedulingConflict(_) => (StatusCode::CONFLICT, "scheduling_conflict"),
        SchedulingError::IncompleteAppointment { .. } => {
            (StatusCode::CONFLICT, "incomplete_appointment")
        }
        SchedulingError::IllegalStatusTransition { .. } => {
            (StatusCode::CONFLICT, "illegal_status_transition")
        }
        SchedulingError::SessionNotAllowed { .. } => (StatusCode::CONFLICT, "session_not_allowed"),
        SchedulingError::SessionAlreadyRunning(_) => {
            (StatusCode::CONFLICT, "session_already_running")
        }
        SchedulingError::SessionNotRunning(_) => (StatusCode::CONFLICT, "session_not_running"),
    }
}

const fn core_status(err: &CoreError) -> (StatusCode, &'static str) {
    match err {
        CoreError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
        CoreError::ValidationError(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
        CoreError::ConfigError(_) | CoreError::InvariantViolation(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
