use thiserror::Error;
use uuid::Uuid;

use inkbook_db::db::enums::AppointmentStatus;

use super::conflict::Conflict;

/// Scheduling errors. All of them are meant to reach the user with an
/// actionable message; none is fatal and none leaves partial state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("Malformed schedule input: {0}")]
    MalformedScheduleInput(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Validation error: missing required fields: {}", .missing.join(", "))]
    ValidationError { missing: Vec<&'static str> },

    #[error("Scheduling conflict with {} existing appointment(s)", .0.len())]
    SchedulingConflict(Vec<Conflict>),

    #[error("Appointment {id} is incomplete: {reason}")]
    IncompleteAppointment { id: Uuid, reason: String },

    #[error("Illegal status transition from {from} to {to}")]
    IllegalStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Appointment {id} is {status}; sessions only run while in_progress")]
    SessionNotAllowed { id: Uuid, status: AppointmentStatus },

    #[error("Appointment {0} already has a running session")]
    SessionAlreadyRunning(Uuid),

    #[error("Appointment {0} has no running session")]
    SessionNotRunning(Uuid),
}
