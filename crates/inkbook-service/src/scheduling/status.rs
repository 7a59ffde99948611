//! Appointment status transitions.

use inkbook_db::db::enums::AppointmentStatus;

use super::error::SchedulingError;

/// ## Summary
/// Returns the statuses an appointment in `from` may move to.
#[must_use]
pub const fn allowed_transitions(from: AppointmentStatus) -> &'static [AppointmentStatus] {
    use AppointmentStatus::{Cancelled, Completed, Confirmed, InProgress, NoShow, Scheduled};

    match from {
        Scheduled => &[Confirmed, InProgress, Cancelled, NoShow],
        Confirmed => &[Scheduled, InProgress, Cancelled, NoShow],
        InProgress => &[Completed],
        Cancelled => &[Scheduled],
        Completed | NoShow => &[],
    }
}

/// Same-status moves are always allowed and are no-ops.
#[must_use]
pub fn can_transition(from: AppointmentStatus, to: AppointmentStatus) -> bool {
    from == to || allowed_transitions(from).contains(&to)
}

/// ## Summary
/// Checks a status change. With `enforce` off every change passes.
///
/// ## Errors
/// Returns `IllegalStatusTransition` if the table forbids the move.
pub fn check_transition(
    from: AppointmentStatus,
    to: AppointmentStatus,
    enforce: bool,
) -> Result<(), SchedulingError> {
    if !enforce || can_transition(from, to) {
        Ok(())
    } else {
        Err(SchedulingError::IllegalStatusTransition { from, to })
    }
}
