//! Conflict detection between a proposed booking and existing appointments.

use chrono_tz::Tz;
use serde::Serialize;
use uuid::Uuid;

use inkbook_core::config::IncompleteRecordPolicy;
use inkbook_db::model::appointment::Appointment;

use super::error::SchedulingError;
use super::interval::{ScheduleSlot, TimeInterval};

/// A proposed booking to check against existing appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictCandidate {
    pub artist_id: Uuid,
    pub bed_id: Option<Uuid>,
    pub slot: ScheduleSlot,
    /// Appointment being edited; never reported as conflicting with itself.
    pub exclude_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorOptions {
    pub timezone: Tz,
    pub incomplete_records: IncompleteRecordPolicy,
}

/// Which shared resource makes an overlap a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    Artist,
    Bed,
    ArtistAndBed,
}

impl ConflictReason {
    const fn from_matches(artist: bool, bed: bool) -> Option<Self> {
        match (artist, bed) {
            (true, true) => Some(Self::ArtistAndBed),
            (true, false) => Some(Self::Artist),
            (false, true) => Some(Self::Bed),
            (false, false) => None,
        }
    }
}

/// An existing appointment the candidate collides with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub appointment: Appointment,
    pub interval: TimeInterval,
    pub reason: ConflictReason,
}

/// ## Summary
/// Returns every appointment in `existing` that overlaps the candidate in
/// time and shares its artist or its bed.
///
/// Cancelled appointments and the candidate's own `exclude_id` are ignored.
/// Overlap is strict, so back-to-back bookings do not conflict. Results keep
/// the order of `existing`.
///
/// ## Errors
/// - `MalformedScheduleInput` if the candidate's start does not exist in the
///   studio timezone
/// - `IncompleteAppointment` for an existing record without artist or with an
///   unusable schedule, when `options.incomplete_records` is `Fail`
#[tracing::instrument(skip(existing), fields(artist_id = %candidate.artist_id))]
pub fn detect_conflicts<'a, I>(
    candidate: &ConflictCandidate,
    existing: I,
    options: &DetectorOptions,
) -> Result<Vec<Conflict>, SchedulingError>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    let wanted = candidate.slot.interval(options.timezone)?;
    let mut conflicts = Vec::new();

    for appointment in existing {
        if !appointment.status.holds_slot() || candidate.exclude_id == Some(appointment.id) {
            continue;
        }

        let Some(artist_id) = appointment.artist_id else {
            incomplete(appointment, "no artist assigned", options)?;
            continue;
        };

        let shares_artist = artist_id == candidate.artist_id;
        let shares_bed = candidate.bed_id.is_some() && appointment.bed_id == candidate.bed_id;
        let Some(reason) = ConflictReason::from_matches(shares_artist, shares_bed) else {
            continue;
        };

        let interval = match ScheduleSlot::of(appointment).and_then(|s| s.interval(options.timezone))
        {
            Ok(interval) => interval,
            Err(e) => {
                incomplete(appointment, &e.to_string(), options)?;
                continue;
            }
        };

        if wanted.overlaps(&interval) {
            tracing::debug!(
                conflicting_id = %appointment.id,
                reason = ?reason,
                "Appointment conflicts with candidate"
            );
            conflicts.push(Conflict {
                appointment: appointment.clone(),
                interval,
                reason,
            });
        }
    }

    Ok(conflicts)
}

fn incomplete(
    appointment: &Appointment,
    reason: &str,
    options: &DetectorOptions,
) -> Result<(), SchedulingError> {
    match options.incomplete_records {
        IncompleteRecordPolicy::Skip => {
            tracing::warn!(
                appointment_id = %appointment.id,
                reason,
                "Skipping incomplete appointment during conflict check"
            );
            Ok(())
        }
        IncompleteRecordPolicy::Fail => Err(SchedulingError::IncompleteAppointment {
            id: appointment.id,
            reason: reason.to_string(),
        }),
    }
}
