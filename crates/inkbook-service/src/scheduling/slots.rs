//! Searching a day's opening hours for bookable start times.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::Serialize;
use uuid::Uuid;

use inkbook_db::model::appointment::Appointment;

use super::conflict::{ConflictCandidate, detect_conflicts};
use super::error::SchedulingError;
use super::interval::{ScheduleSlot, TimeInterval};
use super::policy::SchedulingPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotQuery {
    pub artist_id: Uuid,
    pub bed_id: Option<Uuid>,
    pub date: NaiveDate,
    pub duration_minutes: i64,
}

/// A start time at which the queried booking would not conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpenSlot {
    pub time: NaiveTime,
    pub interval: TimeInterval,
}

/// ## Summary
/// Lists the start times on `query.date`, on the policy's step grid from
/// opening time, where a booking of the requested length fits before closing
/// and conflicts with nothing in `existing`.
///
/// Start times skipped by a DST transition are left out.
///
/// ## Errors
/// - `InvalidDuration` for an out-of-range duration
/// - `IncompleteAppointment` when the policy fails on incomplete records
#[tracing::instrument(skip(existing, policy), fields(artist_id = %query.artist_id, date = %query.date))]
pub fn open_slots(
    query: &SlotQuery,
    existing: &[Appointment],
    policy: &SchedulingPolicy,
) -> Result<Vec<OpenSlot>, SchedulingError> {
    let first_slot = ScheduleSlot::new(query.date, policy.opens_at, query.duration_minutes)?;
    let duration = i64::from(first_slot.duration_minutes());
    let open_minutes = (policy.closes_at - policy.opens_at).num_minutes();
    let step = i64::from(policy.slot_step_minutes.max(1));
    let options = policy.detector();

    let mut slots = Vec::new();
    let mut offset = 0;
    while offset + duration <= open_minutes {
        let time = policy.opens_at + TimeDelta::minutes(offset);
        offset += step;

        let slot = ScheduleSlot::new(query.date, time, duration)?;
        let Ok(interval) = slot.interval(policy.timezone) else {
            tracing::debug!(%time, "Start time does not exist locally, skipping");
            continue;
        };

        let candidate = ConflictCandidate {
            artist_id: query.artist_id,
            bed_id: query.bed_id,
            slot,
            exclude_id: None,
        };
        if detect_conflicts(&candidate, existing, &options)?.is_empty() {
            slots.push(OpenSlot { time, interval });
        }
    }

    tracing::debug!(count = slots.len(), "Open slots computed");
    Ok(slots)
}
