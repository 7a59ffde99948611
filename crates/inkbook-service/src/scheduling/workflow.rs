//! Store-backed scheduling operations.
//!
//! Every booking write runs the conflict detector as a pre-flight check and
//! relies on the store's own non-overlap rule to catch concurrent writers.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde::de::IgnoredAny;
use uuid::Uuid;

use inkbook_db::db::enums::{AppointmentStatus, SessionEventKind};
use inkbook_db::db::query::appointment::AppointmentFilter;
use inkbook_db::model::appointment::{Appointment, AppointmentChanges, NewAppointment};
use inkbook_db::model::session_event::NewSessionEvent;

use super::conflict::{Conflict, ConflictCandidate, detect_conflicts};
use super::error::SchedulingError;
use super::interval::{ScheduleSlot, parse_date, parse_time, validate_duration};
use super::policy::SchedulingPolicy;
use super::session::{SessionSummary, summarize_sessions};
use super::slots::{OpenSlot, SlotQuery, open_slots};
use super::status::check_transition;
use crate::error::{ServiceError, ServiceResult};
use crate::store::{AppointmentStore, StudioStore};

/// A duration as submitted: a JSON number or a numeric string. Any other
/// JSON value lands in `Invalid` so it is reported as a bad duration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    Minutes(i64),
    Fractional(f64),
    Text(String),
    Invalid(IgnoredAny),
}

impl DurationInput {
    /// ## Summary
    /// Reads the value as whole minutes. Range is checked later.
    ///
    /// ## Errors
    /// Returns `InvalidDuration` for non-numeric text or fractional minutes.
    pub fn minutes(&self) -> Result<i64, SchedulingError> {
        let parsed = match self {
            Self::Minutes(minutes) => Some(*minutes),
            Self::Fractional(value) => whole_minutes(*value),
            Self::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(whole_minutes))
            }
            Self::Invalid(_) => None,
        };
        parsed.ok_or_else(|| {
            SchedulingError::InvalidDuration(match self {
                Self::Invalid(_) => "expected a number of minutes".to_string(),
                other => format!("{other:?} is not a whole number of minutes"),
            })
        })
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl From<i64> for DurationInput {
    fn from(minutes: i64) -> Self {
        Self::Minutes(minutes)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is integral and bounded before the cast"
)]
fn whole_minutes(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() <= 1_000_000.0)
        .then_some(value as i64)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_id(field: &str, value: &str) -> Result<Uuid, SchedulingError> {
    Uuid::parse_str(value).map_err(|e| {
        SchedulingError::MalformedScheduleInput(format!("{field} '{value}' is not a UUID: {e}"))
    })
}

/// Booking request as submitted. Every field is optional and IDs stay raw
/// text so that validation can report all missing or blank ones at once.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScheduleRequest {
    pub client_id: Option<String>,
    pub artist_id: Option<String>,
    pub bed_id: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration_minutes: Option<DurationInput>,
    pub notes: Option<String>,
}

/// A booking request that passed validation and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSchedule {
    pub client_id: Uuid,
    pub artist_id: Uuid,
    pub bed_id: Option<Uuid>,
    pub slot: ScheduleSlot,
    pub notes: Option<String>,
}

impl ValidatedSchedule {
    #[must_use]
    pub const fn candidate(&self) -> ConflictCandidate {
        ConflictCandidate {
            artist_id: self.artist_id,
            bed_id: self.bed_id,
            slot: self.slot,
            exclude_id: None,
        }
    }
}

impl ScheduleRequest {
    /// ## Summary
    /// Checks required fields, then parses duration, date and time.
    ///
    /// ## Errors
    /// - `ValidationError` naming every missing or blank required field
    /// - `InvalidDuration` or `MalformedScheduleInput` for unparseable values
    pub fn validate(&self) -> Result<ValidatedSchedule, SchedulingError> {
        let client_id = present(self.client_id.as_deref());
        let artist_id = present(self.artist_id.as_deref());
        let date = present(self.date.as_deref());
        let time = present(self.time.as_deref());
        let duration = self.duration_minutes.as_ref().filter(|d| !d.is_blank());

        let mut missing = Vec::new();
        if client_id.is_none() {
            missing.push("client_id");
        }
        if artist_id.is_none() {
            missing.push("artist_id");
        }
        if date.is_none() {
            missing.push("date");
        }
        if time.is_none() {
            missing.push("time");
        }
        if duration.is_none() {
            missing.push("duration_minutes");
        }

        let (Some(client_id), Some(artist_id), Some(date), Some(time), Some(duration)) =
            (client_id, artist_id, date, time, duration)
        else {
            return Err(SchedulingError::ValidationError { missing });
        };

        let client_id = parse_id("client_id", client_id)?;
        let artist_id = parse_id("artist_id", artist_id)?;
        let bed_id = present(self.bed_id.as_deref())
            .map(|bed| parse_id("bed_id", bed))
            .transpose()?;
        let minutes = duration.minutes()?;
        let slot = ScheduleSlot::new(parse_date(date)?, parse_time(time)?, minutes)?;

        Ok(ValidatedSchedule {
            client_id,
            artist_id,
            bed_id,
            slot,
            notes: present(self.notes.as_deref()).map(str::to_string),
        })
    }
}

/// Edit of an existing appointment. Absent fields stay unchanged; blank
/// `notes` clears them and `clear_bed` removes the bed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RescheduleRequest {
    pub artist_id: Option<Uuid>,
    pub bed_id: Option<Uuid>,
    pub clear_bed: bool,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration_minutes: Option<DurationInput>,
    pub notes: Option<String>,
}

impl RescheduleRequest {
    /// ## Summary
    /// Parses the request into column changes.
    ///
    /// ## Errors
    /// `MalformedScheduleInput` or `InvalidDuration` for unparseable values.
    pub fn changes(&self) -> Result<AppointmentChanges, SchedulingError> {
        let duration_minutes = self
            .duration_minutes
            .as_ref()
            .map(|d| d.minutes().and_then(validate_duration))
            .transpose()?;

        Ok(AppointmentChanges {
            artist_id: self.artist_id.map(Some),
            bed_id: if self.clear_bed {
                Some(None)
            } else {
                self.bed_id.map(Some)
            },
            date: self.date.as_deref().map(parse_date).transpose()?,
            start_time: self.time.as_deref().map(parse_time).transpose()?,
            duration_minutes,
            notes: self
                .notes
                .as_deref()
                .map(|n| present(Some(n)).map(str::to_string)),
            ..AppointmentChanges::default()
        })
    }
}

/// Selects the appointments that could overlap a booking on `date`: a day
/// either side covers bookings that run across midnight.
fn conflict_window(candidate: &ConflictCandidate) -> AppointmentFilter {
    let date = candidate.slot.date();
    AppointmentFilter {
        artist_id: Some(candidate.artist_id),
        bed_id: candidate.bed_id,
        from: Some(date.pred_opt().unwrap_or(NaiveDate::MIN)),
        to: Some(date.succ_opt().unwrap_or(NaiveDate::MAX)),
        ..AppointmentFilter::default()
    }
}

async fn find_conflicts<S>(
    store: &S,
    policy: &SchedulingPolicy,
    candidate: &ConflictCandidate,
) -> ServiceResult<Vec<Conflict>>
where
    S: AppointmentStore + ?Sized,
{
    let existing = store
        .list_appointments(&conflict_window(candidate))
        .await?;
    Ok(detect_conflicts(candidate, &existing, &policy.detector())?)
}

async fn ensure_free<S>(
    store: &S,
    policy: &SchedulingPolicy,
    candidate: &ConflictCandidate,
) -> ServiceResult<()>
where
    S: AppointmentStore + ?Sized,
{
    let conflicts = find_conflicts(store, policy, candidate).await?;
    if conflicts.is_empty() {
        return Ok(());
    }
    tracing::warn!(
        artist_id = %candidate.artist_id,
        count = conflicts.len(),
        "Booking rejected: scheduling conflict"
    );
    Err(SchedulingError::SchedulingConflict(conflicts).into())
}

/// Turns a store-side overlap rejection into the conflicts that caused it.
async fn explain_rejection<S>(
    store: &S,
    policy: &SchedulingPolicy,
    candidate: &ConflictCandidate,
) -> ServiceError
where
    S: AppointmentStore + ?Sized,
{
    tracing::warn!(
        artist_id = %candidate.artist_id,
        "Store rejected overlapping write; a concurrent booking took the slot"
    );
    match find_conflicts(store, policy, candidate).await {
        Ok(conflicts) if !conflicts.is_empty() => {
            SchedulingError::SchedulingConflict(conflicts).into()
        }
        Ok(_) => ServiceError::OverlapRejected,
        Err(e) => e,
    }
}

fn candidate_for(
    appointment: &Appointment,
) -> Result<ConflictCandidate, SchedulingError> {
    let artist_id = appointment
        .artist_id
        .ok_or_else(|| SchedulingError::IncompleteAppointment {
            id: appointment.id,
            reason: "no artist assigned".to_string(),
        })?;
    Ok(ConflictCandidate {
        artist_id,
        bed_id: appointment.bed_id,
        slot: ScheduleSlot::of(appointment)?,
        exclude_id: Some(appointment.id),
    })
}

async fn load<S>(store: &S, id: Uuid) -> ServiceResult<Appointment>
where
    S: AppointmentStore + ?Sized,
{
    store
        .get_appointment(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("appointment {id}")))
}

/// ## Summary
/// Validates a booking request and returns the appointments it would
/// conflict with, without persisting anything.
///
/// ## Errors
/// Validation and parse errors, `IncompleteAppointment` under a strict
/// policy, and store errors.
#[tracing::instrument(skip(store, policy))]
pub async fn check_conflicts<S>(
    store: &S,
    policy: &SchedulingPolicy,
    request: &ScheduleRequest,
) -> ServiceResult<Vec<Conflict>>
where
    S: AppointmentStore + ?Sized,
{
    let validated = request.validate()?;
    find_conflicts(store, policy, &validated.candidate()).await
}

/// ## Summary
/// Books an appointment in `scheduled` status if it conflicts with nothing.
///
/// ## Errors
/// - `ValidationError`, `InvalidDuration`, `MalformedScheduleInput` for bad input
/// - `NotFound` if the client does not exist
/// - `SchedulingConflict` listing every conflicting appointment
/// - store errors, unchanged
#[tracing::instrument(skip(store, policy))]
pub async fn schedule_appointment<S>(
    store: &S,
    policy: &SchedulingPolicy,
    request: &ScheduleRequest,
) -> ServiceResult<Appointment>
where
    S: StudioStore + ?Sized,
{
    let validated = request.validate().inspect_err(|e| {
        tracing::warn!(error = %e, "Booking request rejected");
    })?;
    let interval = validated.slot.interval(policy.timezone)?;

    if store.get_client(validated.client_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "client {}",
            validated.client_id
        )));
    }

    let candidate = validated.candidate();
    ensure_free(store, policy, &candidate).await?;

    let new = NewAppointment {
        client_id: validated.client_id,
        artist_id: Some(validated.artist_id),
        bed_id: validated.bed_id,
        date: validated.slot.date(),
        start_time: validated.slot.time(),
        duration_minutes: validated.slot.duration_minutes(),
        starts_at: interval.start(),
        ends_at: interval.end(),
        status: AppointmentStatus::Scheduled,
        notes: validated.notes,
    };

    match store.create_appointment(new).await {
        Ok(appointment) => {
            tracing::info!(appointment_id = %appointment.id, "Appointment scheduled");
            Ok(appointment)
        }
        Err(ServiceError::OverlapRejected) => {
            Err(explain_rejection(store, policy, &candidate).await)
        }
        Err(e) => Err(e),
    }
}

/// ## Summary
/// Moves an appointment to another time, artist or bed, or edits its notes.
/// The appointment never conflicts with itself.
///
/// ## Errors
/// `NotFound`, parse errors, `SchedulingConflict`, and store errors.
#[tracing::instrument(skip(store, policy))]
pub async fn reschedule_appointment<S>(
    store: &S,
    policy: &SchedulingPolicy,
    id: Uuid,
    request: &RescheduleRequest,
) -> ServiceResult<Appointment>
where
    S: AppointmentStore + ?Sized,
{
    let current = load(store, id).await?;
    let mut changes = request.changes()?;

    let mut proposed = current.clone();
    changes.apply_to(&mut proposed);
    if changes.touches_schedule() {
        let interval = ScheduleSlot::of(&proposed)?.interval(policy.timezone)?;
        changes.starts_at = Some(interval.start());
        changes.ends_at = Some(interval.end());
    }

    let candidate = if changes.touches_schedule() && proposed.status.holds_slot() {
        let candidate = candidate_for(&proposed)?;
        ensure_free(store, policy, &candidate).await?;
        Some(candidate)
    } else {
        None
    };

    match store.update_appointment(id, changes).await {
        Ok(Some(updated)) => {
            tracing::info!(appointment_id = %id, "Appointment rescheduled");
            Ok(updated)
        }
        Ok(None) => Err(ServiceError::NotFound(format!("appointment {id}"))),
        Err(ServiceError::OverlapRejected) => match candidate {
            Some(candidate) => Err(explain_rejection(store, policy, &candidate).await),
            None => Err(ServiceError::OverlapRejected),
        },
        Err(e) => Err(e),
    }
}

/// ## Summary
/// Moves an appointment to `to`.
///
/// Reinstating a cancelled appointment re-checks its slot. Leaving
/// `in_progress` closes a running session in the same store write.
///
/// ## Errors
/// `NotFound`, `IllegalStatusTransition`, `SchedulingConflict`, and store
/// errors.
#[tracing::instrument(skip(store, policy))]
pub async fn change_status<S>(
    store: &S,
    policy: &SchedulingPolicy,
    id: Uuid,
    to: AppointmentStatus,
) -> ServiceResult<Appointment>
where
    S: AppointmentStore + ?Sized,
{
    let current = load(store, id).await?;
    let from = current.status;

    check_transition(from, to, policy.enforce_status_transitions).inspect_err(|e| {
        tracing::warn!(appointment_id = %id, error = %e, "Status change rejected");
    })?;
    if from == to {
        return Ok(current);
    }

    let candidate = if !from.holds_slot() && to.holds_slot() {
        let candidate = candidate_for(&current)?;
        ensure_free(store, policy, &candidate).await?;
        Some(candidate)
    } else {
        None
    };

    let mut stop = None;
    if from == AppointmentStatus::InProgress {
        let events = store.list_session_events(id).await?;
        if summarize_sessions(id, &events, Utc::now()).running {
            stop = Some(NewSessionEvent {
                appointment_id: id,
                kind: SessionEventKind::Stop,
                recorded_at: Utc::now(),
            });
        }
    }
    let closes_session = stop.is_some();

    match store
        .update_appointment_with_event(id, AppointmentChanges::status(to), stop)
        .await
    {
        Ok(Some(updated)) => {
            if closes_session {
                tracing::debug!(appointment_id = %id, "Closed running session");
            }
            tracing::info!(appointment_id = %id, %from, %to, "Appointment status changed");
            Ok(updated)
        }
        Ok(None) => Err(ServiceError::NotFound(format!("appointment {id}"))),
        Err(ServiceError::OverlapRejected) => match candidate {
            Some(candidate) => Err(explain_rejection(store, policy, &candidate).await),
            None => Err(ServiceError::OverlapRejected),
        },
        Err(e) => Err(e),
    }
}

/// ## Summary
/// Permanently removes an appointment and its session events.
///
/// ## Errors
/// `NotFound` if no appointment has that ID, and store errors.
#[tracing::instrument(skip(store))]
pub async fn delete_appointment<S>(store: &S, id: Uuid) -> ServiceResult<()>
where
    S: AppointmentStore + ?Sized,
{
    if store.delete_appointment(id).await? {
        tracing::info!(appointment_id = %id, "Appointment deleted");
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("appointment {id}")))
    }
}

/// ## Summary
/// Lists bookable start times for an artist (and optional bed) on a day.
///
/// ## Errors
/// `InvalidDuration`, `IncompleteAppointment` under a strict policy, and store
/// errors.
#[tracing::instrument(skip(store, policy))]
pub async fn find_open_slots<S>(
    store: &S,
    policy: &SchedulingPolicy,
    query: &SlotQuery,
) -> ServiceResult<Vec<OpenSlot>>
where
    S: AppointmentStore + ?Sized,
{
    let day = ConflictCandidate {
        artist_id: query.artist_id,
        bed_id: query.bed_id,
        slot: ScheduleSlot::new(query.date, policy.opens_at, query.duration_minutes)?,
        exclude_id: None,
    };
    let existing = store.list_appointments(&conflict_window(&day)).await?;
    Ok(open_slots(query, &existing, policy)?)
}

/// ## Summary
/// Returns the session timing of an appointment.
///
/// ## Errors
/// `NotFound` if no appointment has that ID, and store errors.
#[tracing::instrument(skip(store))]
pub async fn session_summary<S>(store: &S, id: Uuid) -> ServiceResult<SessionSummary>
where
    S: AppointmentStore + ?Sized,
{
    load(store, id).await?;
    let events = store.list_session_events(id).await?;
    Ok(summarize_sessions(id, &events, Utc::now()))
}

/// ## Summary
/// Starts the session timer of an in-progress appointment.
///
/// ## Errors
/// `NotFound`, `SessionNotAllowed` unless the appointment is `in_progress`,
/// `SessionAlreadyRunning`, and store errors.
#[tracing::instrument(skip(store))]
pub async fn start_session<S>(store: &S, id: Uuid) -> ServiceResult<SessionSummary>
where
    S: AppointmentStore + ?Sized,
{
    let appointment = load(store, id).await?;
    if appointment.status != AppointmentStatus::InProgress {
        return Err(SchedulingError::SessionNotAllowed {
            id,
            status: appointment.status,
        }
        .into());
    }

    let mut events = store.list_session_events(id).await?;
    if summarize_sessions(id, &events, Utc::now()).running {
        return Err(SchedulingError::SessionAlreadyRunning(id).into());
    }

    let event = store
        .append_session_event(NewSessionEvent {
            appointment_id: id,
            kind: SessionEventKind::Start,
            recorded_at: Utc::now(),
        })
        .await?;
    tracing::info!(appointment_id = %id, "Session started");

    events.push(event);
    Ok(summarize_sessions(id, &events, Utc::now()))
}

/// ## Summary
/// Stops the running session timer of an appointment.
///
/// ## Errors
/// `NotFound`, `SessionNotRunning`, and store errors.
#[tracing::instrument(skip(store))]
pub async fn stop_session<S>(store: &S, id: Uuid) -> ServiceResult<SessionSummary>
where
    S: AppointmentStore + ?Sized,
{
    load(store, id).await?;

    let mut events = store.list_session_events(id).await?;
    if !summarize_sessions(id, &events, Utc::now()).running {
        return Err(SchedulingError::SessionNotRunning(id).into());
    }

    let event = store
        .append_session_event(NewSessionEvent {
            appointment_id: id,
            kind: SessionEventKind::Stop,
            recorded_at: Utc::now(),
        })
        .await?;
    tracing::info!(appointment_id = %id, "Session stopped");

    events.push(event);
    Ok(summarize_sessions(id, &events, Utc::now()))
}
