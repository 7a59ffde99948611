use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::{pg::Pg, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{enums::AppointmentStatus, schema};

/// A booked session binding a client, an artist, an optional bed and a
/// local start time.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = schema::appointment)]
#[diesel(check_for_backend(Pg))]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    /// `None` only for legacy rows imported without an artist.
    pub artist_id: Option<Uuid>,
    pub bed_id: Option<Uuid>,
    /// Studio-local calendar date.
    pub date: NaiveDate,
    /// Studio-local start time.
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    /// Absolute start of the booking, resolved in the studio timezone.
    pub starts_at: DateTime<Utc>,
    /// `starts_at` plus `duration_minutes` of elapsed time.
    pub ends_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert struct for creating new appointments
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = schema::appointment)]
pub struct NewAppointment {
    pub client_id: Uuid,
    pub artist_id: Option<Uuid>,
    pub bed_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

/// Partial update of an appointment. `None` leaves a column untouched;
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = schema::appointment)]
pub struct AppointmentChanges {
    pub artist_id: Option<Option<Uuid>>,
    pub bed_id: Option<Option<Uuid>>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<Option<String>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AppointmentChanges {
    /// ## Summary
    /// Changes that only move the appointment to `status`.
    #[must_use]
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// ## Summary
    /// Applies the changes to an in-memory copy of `appointment`.
    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(artist_id) = self.artist_id {
            appointment.artist_id = artist_id;
        }
        if let Some(bed_id) = self.bed_id {
            appointment.bed_id = bed_id;
        }
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(start_time) = self.start_time {
            appointment.start_time = start_time;
        }
        if let Some(duration_minutes) = self.duration_minutes {
            appointment.duration_minutes = duration_minutes;
        }
        if let Some(starts_at) = self.starts_at {
            appointment.starts_at = starts_at;
        }
        if let Some(ends_at) = self.ends_at {
            appointment.ends_at = ends_at;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(notes) = &self.notes {
            appointment.notes.clone_from(notes);
        }
        if let Some(updated_at) = self.updated_at {
            appointment.updated_at = updated_at;
        }
    }

    /// ## Summary
    /// Returns `true` if the change can move the appointment in time or onto
    /// another artist or bed.
    #[must_use]
    pub const fn touches_schedule(&self) -> bool {
        self.artist_id.is_some()
            || self.bed_id.is_some()
            || self.date.is_some()
            || self.start_time.is_some()
            || self.duration_minutes.is_some()
    }
}
