use chrono::{DateTime, Utc};
use diesel::{pg::Pg, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{enums::SessionEventKind, schema};

/// One start or stop of the session timer of an in-progress appointment.
#[derive(
    Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations, Serialize,
)]
#[diesel(table_name = schema::session_event)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(super::appointment::Appointment, foreign_key = appointment_id))]
pub struct SessionEvent {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub kind: SessionEventKind,
    pub recorded_at: DateTime<Utc>,
}

/// Insert struct for recording session events
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = schema::session_event)]
pub struct NewSessionEvent {
    pub appointment_id: Uuid,
    pub kind: SessionEventKind,
    pub recorded_at: DateTime<Utc>,
}
