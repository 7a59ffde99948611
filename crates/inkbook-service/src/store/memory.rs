//! In-memory studio store.
//!
//! All data lives in `HashMap`s behind one `RwLock`, so every write checks
//! and applies the non-overlap rule atomically.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use inkbook_db::db::query::appointment::AppointmentFilter;
use inkbook_db::model::appointment::{Appointment, AppointmentChanges, NewAppointment};
use inkbook_db::model::client::{Client, NewClient};
use inkbook_db::model::session_event::{NewSessionEvent, SessionEvent};

use super::{AppointmentStore, ClientStore};
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryStudioStore {
    data: Arc<RwLock<MemoryData>>,
}

#[derive(Debug, Default)]
struct MemoryData {
    clients: HashMap<Uuid, Client>,
    appointments: HashMap<Uuid, Appointment>,
    session_events: Vec<SessionEvent>,
}

impl MemoryStudioStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Stores clients as given, keeping their IDs.
    #[must_use]
    pub fn with_clients(self, clients: impl IntoIterator<Item = Client>) -> Self {
        {
            let mut data = self.write();
            for client in clients {
                data.clients.insert(client.id, client);
            }
        }
        self
    }

    /// ## Summary
    /// Stores appointments as given, bypassing validation and the overlap
    /// rule. Used to load legacy or deliberately inconsistent records.
    #[must_use]
    pub fn with_appointments(self, appointments: impl IntoIterator<Item = Appointment>) -> Self {
        {
            let mut data = self.write();
            for appointment in appointments {
                data.appointments.insert(appointment.id, appointment);
            }
        }
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryData> {
        self.data.read().unwrap_or_else(|poisoned| {
            tracing::warn!("Recovering poisoned store lock");
            self.data.clear_poison();
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryData> {
        self.data.write().unwrap_or_else(|poisoned| {
            tracing::warn!("Recovering poisoned store lock");
            self.data.clear_poison();
            poisoned.into_inner()
        })
    }
}

fn collides(a: &Appointment, b: &Appointment) -> bool {
    if a.id == b.id || !a.status.holds_slot() || !b.status.holds_slot() {
        return false;
    }
    let shares_artist = a.artist_id.is_some() && a.artist_id == b.artist_id;
    let shares_bed = a.bed_id.is_some() && a.bed_id == b.bed_id;
    if !shares_artist && !shares_bed {
        return false;
    }
    // Same half-open comparison as the database's `tstzrange` constraint.
    a.starts_at < b.ends_at && b.starts_at < a.ends_at
}

impl MemoryData {
    fn reject_overlap(&self, candidate: &Appointment) -> ServiceResult<()> {
        if let Some(other) = self
            .appointments
            .values()
            .find(|other| collides(candidate, other))
        {
            tracing::debug!(
                appointment_id = %candidate.id,
                conflicting_id = %other.id,
                "Overlapping write rejected"
            );
            return Err(ServiceError::OverlapRejected);
        }
        Ok(())
    }

    fn update(
        &mut self,
        id: Uuid,
        changes: &AppointmentChanges,
    ) -> ServiceResult<Option<Appointment>> {
        let Some(current) = self.appointments.get(&id) else {
            return Ok(None);
        };

        let mut updated = current.clone();
        changes.apply_to(&mut updated);
        if changes.updated_at.is_none() {
            updated.updated_at = Utc::now();
        }
        self.reject_overlap(&updated)?;
        self.appointments.insert(id, updated.clone());
        Ok(Some(updated))
    }

    fn push_event(&mut self, new: NewSessionEvent) -> SessionEvent {
        let event = SessionEvent {
            id: Uuid::now_v7(),
            appointment_id: new.appointment_id,
            kind: new.kind,
            recorded_at: new.recorded_at,
        };
        self.session_events.push(event.clone());
        event
    }
}

#[async_trait]
impl AppointmentStore for MemoryStudioStore {
    async fn health_check(&self) -> ServiceResult<bool> {
        Ok(true)
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> ServiceResult<Vec<Appointment>> {
        let data = self.read();
        let mut found: Vec<Appointment> = data
            .appointments
            .values()
            .filter(|appt| filter.matches(appt))
            .cloned()
            .collect();
        found.sort_by_key(|appt| (appt.date, appt.start_time, appt.id));
        Ok(found)
    }

    async fn get_appointment(&self, id: Uuid) -> ServiceResult<Option<Appointment>> {
        Ok(self.read().appointments.get(&id).cloned())
    }

    async fn create_appointment(&self, new: NewAppointment) -> ServiceResult<Appointment> {
        let mut data = self.write();
        if !data.clients.contains_key(&new.client_id) {
            return Err(ServiceError::NotFound(format!("client {}", new.client_id)));
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::now_v7(),
            client_id: new.client_id,
            artist_id: new.artist_id,
            bed_id: new.bed_id,
            date: new.date,
            start_time: new.start_time,
            duration_minutes: new.duration_minutes,
            starts_at: new.starts_at,
            ends_at: new.ends_at,
            status: new.status,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };
        data.reject_overlap(&appointment)?;
        data.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
    ) -> ServiceResult<Option<Appointment>> {
        self.write().update(id, &changes)
    }

    async fn update_appointment_with_event(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
        event: Option<NewSessionEvent>,
    ) -> ServiceResult<Option<Appointment>> {
        let mut data = self.write();
        let updated = data.update(id, &changes)?;
        if let (Some(_), Some(event)) = (&updated, event) {
            data.push_event(event);
        }
        Ok(updated)
    }

    async fn delete_appointment(&self, id: Uuid) -> ServiceResult<bool> {
        let mut data = self.write();
        let removed = data.appointments.remove(&id).is_some();
        if removed {
            data.session_events.retain(|event| event.appointment_id != id);
        }
        Ok(removed)
    }

    async fn append_session_event(&self, new: NewSessionEvent) -> ServiceResult<SessionEvent> {
        let mut data = self.write();
        if !data.appointments.contains_key(&new.appointment_id) {
            return Err(ServiceError::NotFound(format!(
                "appointment {}",
                new.appointment_id
            )));
        }
        Ok(data.push_event(new))
    }

    async fn list_session_events(&self, appointment_id: Uuid) -> ServiceResult<Vec<SessionEvent>> {
        let mut events: Vec<SessionEvent> = self
            .read()
            .session_events
            .iter()
            .filter(|event| event.appointment_id == appointment_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        events.sort_by_key(|event| event.recorded_at);
        Ok(events)
    }
}

#[async_trait]
impl ClientStore for MemoryStudioStore {
    async fn create_client(&self, new: NewClient) -> ServiceResult<Client> {
        let client = Client {
            id: Uuid::now_v7(),
            display_name: new.display_name,
            email: new.email,
            phone: new.phone,
            created_at: Utc::now(),
        };
        self.write().clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn get_client(&self, id: Uuid) -> ServiceResult<Option<Client>> {
        Ok(self.read().clients.get(&id).cloned())
    }
}
