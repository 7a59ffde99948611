//! Persistence collaborators for the scheduling workflow.
//!
//! The workflow only talks to the [`StudioStore`] trait object, so the same
//! operations run on the in-memory store (default, used by tests) and on
//! `PostgreSQL`.
//!
//! Every store enforces the non-overlap rule itself on insert and update:
//! two slot-holding appointments sharing an artist or a bed may not overlap
//! between their absolute `starts_at` and `ends_at` instants. A write that
//! breaks the rule fails with
//! [`ServiceError::OverlapRejected`](crate::error::ServiceError::OverlapRejected).

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use inkbook_core::config::{Settings, StorageBackend};
use inkbook_db::db::query::appointment::AppointmentFilter;
use inkbook_db::model::appointment::{Appointment, AppointmentChanges, NewAppointment};
use inkbook_db::model::client::{Client, NewClient};
use inkbook_db::model::session_event::{NewSessionEvent, SessionEvent};

use crate::error::ServiceResult;

pub use memory::MemoryStudioStore;
pub use postgres::PgStudioStore;

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Returns `Ok(true)` if the store can serve requests.
    async fn health_check(&self) -> ServiceResult<bool>;

    /// Appointments matching `filter`, ordered by date, start time and ID.
    async fn list_appointments(&self, filter: &AppointmentFilter)
    -> ServiceResult<Vec<Appointment>>;

    async fn get_appointment(&self, id: Uuid) -> ServiceResult<Option<Appointment>>;

    /// ## Errors
    /// `OverlapRejected` if the appointment collides with a stored one,
    /// `NotFound` if the client does not exist.
    async fn create_appointment(&self, new: NewAppointment) -> ServiceResult<Appointment>;

    /// Returns `None` if no appointment has that ID.
    ///
    /// ## Errors
    /// `OverlapRejected` if the updated appointment collides with a stored one.
    async fn update_appointment(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
    ) -> ServiceResult<Option<Appointment>>;

    /// Applies `changes` and appends `event` as one atomic write. Nothing is
    /// recorded if the update fails or no appointment has that ID.
    ///
    /// ## Errors
    /// `OverlapRejected` if the updated appointment collides with a stored one.
    async fn update_appointment_with_event(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
        event: Option<NewSessionEvent>,
    ) -> ServiceResult<Option<Appointment>>;

    /// Deletes the appointment and its session events. Returns `false` if
    /// nothing was deleted.
    async fn delete_appointment(&self, id: Uuid) -> ServiceResult<bool>;

    async fn append_session_event(&self, new: NewSessionEvent) -> ServiceResult<SessionEvent>;

    /// Events of one appointment in recording order.
    async fn list_session_events(&self, appointment_id: Uuid) -> ServiceResult<Vec<SessionEvent>>;
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn create_client(&self, new: NewClient) -> ServiceResult<Client>;

    async fn get_client(&self, id: Uuid) -> ServiceResult<Option<Client>>;
}

/// Everything the studio workflow needs from persistence.
pub trait StudioStore: AppointmentStore + ClientStore {}

impl<T> StudioStore for T where T: AppointmentStore + ClientStore {}

/// ## Summary
/// Builds the store selected by `storage.backend`.
///
/// ## Errors
/// Returns an error if the database pool cannot be created.
#[tracing::instrument(skip(settings), fields(backend = ?settings.storage.backend))]
pub async fn connect(settings: &Settings) -> anyhow::Result<Arc<dyn StudioStore>> {
    match settings.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryStudioStore::new()))
        }
        StorageBackend::Postgres => {
            let pool = inkbook_db::db::connection::create_pool(
                &settings.database.url,
                u32::from(settings.database.max_connections),
            )
            .await?;
            Ok(Arc::new(PgStudioStore::new(pool)))
        }
    }
}
