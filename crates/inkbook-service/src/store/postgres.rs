//! `PostgreSQL` studio store on the shared diesel-async pool.
//!
//! The non-overlap rule is enforced by the `appointment_artist_no_overlap`
//! and `appointment_bed_no_overlap` exclusion constraints.

use async_trait::async_trait;
use chrono::Utc;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use inkbook_db::db::DbProvider;
use inkbook_db::db::connection::DbPool;
use inkbook_db::db::query::appointment::AppointmentFilter;
use inkbook_db::db::query::{appointment, client, session_event};
use inkbook_db::error::is_overlap_violation;
use inkbook_db::model::appointment::{Appointment, AppointmentChanges, NewAppointment};
use inkbook_db::model::client::{Client, NewClient};
use inkbook_db::model::session_event::{NewSessionEvent, SessionEvent};

use super::{AppointmentStore, ClientStore};
use crate::error::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct PgStudioStore {
    pool: DbPool,
}

impl PgStudioStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(err: DieselError, missing: impl FnOnce() -> String) -> ServiceError {
    if is_overlap_violation(&err) {
        return ServiceError::OverlapRejected;
    }
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            ServiceError::NotFound(missing())
        }
        other => other.into(),
    }
}

#[async_trait]
impl AppointmentStore for PgStudioStore {
    #[tracing::instrument(skip(self))]
    async fn health_check(&self) -> ServiceResult<bool> {
        let mut conn = self.pool.get_connection().await?;
        diesel::sql_query("SELECT 1").execute(&mut conn).await?;
        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> ServiceResult<Vec<Appointment>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(appointment::list(&mut conn, filter).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn get_appointment(&self, id: Uuid) -> ServiceResult<Option<Appointment>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(appointment::get(&mut conn, id).await?)
    }

    #[tracing::instrument(skip(self, new), fields(client_id = %new.client_id))]
    async fn create_appointment(&self, new: NewAppointment) -> ServiceResult<Appointment> {
        let mut conn = self.pool.get_connection().await?;
        appointment::insert(&mut conn, &new)
            .await
            .map_err(|e| map_write_error(e, || format!("client {}", new.client_id)))
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update_appointment(
        &self,
        id: Uuid,
        mut changes: AppointmentChanges,
    ) -> ServiceResult<Option<Appointment>> {
        changes.updated_at.get_or_insert_with(Utc::now);
        let mut conn = self.pool.get_connection().await?;
        appointment::update(&mut conn, id, &changes)
            .await
            .map_err(|e| map_write_error(e, || format!("appointment {id}")))
    }

    #[tracing::instrument(skip(self, changes, event))]
    async fn update_appointment_with_event(
        &self,
        id: Uuid,
        mut changes: AppointmentChanges,
        event: Option<NewSessionEvent>,
    ) -> ServiceResult<Option<Appointment>> {
        changes.updated_at.get_or_insert_with(Utc::now);
        let mut conn = self.pool.get_connection().await?;
        conn.transaction::<_, ServiceError, _>(move |conn| {
            async move {
                let updated = appointment::update(conn, id, &changes)
                    .await
                    .map_err(|e| map_write_error(e, || format!("appointment {id}")))?;
                if let (Some(_), Some(event)) = (&updated, event) {
                    session_event::insert(conn, &event).await?;
                }
                Ok(updated)
            }
            .scope_boxed()
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_appointment(&self, id: Uuid) -> ServiceResult<bool> {
        let mut conn = self.pool.get_connection().await?;
        Ok(appointment::delete(&mut conn, id).await?)
    }

    #[tracing::instrument(skip(self, new), fields(appointment_id = %new.appointment_id))]
    async fn append_session_event(&self, new: NewSessionEvent) -> ServiceResult<SessionEvent> {
        let mut conn = self.pool.get_connection().await?;
        session_event::insert(&mut conn, &new)
            .await
            .map_err(|e| map_write_error(e, || format!("appointment {}", new.appointment_id)))
    }

    #[tracing::instrument(skip(self))]
    async fn list_session_events(&self, appointment_id: Uuid) -> ServiceResult<Vec<SessionEvent>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(session_event::for_appointment(&mut conn, appointment_id).await?)
    }
}

#[async_trait]
impl ClientStore for PgStudioStore {
    #[tracing::instrument(skip(self, new))]
    async fn create_client(&self, new: NewClient) -> ServiceResult<Client> {
        let mut conn = self.pool.get_connection().await?;
        Ok(client::insert(&mut conn, &new).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn get_client(&self, id: Uuid) -> ServiceResult<Option<Client>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(client::get(&mut conn, id).await?)
    }
}
