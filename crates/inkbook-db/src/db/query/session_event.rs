//! Query composition for `session_event`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::session_event;
use crate::model::session_event::{NewSessionEvent, SessionEvent};

/// ## Summary
/// Records a session event.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    new: &NewSessionEvent,
) -> QueryResult<SessionEvent> {
    diesel::insert_into(session_event::table)
        .values(new)
        .returning(SessionEvent::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Loads the events of an appointment in recording order.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn for_appointment(
    conn: &mut DbConnection<'_>,
    appointment_id: Uuid,
) -> QueryResult<Vec<SessionEvent>> {
    session_event::table
        .filter(session_event::appointment_id.eq(appointment_id))
        .order((session_event::recorded_at.asc(), session_event::id.asc()))
        .select(SessionEvent::as_select())
        .load(conn)
        .await
}
