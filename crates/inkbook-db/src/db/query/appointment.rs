//! Query composition for `appointment`.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::enums::AppointmentStatus;
use crate::db::schema::appointment;
use crate::model::appointment::{Appointment, AppointmentChanges, NewAppointment};

/// Selection criteria for listing appointments.
///
/// `artist_id` and `bed_id` select by resource and combine with OR, so a
/// filter carrying both returns everything booked on either. The remaining
/// criteria combine with AND. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub artist_id: Option<Uuid>,
    pub bed_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub include_cancelled: bool,
}

impl AppointmentFilter {
    /// ## Summary
    /// Returns `true` if `appt` satisfies the filter.
    #[must_use]
    pub fn matches(&self, appt: &Appointment) -> bool {
        let resource_match = match (self.artist_id, self.bed_id) {
            (None, None) => true,
            (artist, bed) => {
                (artist.is_some() && appt.artist_id == artist)
                    || (bed.is_some() && appt.bed_id == bed)
            }
        };

        resource_match
            && self.client_id.is_none_or(|id| appt.client_id == id)
            && self.from.is_none_or(|from| appt.date >= from)
            && self.to.is_none_or(|to| appt.date <= to)
            && (self.include_cancelled || appt.status.holds_slot())
    }
}

/// ## Summary
/// Returns a query to select all appointments.
#[must_use]
pub fn all() -> appointment::BoxedQuery<'static, diesel::pg::Pg> {
    appointment::table.into_boxed()
}

/// ## Summary
/// Returns a query to find an appointment by ID.
#[must_use]
pub fn by_id(id: Uuid) -> appointment::BoxedQuery<'static, diesel::pg::Pg> {
    all().filter(appointment::id.eq(id))
}

/// ## Summary
/// Returns a query applying `filter`, ordered by local start.
#[must_use]
pub fn filtered(filter: &AppointmentFilter) -> appointment::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = all();

    query = match (filter.artist_id, filter.bed_id) {
        (Some(artist), Some(bed)) => query.filter(
            appointment::artist_id
                .eq(artist)
                .or(appointment::bed_id.eq(bed)),
        ),
        (Some(artist), None) => query.filter(appointment::artist_id.eq(artist)),
        (None, Some(bed)) => query.filter(appointment::bed_id.eq(bed)),
        (None, None) => query,
    };

    if let Some(client_id) = filter.client_id {
        query = query.filter(appointment::client_id.eq(client_id));
    }
    if let Some(from) = filter.from {
        query = query.filter(appointment::date.ge(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(appointment::date.le(to));
    }
    if !filter.include_cancelled {
        query = query.filter(appointment::status.ne(AppointmentStatus::Cancelled));
    }

    query.order((
        appointment::date.asc(),
        appointment::start_time.asc(),
        appointment::id.asc(),
    ))
}

/// ## Summary
/// Loads the appointments matching `filter`.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list(
    conn: &mut DbConnection<'_>,
    filter: &AppointmentFilter,
) -> QueryResult<Vec<Appointment>> {
    filtered(filter)
        .select(Appointment::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Loads a single appointment.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Appointment>> {
    by_id(id)
        .select(Appointment::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Inserts an appointment and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails, including violations of
/// the non-overlap exclusion constraints.
pub async fn insert(conn: &mut DbConnection<'_>, new: &NewAppointment) -> QueryResult<Appointment> {
    diesel::insert_into(appointment::table)
        .values(new)
        .returning(Appointment::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Applies `changes` to an appointment, returning the updated row or `None`
/// if no appointment has that ID.
///
/// ## Errors
/// Returns an error if the database operation fails, including violations of
/// the non-overlap exclusion constraints.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &AppointmentChanges,
) -> QueryResult<Option<Appointment>> {
    diesel::update(appointment::table.find(id))
        .set(changes)
        .returning(Appointment::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes an appointment. Returns `true` if a row was removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<bool> {
    let removed = diesel::delete(appointment::table.find(id))
        .execute(conn)
        .await?;
    Ok(removed > 0)
}
