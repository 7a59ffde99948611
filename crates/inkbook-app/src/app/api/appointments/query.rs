use chrono::{NaiveDate, NaiveTime};
use salvo::{Depot, Request, Response, handler, http::StatusCode};
use serde::Serialize;

use inkbook_db::db::query::appointment::AppointmentFilter;
use inkbook_db::model::appointment::Appointment;
use inkbook_service::error::ServiceError;
use inkbook_service::scheduling::SchedulingError;
use inkbook_service::scheduling::slots::{OpenSlot, SlotQuery};
use inkbook_service::scheduling::workflow::{self, DurationInput};
use inkbook_service::store::AppointmentStore;

use crate::app::api::response::{
    path_id, query_bool, query_date, query_str, query_uuid, render_result,
};
use crate::config::get_policy_from_depot;
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// GET /api/appointments - List appointments.
///
/// Query parameters: `artist_id`, `bed_id`, `client_id`, `from`, `to`
/// (inclusive `YYYY-MM-DD`) and `include_cancelled`. `artist_id` and
/// `bed_id` together select bookings on either resource.
///
/// ## Errors
/// Returns HTTP 400 for malformed parameters
#[handler]
pub async fn list_appointments(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, list(req, depot).await);
}

async fn list(req: &Request, depot: &Depot) -> AppResult<Vec<Appointment>> {
    let filter = AppointmentFilter {
        artist_id: query_uuid(req, "artist_id")?,
        bed_id: query_uuid(req, "bed_id")?,
        client_id: query_uuid(req, "client_id")?,
        from: query_date(req, "from")?,
        to: query_date(req, "to")?,
        include_cancelled: query_bool(req, "include_cancelled")?.unwrap_or(false),
    };
    let store = get_store_from_depot(depot)?;
    Ok(store.list_appointments(&filter).await?)
}

/// ## Summary
/// GET /api/appointments/{id} - Fetch one appointment.
///
/// ## Errors
/// Returns HTTP 404 if no appointment has that ID
#[handler]
pub async fn get_appointment(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, get(req, depot).await);
}

async fn get(req: &Request, depot: &Depot) -> AppResult<Appointment> {
    let id = path_id(req)?;
    let store = get_store_from_depot(depot)?;
    store
        .get_appointment(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("appointment {id}")).into())
}

#[derive(Debug, Serialize)]
pub struct Availability {
    pub date: NaiveDate,
    pub duration_minutes: i64,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub slots: Vec<OpenSlot>,
}

/// ## Summary
/// GET /api/appointments/availability - Bookable start times for a day.
///
/// Query parameters: `artist_id`, `date` and `duration_minutes` are
/// required, `bed_id` is optional.
///
/// ## Errors
/// Returns HTTP 422 if required parameters are missing
/// Returns HTTP 400 for malformed parameters or duration
#[handler]
pub async fn availability(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, open_slots(req, depot).await);
}

async fn open_slots(req: &Request, depot: &Depot) -> AppResult<Availability> {
    let artist_id = query_uuid(req, "artist_id")?;
    let bed_id = query_uuid(req, "bed_id")?;
    let date = query_date(req, "date")?;
    let duration = query_str(req, "duration_minutes");

    let (Some(artist_id), Some(date), Some(duration)) = (artist_id, date, duration) else {
        let mut missing = Vec::new();
        if artist_id.is_none() {
            missing.push("artist_id");
        }
        if date.is_none() {
            missing.push("date");
        }
        if query_str(req, "duration_minutes").is_none() {
            missing.push("duration_minutes");
        }
        return Err(SchedulingError::ValidationError { missing }.into());
    };

    let query = SlotQuery {
        artist_id,
        bed_id,
        date,
        duration_minutes: DurationInput::Text(duration).minutes()?,
    };
    let store = get_store_from_depot(depot)?;
    let policy = get_policy_from_depot(depot)?;
    let slots = workflow::find_open_slots(&*store, &policy, &query).await?;

    Ok(Availability {
        date,
        duration_minutes: query.duration_minutes,
        opens_at: policy.opens_at,
        closes_at: policy.closes_at,
        slots,
    })
}
