use salvo::{Depot, Request, Response, handler, http::StatusCode};
use serde::Deserialize;

use inkbook_db::db::enums::AppointmentStatus;
use inkbook_db::model::appointment::Appointment;
use inkbook_service::scheduling::SchedulingError;
use inkbook_service::scheduling::workflow::{self, RescheduleRequest};

use crate::app::api::response::{json_body, path_id, render_error, render_result};
use crate::config::get_policy_from_depot;
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: Option<String>,
}

/// ## Summary
/// PATCH /api/appointments/{id} - Move or edit an appointment.
///
/// ## Errors
/// Returns HTTP 404 if no appointment has that ID
/// Returns HTTP 400 for malformed date, time or duration
/// Returns HTTP 409 listing every conflicting appointment
#[handler]
pub async fn reschedule_appointment(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, reschedule(req, depot).await);
}

async fn reschedule(req: &mut Request, depot: &Depot) -> AppResult<Appointment> {
    let id = path_id(req)?;
    let request: RescheduleRequest = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let policy = get_policy_from_depot(depot)?;
    Ok(workflow::reschedule_appointment(&*store, &policy, id, &request).await?)
}

/// ## Summary
/// PUT /api/appointments/{id}/status - Change the status of an appointment.
///
/// ## Errors
/// Returns HTTP 422 if `status` is missing
/// Returns HTTP 400 for an unknown status
/// Returns HTTP 409 for an illegal transition or a conflict on reinstating
#[handler]
pub async fn change_status(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, update_status(req, depot).await);
}

async fn update_status(req: &mut Request, depot: &Depot) -> AppResult<Appointment> {
    let id = path_id(req)?;
    let request: StatusChangeRequest = json_body(req).await?;
    let Some(raw) = request.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(SchedulingError::ValidationError {
            missing: vec!["status"],
        }
        .into());
    };
    let status: AppointmentStatus = raw.parse()?;

    let store = get_store_from_depot(depot)?;
    let policy = get_policy_from_depot(depot)?;
    Ok(workflow::change_status(&*store, &policy, id, status).await?)
}

/// ## Summary
/// DELETE /api/appointments/{id} - Permanently remove an appointment.
///
/// ## Errors
/// Returns HTTP 404 if no appointment has that ID
#[handler]
pub async fn delete_appointment(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match delete(req, depot).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(err) => render_error(res, &err),
    }
}

async fn delete(req: &Request, depot: &Depot) -> AppResult<()> {
    let id = path_id(req)?;
    let store = get_store_from_depot(depot)?;
    Ok(workflow::delete_appointment(&*store, id).await?)
}
