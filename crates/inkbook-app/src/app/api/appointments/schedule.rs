use salvo::{Depot, Request, Response, handler, http::StatusCode};
use serde::Serialize;

use inkbook_db::model::appointment::Appointment;
use inkbook_service::scheduling::Conflict;
use inkbook_service::scheduling::workflow::{self, ScheduleRequest};

use crate::app::api::response::{json_body, render_result};
use crate::config::get_policy_from_depot;
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

/// Pre-flight check result.
#[derive(Debug, Serialize)]
pub struct ConflictReport {
    pub available: bool,
    pub conflicts: Vec<Conflict>,
}

/// ## Summary
/// POST /api/appointments - Book an appointment.
///
/// ## Errors
/// Returns HTTP 422 if required fields are missing
/// Returns HTTP 400 for malformed date, time or duration
/// Returns HTTP 404 if the client does not exist
/// Returns HTTP 409 listing every conflicting appointment
#[handler]
pub async fn schedule_appointment(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::CREATED, schedule(req, depot).await);
}

async fn schedule(req: &mut Request, depot: &Depot) -> AppResult<Appointment> {
    let request: ScheduleRequest = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let policy = get_policy_from_depot(depot)?;
    Ok(workflow::schedule_appointment(&*store, &policy, &request).await?)
}

/// ## Summary
/// POST /api/appointments/conflicts - Check a booking without persisting it.
///
/// ## Errors
/// Returns HTTP 422 if required fields are missing
/// Returns HTTP 400 for malformed date, time or duration
#[handler]
pub async fn check_conflicts(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, check(req, depot).await);
}

async fn check(req: &mut Request, depot: &Depot) -> AppResult<ConflictReport> {
    let request: ScheduleRequest = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let policy = get_policy_from_depot(depot)?;
    let conflicts = workflow::check_conflicts(&*store, &policy, &request).await?;
    Ok(ConflictReport {
        available: conflicts.is_empty(),
        conflicts,
    })
}
