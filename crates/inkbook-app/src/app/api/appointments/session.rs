use salvo::{Depot, Request, Response, handler, http::StatusCode};

use inkbook_service::scheduling::session::SessionSummary;
use inkbook_service::scheduling::workflow;

use crate::app::api::response::{path_id, render_result};
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

#[derive(Debug, Clone, Copy)]
enum SessionAction {
    Summary,
    Start,
    Stop,
}

async fn run(req: &Request, depot: &Depot, action: SessionAction) -> AppResult<SessionSummary> {
    let id = path_id(req)?;
    let store = get_store_from_depot(depot)?;
    let summary = match action {
        SessionAction::Summary => workflow::session_summary(&*store, id).await?,
        SessionAction::Start => workflow::start_session(&*store, id).await?,
        SessionAction::Stop => workflow::stop_session(&*store, id).await?,
    };
    Ok(summary)
}

/// ## Summary
/// GET /api/appointments/{id}/sessions - Elapsed session time.
///
/// ## Errors
/// Returns HTTP 404 if no appointment has that ID
#[handler]
pub async fn session_summary(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, run(req, depot, SessionAction::Summary).await);
}

/// ## Summary
/// POST /api/appointments/{id}/sessions/start - Start the session timer.
///
/// ## Errors
/// Returns HTTP 404 if no appointment has that ID
/// Returns HTTP 409 unless the appointment is in progress and idle
#[handler]
pub async fn start_session(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, run(req, depot, SessionAction::Start).await);
}

/// ## Summary
/// POST /api/appointments/{id}/sessions/stop - Stop the session timer.
///
/// ## Errors
/// Returns HTTP 404 if no appointment has that ID
/// Returns HTTP 409 if no session is running
#[handler]
pub async fn stop_session(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, run(req, depot, SessionAction::Stop).await);
}
