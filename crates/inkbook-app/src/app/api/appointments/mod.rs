//! `/api/appointments` handlers.

mod edit;
mod query;
mod schedule;
mod session;

use salvo::Router;

use inkbook_core::constants::APPOINTMENTS_ROUTE_COMPONENT;

#[must_use]
pub fn routes() -> Router {
    Router::with_path(APPOINTMENTS_ROUTE_COMPONENT)
        .get(query::list_appointments)
        .post(schedule::schedule_appointment)
        .push(Router::with_path("conflicts").post(schedule::check_conflicts))
        .push(Router::with_path("availability").get(query::availability))
        .push(
            Router::with_path("{id}")
                .get(query::get_appointment)
                .patch(edit::reschedule_appointment)
                .delete(edit::delete_appointment)
                .push(Router::with_path("status").put(edit::change_status))
                .push(
                    Router::with_path("sessions")
                        .get(session::session_summary)
                        .push(Router::with_path("start").post(session::start_session))
                        .push(Router::with_path("stop").post(session::stop_session)),
                ),
        )
}
