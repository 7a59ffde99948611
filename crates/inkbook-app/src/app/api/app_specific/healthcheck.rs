use salvo::{Depot, Response, Router, handler, http::StatusCode};

use inkbook_service::store::AppointmentStore;

use crate::store_handler::get_store_from_depot;

/// ## Summary
/// Liveness check. Reports 503 if the store cannot serve requests.
#[handler]
async fn healthcheck(depot: &mut Depot, res: &mut Response) -> &'static str {
    let Ok(store) = get_store_from_depot(depot) else {
        return "OK";
    };
    match store.health_check().await {
        Ok(true) => "OK",
        Ok(false) => {
            res.status_code(StatusCode::SERVICE_UNAVAILABLE);
            "UNAVAILABLE"
        }
        Err(e) => {
            tracing::error!(error = %e, "Store health check failed");
            res.status_code(StatusCode::SERVICE_UNAVAILABLE);
            "UNAVAILABLE"
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("healthcheck").get(healthcheck)
}
