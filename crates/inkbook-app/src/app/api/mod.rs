mod app_specific;
mod appointments;
mod clients;
pub mod response;

use salvo::Router;

// Re-export route constants from core
pub use inkbook_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, APPOINTMENTS_ROUTE_COMPONENT,
    APPOINTMENTS_ROUTE_PREFIX, CLIENTS_ROUTE_COMPONENT, CLIENTS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the main API router.
///
/// ## Errors
/// Returns an error if any child route handler fails to initialize.
pub fn routes() -> anyhow::Result<Router> {
    Ok(Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(appointments::routes())
        .push(clients::routes()))
}
