//! `/api/clients` handlers.

use salvo::{Depot, Request, Response, Router, handler, http::StatusCode};

use inkbook_core::constants::CLIENTS_ROUTE_COMPONENT;
use inkbook_db::model::client::Client;
use inkbook_service::client::{self, ClientRequest};

use crate::app::api::response::{json_body, path_id, render_result};
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// POST /api/clients - Create a client record.
///
/// ## Errors
/// Returns HTTP 422 if `display_name` is missing
#[handler]
async fn create_client(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::CREATED, create(req, depot).await);
}

async fn create(req: &mut Request, depot: &Depot) -> AppResult<Client> {
    let request: ClientRequest = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    Ok(client::create_client(&*store, &request).await?)
}

/// ## Summary
/// GET /api/clients/{id} - Fetch a client record.
///
/// ## Errors
/// Returns HTTP 404 if no client has that ID
#[handler]
async fn get_client(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, get(req, depot).await);
}

async fn get(req: &Request, depot: &Depot) -> AppResult<Client> {
    let id = path_id(req)?;
    let store = get_store_from_depot(depot)?;
    Ok(client::get_client(&*store, id).await?)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(CLIENTS_ROUTE_COMPONENT)
        .post(create_client)
        .push(Router::with_path("{id}").get(get_client))
}
