//! Client records.

use serde::Deserialize;
use uuid::Uuid;

use inkbook_db::model::client::{Client, NewClient};

use crate::error::{ServiceError, ServiceResult};
use crate::scheduling::SchedulingError;
use crate::store::ClientStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientRequest {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// ## Summary
/// Stores a new client. Blank optional fields are stored as absent.
///
/// ## Errors
/// `ValidationError` if `display_name` is missing or blank, and store errors.
#[tracing::instrument(skip(store, request))]
pub async fn create_client<S>(store: &S, request: &ClientRequest) -> ServiceResult<Client>
where
    S: ClientStore + ?Sized,
{
    let Some(display_name) = present(request.display_name.as_deref()) else {
        tracing::warn!("Client rejected: missing display name");
        return Err(SchedulingError::ValidationError {
            missing: vec!["display_name"],
        }
        .into());
    };

    let client = store
        .create_client(NewClient {
            display_name,
            email: present(request.email.as_deref()),
            phone: present(request.phone.as_deref()),
        })
        .await?;
    tracing::info!(client_id = %client.id, "Client created");
    Ok(client)
}

/// ## Summary
/// Loads a client.
///
/// ## Errors
/// `NotFound` if no client has that ID, and store errors.
#[tracing::instrument(skip(store))]
pub async fn get_client<S>(store: &S, id: Uuid) -> ServiceResult<Client>
where
    S: ClientStore + ?Sized,
{
    store
        .get_client(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("client {id}")))
}
