//! Query composition for `client`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::client;
use crate::model::client::{Client, NewClient};

/// ## Summary
/// Inserts a client and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(conn: &mut DbConnection<'_>, new: &NewClient) -> QueryResult<Client> {
    diesel::insert_into(client::table)
        .values(new)
        .returning(Client::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Loads a single client.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Client>> {
    client::table
        .find(id)
        .select(Client::as_select())
        .first(conn)
        .await
        .optional()
}
