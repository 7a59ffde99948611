use chrono::{DateTime, Utc};
use diesel::{pg::Pg, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::db::schema;

/// Studio client
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = schema::client)]
#[diesel(check_for_backend(Pg))]
pub struct Client {
    pub id: Uuid,
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert struct for creating new clients
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = schema::client)]
pub struct NewClient {
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}
