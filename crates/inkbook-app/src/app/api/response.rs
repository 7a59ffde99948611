//! JSON error bodies and shared request parsing for the API handlers.

use chrono::NaiveDate;
use salvo::{Request, Response, http::StatusCode, writing::Json};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use inkbook_service::error::ServiceError;
use inkbook_service::scheduling::{Conflict, SchedulingError};
use inkbook_service::scheduling::interval::parse_date;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code, e.g. `scheduling_conflict`.
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<Conflict>>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let (_, code) = err.status();
        let (missing, conflicts) = match err {
            AppError::ServiceError(ServiceError::Scheduling(
                SchedulingError::ValidationError { missing },
            )) => (Some(missing.clone()), None),
            AppError::ServiceError(ServiceError::Scheduling(
                SchedulingError::SchedulingConflict(conflicts),
            )) => (None, Some(conflicts.clone())),
            _ => (None, None),
        };
        let message = if err.status().0.is_server_error() {
            "Internal server error".to_string()
        } else {
            err.to_string()
        };

        Self {
            error: code,
            message,
            missing,
            conflicts,
        }
    }
}

/// ## Summary
/// Renders `err` as a JSON error body with its mapped status.
pub fn render_error(res: &mut Response, err: &AppError) {
    let (status, code) = err.status();
    if status.is_server_error() {
        tracing::error!(error = ?err, code, "Request failed");
    } else {
        tracing::debug!(error = %err, code, "Request rejected");
    }
    res.status_code(status);
    res.render(Json(ErrorResponse::from(err)));
}

/// ## Summary
/// Renders the outcome of a handler: `status` and the JSON value, or the
/// mapped error.
pub fn render_result<T: Serialize + Send>(
    res: &mut Response,
    status: StatusCode,
    result: AppResult<T>,
) {
    match result {
        Ok(value) => {
            res.status_code(status);
            res.render(Json(value));
        }
        Err(err) => render_error(res, &err),
    }
}

/// ## Summary
/// Parses the JSON request body.
///
/// ## Errors
/// Returns `BadRequest` if the body is not valid JSON for `T`.
pub async fn json_body<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}

/// ## Summary
/// Reads the `{id}` path parameter.
///
/// ## Errors
/// Returns `BadRequest` if it is missing or not a UUID.
pub fn path_id(req: &Request) -> AppResult<Uuid> {
    let raw = req
        .param::<String>("id")
        .ok_or_else(|| AppError::BadRequest("ID required".to_string()))?;
    Uuid::parse_str(&raw).map_err(|e| AppError::BadRequest(format!("Invalid ID '{raw}': {e}")))
}

/// ## Summary
/// Reads an optional non-blank query parameter.
#[must_use]
pub fn query_str(req: &Request, name: &str) -> Option<String> {
    req.query::<String>(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// ## Summary
/// Reads an optional UUID query parameter.
///
/// ## Errors
/// Returns `BadRequest` if the value is not a UUID.
pub fn query_uuid(req: &Request, name: &str) -> AppResult<Option<Uuid>> {
    query_str(req, name)
        .map(|raw| {
            Uuid::parse_str(&raw)
                .map_err(|e| AppError::BadRequest(format!("Invalid {name} '{raw}': {e}")))
        })
        .transpose()
}

/// ## Summary
/// Reads an optional `YYYY-MM-DD` query parameter.
///
/// ## Errors
/// Returns `MalformedScheduleInput` if the value is not a date.
pub fn query_date(req: &Request, name: &str) -> AppResult<Option<NaiveDate>> {
    Ok(query_str(req, name)
        .map(|raw| parse_date(&raw))
        .transpose()?)
}

/// ## Summary
/// Reads an optional boolean query parameter (`true`/`false`, `1`/`0`).
///
/// ## Errors
/// Returns `BadRequest` for any other value.
pub fn query_bool(req: &Request, name: &str) -> AppResult<Option<bool>> {
    query_str(req, name)
        .map(|raw| match raw.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(AppError::BadRequest(format!("Invalid {name} '{raw}'"))),
        })
        .transpose()
}
