//! Session timing derived from the start/stop event log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use inkbook_db::db::enums::SessionEventKind;
use inkbook_db::model::session_event::SessionEvent;

/// Time actually spent working on an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub appointment_id: Uuid,
    pub elapsed_seconds: i64,
    pub running: bool,
    pub running_since: Option<DateTime<Utc>>,
    /// Number of started sessions.
    pub session_count: usize,
}

/// ## Summary
/// Folds `events` (in recording order) into a summary. A running session
/// counts up to `now`.
///
/// Repeated starts while running and stops while idle are ignored.
#[must_use]
pub fn summarize_sessions(
    appointment_id: Uuid,
    events: &[SessionEvent],
    now: DateTime<Utc>,
) -> SessionSummary {
    let mut elapsed_seconds = 0;
    let mut running_since: Option<DateTime<Utc>> = None;
    let mut session_count = 0;

    for event in events {
        match (event.kind, running_since) {
            (SessionEventKind::Start, None) => {
                running_since = Some(event.recorded_at);
                session_count += 1;
            }
            (SessionEventKind::Stop, Some(since)) => {
                elapsed_seconds += (event.recorded_at - since).num_seconds().max(0);
                running_since = None;
            }
            _ => {}
        }
    }

    if let Some(since) = running_since {
        elapsed_seconds += (now - since).num_seconds().max(0);
    }

    SessionSummary {
        appointment_id,
        elapsed_seconds,
        running: running_since.is_some(),
        running_since,
        session_count,
    }
}
