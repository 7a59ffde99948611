#![allow(clippy::unused_async, unused_must_use)]
//! Tests for booking, listing and editing appointments.
//!
//! Verifies required-field reporting, conflict rejection and the
//! resources a conflict is reported on.

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime, TimeDelta, Utc};
use salvo::async_trait;
use salvo::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use inkbook_test::component::db::enums::AppointmentStatus;
use inkbook_test::component::db::query::appointment::AppointmentFilter;
use inkbook_test::component::error::ServiceResult;
use inkbook_test::component::model::appointment::{
    Appointment, AppointmentChanges, NewAppointment,
};
use inkbook_test::component::model::client::{Client, NewClient};
use inkbook_test::component::model::session_event::{NewSessionEvent, SessionEvent};
use inkbook_test::component::store::{
    AppointmentStore, ClientStore, MemoryStudioStore, StudioStore,
};

use super::helpers::*;

// ============================================================================
// Booking
// ============================================================================

/// ## Summary
/// A free slot is booked in `scheduled` status.
#[test_log::test(tokio::test)]
async fn book_free_slot() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();

    let response = app
        .book(client, artist, None, "14:00", 90)
        .await
        .assert_status(StatusCode::CREATED);

    let body = response.json();
    assert_eq!(body["status"], "scheduled");
    assert_eq!(body["artist_id"], json!(artist));
    assert_eq!(body["start_time"], "14:00:00");
    assert_eq!(body["duration_minutes"], 90);
}

/// ## Summary
/// Every missing field is listed, in a fixed order.
#[test_log::test(tokio::test)]
async fn book_reports_all_missing_fields() {
    let app = TestApp::new();

    let response = TestRequest::post("/api/appointments")
        .json(json!({ "artist_id": Uuid::now_v7(), "time": "  " }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error("validation_error");

    assert_eq!(
        response.json()["missing"],
        json!(["client_id", "date", "time", "duration_minutes"])
    );
}

/// ## Summary
/// Unparseable dates and times are client errors, not validation errors.
#[test_log::test(tokio::test)]
async fn book_rejects_malformed_date_and_time() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();

    TestRequest::post("/api/appointments")
        .json(booking(client, artist, None, "2025-02-30", "14:00", 60))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("malformed_schedule_input");

    TestRequest::post("/api/appointments")
        .json(booking(client, artist, None, DAY, "25:00", 60))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("malformed_schedule_input");
}

/// ## Summary
/// Durations must be positive whole minutes up to a day.
#[test_log::test(tokio::test)]
async fn book_rejects_invalid_durations() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();

    for duration in [
        json!(0),
        json!(-30),
        json!(1441),
        json!("soon"),
        json!(45.5),
        json!(true),
        json!({ "hours": 1 }),
    ] {
        let mut body = booking(client, artist, None, DAY, "14:00", 60);
        body["duration_minutes"] = duration;
        TestRequest::post("/api/appointments")
            .json(body)
            .send(&app.service)
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error("invalid_duration");
    }
}

/// ## Summary
/// Numeric strings are accepted as durations.
#[test_log::test(tokio::test)]
async fn book_accepts_numeric_string_duration() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;

    let mut body = booking(client, Uuid::now_v7(), None, DAY, "14:00", 60);
    body["duration_minutes"] = json!("120");
    let response = TestRequest::post("/api/appointments")
        .json(body)
        .send(&app.service)
        .await
        .assert_status(StatusCode::CREATED);

    assert_eq!(response.json()["duration_minutes"], 120);
}

/// ## Summary
/// Blank IDs count as missing; IDs that are not UUIDs are malformed input.
#[test_log::test(tokio::test)]
async fn book_checks_id_fields() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;

    let mut body = booking(client, Uuid::now_v7(), None, DAY, "14:00", 60);
    body["client_id"] = json!("");
    let response = TestRequest::post("/api/appointments")
        .json(body)
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error("validation_error");
    assert_eq!(response.json()["missing"], json!(["client_id"]));

    let mut body = booking(client, Uuid::now_v7(), None, DAY, "14:00", 60);
    body["artist_id"] = json!("artist-7");
    TestRequest::post("/api/appointments")
        .json(body)
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("malformed_schedule_input");
}

#[test_log::test(tokio::test)]
async fn book_for_unknown_client_is_not_found() {
    let app = TestApp::new();

    app.book(Uuid::now_v7(), Uuid::now_v7(), None, "14:00", 60)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("not_found");
}

#[test_log::test(tokio::test)]
async fn book_rejects_invalid_json() {
    let app = TestApp::new();

    TestRequest::post("/api/appointments")
        .json(json!("not an object"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("bad_request");
}

// ============================================================================
// Conflicts
// ============================================================================

/// ## Summary
/// An overlapping booking for the same artist is rejected and the response
/// names the appointment it collides with.
#[test_log::test(tokio::test)]
async fn overlapping_artist_booking_is_rejected() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();

    let first = app
        .book(client, artist, None, "14:00", 120)
        .await
        .assert_status(StatusCode::CREATED)
        .id();

    let response = app
        .book(client, artist, None, "15:00", 60)
        .await
        .assert_status(StatusCode::CONFLICT)
        .assert_error("scheduling_conflict");

    assert_eq!(response.conflict_ids(), vec![first]);
    assert_eq!(response.json()["conflicts"][0]["reason"], "artist");
}

/// ## Summary
/// Every overlapping appointment is listed, not just the first.
#[test_log::test(tokio::test)]
async fn conflict_lists_every_overlap() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();
    let bed = Uuid::now_v7();

    let by_artist = app
        .book(client, artist, None, "12:00", 60)
        .await
        .assert_status(StatusCode::CREATED)
        .id();
    let by_bed = app
        .book(client, Uuid::now_v7(), Some(bed), "13:00", 60)
        .await
        .assert_status(StatusCode::CREATED)
        .id();

    let response = app
        .book(client, artist, Some(bed), "12:30", 60)
        .await
        .assert_status(StatusCode::CONFLICT);

    assert_eq!(response.conflict_ids(), vec![by_artist, by_bed]);
    let body = response.json();
    assert_eq!(body["conflicts"][0]["reason"], "artist");
    assert_eq!(body["conflicts"][1]["reason"], "bed");
}

/// ## Summary
/// End-exclusive intervals let bookings sit back to back.
#[test_log::test(tokio::test)]
async fn back_to_back_bookings_do_not_conflict() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();

    app.book(client, artist, None, "10:00", 60)
        .await
        .assert_status(StatusCode::CREATED);
    app.book(client, artist, None, "11:00", 60)
        .await
        .assert_status(StatusCode::CREATED);
    app.book(client, artist, None, "09:00", 60)
        .await
        .assert_status(StatusCode::CREATED);
}

#[test_log::test(tokio::test)]
async fn different_artists_without_beds_do_not_conflict() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;

    app.book(client, Uuid::now_v7(), None, "14:00", 60)
        .await
        .assert_status(StatusCode::CREATED);
    app.book(client, Uuid::now_v7(), None, "14:00", 60)
        .await
        .assert_status(StatusCode::CREATED);
}

/// ## Summary
/// A booking that runs past midnight blocks the next morning.
#[test_log::test(tokio::test)]
async fn booking_across_midnight_blocks_next_day() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();

    let late = app
        .book(client, artist, None, "23:00", 180)
        .await
        .assert_status(StatusCode::CREATED)
        .id();

    let response = TestRequest::post("/api/appointments")
        .json(booking(client, artist, None, "2025-03-11", "01:00", 60))
        .send(&app.service)
        .await
        .assert_status(StatusCode::CONFLICT);
    assert_eq!(response.conflict_ids(), vec![late]);

    TestRequest::post("/api/appointments")
        .json(booking(client, artist, None, "2025-03-11", "02:00", 60))
        .send(&app.service)
        .await
        .assert_status(StatusCode::CREATED);
}

/// ## Summary
/// A legacy record without an artist is skipped rather than blocking a
/// booking that overlaps it.
#[test_log::test(tokio::test)]
async fn legacy_record_without_artist_is_skipped() {
    let client = Client {
        id: Uuid::now_v7(),
        display_name: "Mika".to_string(),
        email: None,
        phone: None,
        created_at: Utc::now(),
    };
    let legacy = Appointment {
        id: Uuid::now_v7(),
        client_id: client.id,
        artist_id: None,
        bed_id: None,
        date: NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date"),
        start_time: NaiveTime::from_hms_opt(14, 0, 0).expect("valid time"),
        duration_minutes: 60,
        starts_at: NaiveDate::from_ymd_opt(2025, 3, 10)
            .and_then(|d| d.and_hms_opt(14, 0, 0))
            .expect("valid instant")
            .and_utc(),
        ends_at: NaiveDate::from_ymd_opt(2025, 3, 10)
            .and_then(|d| d.and_hms_opt(15, 0, 0))
            .expect("valid instant")
            .and_utc(),
        status: AppointmentStatus::Scheduled,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let client_id = client.id;
    let app = TestApp::with_store(
        MemoryStudioStore::new()
            .with_clients([client])
            .with_appointments([legacy]),
    );

    app.book(client_id, Uuid::now_v7(), None, "14:00", 60)
        .await
        .assert_status(StatusCode::CREATED);
}

/// ## Summary
/// Cancelling an appointment releases its slot.
#[test_log::test(tokio::test)]
async fn cancelled_appointment_frees_slot() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();

    let first = app
        .book(client, artist, None, "14:00", 60)
        .await
        .assert_status(StatusCode::CREATED)
        .id();

    TestRequest::put(&format!("/api/appointments/{first}/status"))
        .json(json!({ "status": "cancelled" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    app.book(client, artist, None, "14:00", 60)
        .await
        .assert_status(StatusCode::CREATED);
}

/// ## Summary
/// The pre-flight check reports conflicts without booking anything.
#[test_log::test(tokio::test)]
async fn conflict_check_does_not_persist() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();

    let existing = app
        .book(client, artist, None, "14:00", 60)
        .await
        .assert_status(StatusCode::CREATED)
        .id();

    let busy = TestRequest::post("/api/appointments/conflicts")
        .json(booking(client, artist, None, DAY, "14:30", 60))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(busy["available"], false);
    assert_eq!(busy["conflicts"][0]["appointment"]["id"], json!(existing));

    let free = TestRequest::post("/api/appointments/conflicts")
        .json(booking(client, artist, None, DAY, "15:00", 60))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(free["available"], true);
    assert_eq!(free["conflicts"], json!([]));

    let listed = TestRequest::get("/api/appointments")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

/// ## Summary
/// Of several simultaneous bookings for one slot exactly one wins.
#[test_log::test(tokio::test)]
async fn concurrent_bookings_for_same_slot() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();

    let attempts = (0..4).map(|_| app.book(client, artist, None, "14:00", 60));
    let responses = futures::future::join_all(attempts).await;

    let created = responses
        .iter()
        .filter(|r| r.status == StatusCode::CREATED)
        .count();
    let rejected = responses
        .iter()
        .filter(|r| r.status == StatusCode::CONFLICT)
        .count();
    assert_eq!(created, 1);
    assert_eq!(rejected, 3);
}

/// Memory store where another writer books `competitor` just before the
/// next booking is written.
struct ContestedStore {
    inner: MemoryStudioStore,
    competitor: Mutex<Option<NewAppointment>>,
}

impl ContestedStore {
    async fn let_competitor_in(&self) -> ServiceResult<()> {
        let competitor = self.competitor.lock().expect("competitor lock").take();
        if let Some(new) = competitor {
            self.inner.create_appointment(new).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for ContestedStore {
    async fn health_check(&self) -> ServiceResult<bool> {
        self.inner.health_check().await
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> ServiceResult<Vec<Appointment>> {
        self.inner.list_appointments(filter).await
    }

    async fn get_appointment(&self, id: Uuid) -> ServiceResult<Option<Appointment>> {
        self.inner.get_appointment(id).await
    }

    async fn create_appointment(&self, new: NewAppointment) -> ServiceResult<Appointment> {
        self.let_competitor_in().await?;
        self.inner.create_appointment(new).await
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
    ) -> ServiceResult<Option<Appointment>> {
        self.inner.update_appointment(id, changes).await
    }

    async fn update_appointment_with_event(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
        event: Option<NewSessionEvent>,
    ) -> ServiceResult<Option<Appointment>> {
        self.inner
            .update_appointment_with_event(id, changes, event)
            .await
    }

    async fn delete_appointment(&self, id: Uuid) -> ServiceResult<bool> {
        self.inner.delete_appointment(id).await
    }

    async fn append_session_event(&self, new: NewSessionEvent) -> ServiceResult<SessionEvent> {
        self.inner.append_session_event(new).await
    }

    async fn list_session_events(&self, appointment_id: Uuid) -> ServiceResult<Vec<SessionEvent>> {
        self.inner.list_session_events(appointment_id).await
    }
}

#[async_trait]
impl ClientStore for ContestedStore {
    async fn create_client(&self, new: NewClient) -> ServiceResult<Client> {
        self.inner.create_client(new).await
    }

    async fn get_client(&self, id: Uuid) -> ServiceResult<Option<Client>> {
        self.inner.get_client(id).await
    }
}

/// ## Summary
/// A booking that passes the pre-flight check but loses the slot to a
/// concurrent writer is reported as a conflict with the winning booking.
#[test_log::test(tokio::test)]
async fn booking_that_loses_race_reports_winner() {
    let client = Client {
        id: Uuid::now_v7(),
        display_name: "Mika".to_string(),
        email: None,
        phone: None,
        created_at: Utc::now(),
    };
    let artist = Uuid::now_v7();
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date");
    let start_time = NaiveTime::from_hms_opt(14, 30, 0).expect("valid time");
    let starts_at = date.and_time(start_time).and_utc();
    let competitor = NewAppointment {
        client_id: client.id,
        artist_id: Some(artist),
        bed_id: None,
        date,
        start_time,
        duration_minutes: 60,
        starts_at,
        ends_at: starts_at + TimeDelta::hours(1),
        status: AppointmentStatus::Scheduled,
        notes: None,
    };

    let client_id = client.id;
    let inner = MemoryStudioStore::new().with_clients([client]);
    let shared: Arc<dyn StudioStore> = Arc::new(ContestedStore {
        inner: inner.clone(),
        competitor: Mutex::new(Some(competitor)),
    });
    let app = TestApp::with_shared_store(shared, inner);

    let response = app
        .book(client_id, artist, None, "14:00", 60)
        .await
        .assert_status(StatusCode::CONFLICT)
        .assert_error("scheduling_conflict");

    let stored = app
        .store
        .list_appointments(&AppointmentFilter::default())
        .await
        .expect("listed");
    assert_eq!(stored.len(), 1);
    assert_eq!(response.conflict_ids(), vec![stored[0].id]);
}

// ============================================================================
// Listing and editing
// ============================================================================

#[test_log::test(tokio::test)]
async fn list_filters_by_artist_and_date() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();
    let other = Uuid::now_v7();

    let mine = app
        .book(client, artist, None, "10:00", 60)
        .await
        .assert_status(StatusCode::CREATED)
        .id();
    app.book(client, other, None, "10:00", 60)
        .await
        .assert_status(StatusCode::CREATED);
    TestRequest::post("/api/appointments")
        .json(booking(client, artist, None, "2025-03-12", "10:00", 60))
        .send(&app.service)
        .await
        .assert_status(StatusCode::CREATED);

    let listed = TestRequest::get(&format!(
        "/api/appointments?artist_id={artist}&from={DAY}&to={DAY}"
    ))
    .send(&app.service)
    .await
    .assert_status(StatusCode::OK)
    .json();

    let ids: Vec<_> = listed
        .as_array()
        .map(|a| a.iter().map(|x| x["id"].clone()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![json!(mine)]);
}

#[test_log::test(tokio::test)]
async fn list_hides_cancelled_unless_asked() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;

    let id = app
        .book(client, Uuid::now_v7(), None, "10:00", 60)
        .await
        .assert_status(StatusCode::CREATED)
        .id();
    TestRequest::put(&format!("/api/appointments/{id}/status"))
        .json(json!({ "status": "cancelled" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    let hidden = TestRequest::get("/api/appointments")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(hidden, json!([]));

    let shown = TestRequest::get("/api/appointments?include_cancelled=true")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(shown[0]["id"], json!(id));
}

#[test_log::test(tokio::test)]
async fn list_rejects_malformed_filters() {
    let app = TestApp::new();

    TestRequest::get("/api/appointments?artist_id=nope")
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    TestRequest::get("/api/appointments?from=03/10/2025")
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn get_appointment_by_id() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;

    let id = app
        .book(client, Uuid::now_v7(), None, "10:00", 60)
        .await
        .assert_status(StatusCode::CREATED)
        .id();

    let body = TestRequest::get(&format!("/api/appointments/{id}"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["client_id"], json!(client));

    TestRequest::get(&format!("/api/appointments/{}", Uuid::now_v7()))
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    TestRequest::get("/api/appointments/not-a-uuid")
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

/// ## Summary
/// Moving an appointment ignores its own current slot but not others.
#[test_log::test(tokio::test)]
async fn reschedule_checks_other_appointments_only() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();

    let moving = app
        .book(client, artist, None, "10:00", 60)
        .await
        .assert_status(StatusCode::CREATED)
        .id();
    let blocker = app
        .book(client, artist, None, "12:00", 60)
        .await
        .assert_status(StatusCode::CREATED)
        .id();

    let moved = TestRequest::patch(&format!("/api/appointments/{moving}"))
        .json(json!({ "time": "10:30", "notes": "sleeve outline" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(moved["start_time"], "10:30:00");
    assert_eq!(moved["notes"], "sleeve outline");

    let response = TestRequest::patch(&format!("/api/appointments/{moving}"))
        .json(json!({ "time": "11:30" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::CONFLICT);
    assert_eq!(response.conflict_ids(), vec![blocker]);

    let cleared = TestRequest::patch(&format!("/api/appointments/{moving}"))
        .json(json!({ "notes": "" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert!(cleared["notes"].is_null());
}

#[test_log::test(tokio::test)]
async fn reschedule_unknown_appointment() {
    let app = TestApp::new();

    TestRequest::patch(&format!("/api/appointments/{}", Uuid::now_v7()))
        .json(json!({ "time": "11:30" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn delete_appointment_frees_slot() {
    let app = TestApp::new();
    let client = app.seed_client("Mika").await;
    let artist = Uuid::now_v7();

    let id = app
        .book(client, artist, None, "14:00", 60)
        .await
        .assert_status(StatusCode::CREATED)
        .id();

    TestRequest::delete(&format!("/api/appointments/{id}"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    TestRequest::delete(&format!("/api/appointments/{id}"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.book(client, artist, None, "14:00", 60)
        .await
        .assert_status(StatusCode::CREATED);
}
