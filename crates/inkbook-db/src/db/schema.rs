// Diesel table definitions; keep in sync with `migrations/`.

diesel::table! {
    client (id) {
        id -> Uuid,
        display_name -> Text,
        email -> Nullable<Text>,
        phone -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    appointment (id) {
        id -> Uuid,
        client_id -> Uuid,
        artist_id -> Nullable<Uuid>,
        bed_id -> Nullable<Uuid>,
        date -> Date,
        start_time -> Time,
        duration_minutes -> Int4,
        starts_at -> Timestamptz,
        ends_at -> Timestamptz,
        status -> Text,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    session_event (id) {
        id -> Uuid,
        appointment_id -> Uuid,
        kind -> Text,
        recorded_at -> Timestamptz,
    }
}

diesel::joinable!(appointment -> client (client_id));
diesel::joinable!(session_event -> appointment (appointment_id));

diesel::allow_tables_to_appear_in_same_query!(client, appointment, session_event);
