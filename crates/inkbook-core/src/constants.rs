/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const APPOINTMENTS_ROUTE_COMPONENT: &str = "appointments";
pub const APPOINTMENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", APPOINTMENTS_ROUTE_COMPONENT);

pub const CLIENTS_ROUTE_COMPONENT: &str = "clients";
pub const CLIENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", CLIENTS_ROUTE_COMPONENT);

/// Longest bookable session. Conflict lookups widen their date window by one
/// day on each side, which stays correct only while durations fit in a day.
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;
