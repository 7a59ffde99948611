//! The scheduling model.
//!
//! - [`interval`]: local date, time and duration to a half-open UTC interval
//! - [`conflict`]: detect existing appointments a candidate would collide with
//! - [`status`]: the appointment status transition table
//! - [`session`]: derive elapsed session time from start/stop events
//! - [`slots`]: search a day's opening hours for bookable start times
//! - [`workflow`]: store-backed operations built on the above

pub mod conflict;
pub mod error;
pub mod interval;
pub mod policy;
pub mod session;
pub mod slots;
pub mod status;
pub mod workflow;

pub use conflict::{Conflict, ConflictCandidate, ConflictReason, DetectorOptions, detect_conflicts};
pub use error::SchedulingError;
pub use interval::{ScheduleSlot, TimeInterval, schedule_interval};
pub use policy::SchedulingPolicy;
