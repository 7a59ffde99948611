//! Turning a studio-local date, start time and duration into an absolute
//! half-open interval.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use inkbook_core::constants::MAX_DURATION_MINUTES;
use inkbook_db::model::appointment::Appointment;

use super::error::SchedulingError;

/// Half-open time range `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    /// Returns `None` unless `start < end`.
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Strict overlap: intervals that merely touch (`self.end == other.start`)
    /// do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A validated local schedule: date, start time and a duration within
/// `1..=MAX_DURATION_MINUTES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleSlot {
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: i32,
}

impl ScheduleSlot {
    /// ## Summary
    /// Builds a slot from already-typed parts.
    ///
    /// ## Errors
    /// Returns `InvalidDuration` if the duration is not positive or exceeds a day.
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: i64,
    ) -> Result<Self, SchedulingError> {
        Ok(Self {
            date,
            time,
            duration_minutes: validate_duration(duration_minutes)?,
        })
    }

    /// ## Summary
    /// Parses a `YYYY-MM-DD` date and an `HH:MM[:SS]` time.
    ///
    /// ## Errors
    /// Returns `MalformedScheduleInput` for unparseable date or time and
    /// `InvalidDuration` for an out-of-range duration.
    pub fn parse(date: &str, time: &str, duration_minutes: i64) -> Result<Self, SchedulingError> {
        Self::new(parse_date(date)?, parse_time(time)?, duration_minutes)
    }

    /// ## Summary
    /// Reads the slot of a stored appointment.
    ///
    /// ## Errors
    /// Returns `InvalidDuration` if the stored duration is out of range.
    pub fn of(appointment: &Appointment) -> Result<Self, SchedulingError> {
        Self::new(
            appointment.date,
            appointment.start_time,
            i64::from(appointment.duration_minutes),
        )
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    #[must_use]
    pub const fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    /// ## Summary
    /// Resolves the slot in `tz`; `end` is `duration_minutes` of elapsed time
    /// after `start`.
    ///
    /// ## Errors
    /// Returns `MalformedScheduleInput` if the local start falls in a DST gap.
    pub fn interval(&self, tz: Tz) -> Result<TimeInterval, SchedulingError> {
        let start = local_instant(self.date, self.time, tz)?;
        let end = start + TimeDelta::minutes(i64::from(self.duration_minutes));
        Ok(TimeInterval { start, end })
    }
}

/// ## Summary
/// Computes `[start, end)` for a local `date` and `time` in `tz`.
///
/// ## Errors
/// Returns `MalformedScheduleInput` if date or time do not parse or do not
/// name an existing instant, `InvalidDuration` for out-of-range durations.
pub fn schedule_interval(
    date: &str,
    time: &str,
    duration_minutes: i64,
    tz: Tz,
) -> Result<TimeInterval, SchedulingError> {
    ScheduleSlot::parse(date, time, duration_minutes)?.interval(tz)
}

/// ## Summary
/// Parses a `YYYY-MM-DD` calendar date.
///
/// ## Errors
/// Returns `MalformedScheduleInput` if the input is not a valid date.
pub fn parse_date(value: &str) -> Result<NaiveDate, SchedulingError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        SchedulingError::MalformedScheduleInput(format!("date '{value}' is not YYYY-MM-DD: {e}"))
    })
}

/// ## Summary
/// Parses an `HH:MM` or `HH:MM:SS` clock time.
///
/// ## Errors
/// Returns `MalformedScheduleInput` if the input is not a valid time.
pub fn parse_time(value: &str) -> Result<NaiveTime, SchedulingError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|e| {
            SchedulingError::MalformedScheduleInput(format!("time '{value}' is not HH:MM: {e}"))
        })
}

/// ## Summary
/// Checks a duration is within `1..=MAX_DURATION_MINUTES`.
///
/// ## Errors
/// Returns `InvalidDuration` otherwise.
pub fn validate_duration(duration_minutes: i64) -> Result<i32, SchedulingError> {
    if duration_minutes <= 0 {
        return Err(SchedulingError::InvalidDuration(format!(
            "{duration_minutes} minutes; duration must be positive"
        )));
    }
    if duration_minutes > MAX_DURATION_MINUTES {
        return Err(SchedulingError::InvalidDuration(format!(
            "{duration_minutes} minutes; at most {MAX_DURATION_MINUTES} allowed"
        )));
    }
    i32::try_from(duration_minutes)
        .map_err(|e| SchedulingError::InvalidDuration(format!("{duration_minutes} minutes: {e}")))
}

/// ## Summary
/// Resolves a local wall-clock time to a UTC instant. Ambiguous times (DST
/// fold) resolve to the earlier instant.
///
/// ## Errors
/// Returns `MalformedScheduleInput` for times skipped by a DST transition.
pub fn local_instant(
    date: NaiveDate,
    time: NaiveTime,
    tz: Tz,
) -> Result<DateTime<Utc>, SchedulingError> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            SchedulingError::MalformedScheduleInput(format!(
                "local time {time} on {date} does not exist in {tz}"
            ))
        })
}
