use chrono::NaiveTime;
use chrono_tz::Tz;

use inkbook_core::config::{IncompleteRecordPolicy, StudioConfig};
use inkbook_core::error::{CoreError, CoreResult};

use super::conflict::DetectorOptions;

/// Studio rules the scheduling workflow runs under, resolved from
/// [`StudioConfig`] once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingPolicy {
    pub timezone: Tz,
    pub incomplete_records: IncompleteRecordPolicy,
    pub enforce_status_transitions: bool,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub slot_step_minutes: u32,
}

impl SchedulingPolicy {
    /// ## Summary
    /// Resolves and validates the studio configuration.
    ///
    /// ## Errors
    /// Returns `ConfigError` for an unknown timezone, unparseable or inverted
    /// opening hours, or a zero slot step.
    pub fn from_config(config: &StudioConfig) -> CoreResult<Self> {
        let timezone = config.timezone()?;
        let (opens_at, closes_at) = config.opening_hours()?;

        if config.slot_step_minutes == 0 {
            return Err(CoreError::ConfigError(
                "studio.slot_step_minutes must be positive".to_string(),
            ));
        }

        Ok(Self {
            timezone,
            incomplete_records: config.incomplete_records,
            enforce_status_transitions: config.enforce_status_transitions,
            opens_at,
            closes_at,
            slot_step_minutes: config.slot_step_minutes,
        })
    }

    #[must_use]
    pub const fn detector(&self) -> DetectorOptions {
        DetectorOptions {
            timezone: self.timezone,
            incomplete_records: self.incomplete_records,
        }
    }
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            incomplete_records: IncompleteRecordPolicy::Skip,
            enforce_status_transitions: true,
            opens_at: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            closes_at: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default(),
            slot_step_minutes: 30,
        }
    }
}
