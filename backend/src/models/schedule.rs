//! Recurring schedule descriptor.
//!
//! A descriptor says "a race starts every `hourly_interval` hours, beginning at
//! `starting_hour`, at `minute` past the hour, every day of the week". It is
//! persisted as a cron-style string such as `"30 14/4 * * *"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Canonical `{minute, starting_hour, hourly_interval}` cadence of a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleDescriptor {
    minute: u32,
    starting_hour: u32,
    hourly_interval: u32,
}

impl ScheduleDescriptor {
    /// Create a descriptor, rejecting out-of-range fields.
    pub fn new(minute: u32, starting_hour: u32, hourly_interval: u32) -> ScheduleResult<Self> {
        let descriptor = Self {
            minute,
            starting_hour,
            hourly_interval,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn starting_hour(&self) -> u32 {
        self.starting_hour
    }

    pub fn hourly_interval(&self) -> u32 {
        self.hourly_interval
    }

    /// Hours of the day at which a slot occurs, ascending.
    ///
    /// Step semantics: `starting_hour, starting_hour + interval, ...` while `< 24`.
    pub fn hours(&self) -> impl Iterator<Item = u32> {
        (self.starting_hour..24).step_by(self.hourly_interval as usize)
    }

    /// Number of slots per day.
    pub fn slots_per_day(&self) -> usize {
        self.hours().count()
    }

    fn validate(&self) -> ScheduleResult<()> {
        if self.minute > 59 {
            return Err(ScheduleError::expansion(
                self.to_string(),
                format!("minute {} out of range 0-59", self.minute),
            ));
        }
        if self.starting_hour > 23 {
            return Err(ScheduleError::expansion(
                self.to_string(),
                format!("starting hour {} out of range 0-23", self.starting_hour),
            ));
        }
        if !(1..=24).contains(&self.hourly_interval) {
            return Err(ScheduleError::expansion(
                self.to_string(),
                format!("hourly interval {} out of range 1-24", self.hourly_interval),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ScheduleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} * * *",
            self.minute, self.starting_hour, self.hourly_interval
        )
    }
}

impl FromStr for ScheduleDescriptor {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(ScheduleError::expansion(
                s,
                format!("expected 5 fields, found {}", fields.len()),
            ));
        }
        if fields[2..].iter().any(|f| *f != "*") {
            return Err(ScheduleError::expansion(
                s,
                "day, month and weekday fields must be '*'",
            ));
        }

        let parse = |field: &str, what: &str| {
            field
                .parse::<u32>()
                .map_err(|e| ScheduleError::expansion(s, format!("invalid {}: {}", what, e)))
        };

        let minute = parse(fields[0], "minute")?;
        let (hour_field, interval_field) = fields[1]
            .split_once('/')
            .ok_or_else(|| ScheduleError::expansion(s, "hour field must be '<start>/<interval>'"))?;
        let starting_hour = parse(hour_field, "starting hour")?;
        let hourly_interval = parse(interval_field, "hourly interval")?;

        Self::new(minute, starting_hour, hourly_interval)
            .map_err(|e| match e {
                ScheduleError::ScheduleExpansion { reason, .. } => {
                    ScheduleError::expansion(s, reason)
                }
                other => other,
            })
    }
}

impl TryFrom<String> for ScheduleDescriptor {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScheduleDescriptor> for String {
    fn from(descriptor: ScheduleDescriptor) -> Self {
        descriptor.to_string()
    }
}
