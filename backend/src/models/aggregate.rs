//! Per-timeslot aggregate records.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time::Timeslot;

/// How the `official` flag of several matched sessions is combined.
///
/// `Any` is the logical reading ("official if any session was official").
/// `LastWins` reproduces the older behaviour where each later match overwrote
/// the flag; use it only when byte-compatibility with existing artifacts matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficialMerge {
    #[default]
    Any,
    #[serde(alias = "last")]
    LastWins,
}

impl OfficialMerge {
    /// Fold one more observed flag into the running value.
    pub fn fold(&self, current: bool, next: bool) -> bool {
        match self {
            OfficialMerge::Any => current || next,
            OfficialMerge::LastWins => next,
        }
    }
}

impl FromStr for OfficialMerge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" | "or" => Ok(Self::Any),
            "last" | "last_wins" => Ok(Self::LastWins),
            other => Err(format!("Unknown official merge mode: {}", other)),
        }
    }
}

/// Reduction of every session matched to one timeslot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub official: bool,
    pub field_size: u32,
    pub field_strength: u32,
}

impl AggregateRecord {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An aggregate pinned to the concrete instant of its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAggregate {
    pub instant: DateTime<Utc>,
    pub slot: Timeslot,
    pub record: AggregateRecord,
}
