//! Schedule algorithms: inference, expansion, binding, seasonal averaging and
//! range mapping.
//!
//! Everything here is pure and stateless, and safe to call concurrently.
//!
//! ```text
//! events ──► infer_schedule ──► ScheduleDescriptor
//!                                      │
//!                      anchor ──► expand ──► slot instants
//!                                      │
//!                   events ──► bind / aggregate_season ──► AggregateRecord
//!                                      │
//!                               map_range ──► intensity
//! ```

pub mod binding;
pub mod expansion;
pub mod inference;
pub mod range_map;
pub mod seasonal;

pub use binding::{bind, matching};
pub use expansion::{expand, expand_persisted, expand_timeslots, is_slot, next_after, next_at_or_after};
pub use inference::infer_schedule;
pub use range_map::map_range;
pub use seasonal::{aggregate_season, aggregate_season_persisted, merge_splits};
