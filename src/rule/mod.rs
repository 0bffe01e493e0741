//! Recurrence domain models
//!
//! This module contains the structured values the engine works on.
//! It is split into submodules:
//! - `pattern`: the `RecurrenceRule` sum type and its building blocks
//! - `end_condition`: termination policy stored alongside a rule
//! - `serde_impl`: persisted forms of both values

mod end_condition;
mod pattern;
mod serde_impl;

pub use end_condition::EndCondition;
pub use pattern::{RecurrenceRule, WeekOrdinal, WeekdaySet, max_days_in_month, weekday_from_number};
