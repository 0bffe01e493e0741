//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use recur_engine::{EngineConfig, RecurrenceEngine};
use std::num::NonZeroU32;

/// Shorthand for a calendar date
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn nz(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

/// Engine with default settings except the given horizon
pub fn engine_with_horizon(days: u32) -> RecurrenceEngine {
    RecurrenceEngine::new(EngineConfig {
        search_horizon_days: days,
        ..EngineConfig::default()
    })
}
