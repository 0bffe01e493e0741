//! Recurrence Rule Engine Library
//!
//! This library implements the recurrence rules behind recurring tasks and
//! habits: a compact pattern grammar ("repeat every day/week/month/year"),
//! English summaries of those patterns, and a bounded enumerator that turns a
//! pattern plus an end condition into concrete calendar dates.
//!
//! # Architecture
//!
//! The engine is a pure pipeline with no I/O and no shared state:
//! - **Codec**: `codec` - canonical pattern string to and from `RecurrenceRule`
//! - **Formatter**: `formatting` - `RecurrenceRule` to an English phrase
//! - **Enumerator**: `occurrence` - `RecurrenceRule` + `EndCondition` to dates
//!
//! `RecurrenceEngine` bundles the three behind one `EngineConfig`.
//!
//! # Example
//!
//! ```
//! use recur_engine::{EndCondition, RecurrenceEngine};
//! use chrono::NaiveDate;
//!
//! let engine = RecurrenceEngine::default();
//! let rule = engine.parse("WEEKLY:1:1,3,5").unwrap();
//! assert_eq!(engine.summarize(&rule), "Every Monday, Wednesday, and Friday");
//!
//! let monday = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
//! let dates = engine.occurrences(&rule, &EndCondition::Never, monday, 2);
//! assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 11, 5).unwrap());
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod formatting;
pub mod migration;
pub mod occurrence;
pub mod rule;
pub mod validation;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::Path;

// Re-export commonly used types
pub use codec::ParseMode;
pub use config::EngineConfig;
pub use error::{EndConditionError, MalformedPatternError};
pub use occurrence::{LeapDayPolicy, MatchOptions, OccurrenceQuery, Occurrences, WeeklyIntervalMode};
pub use rule::{EndCondition, RecurrenceRule, WeekOrdinal, WeekdaySet};

/// Get the current date in local timezone
///
/// The engine itself never reads the clock; callers pass this in as an anchor.
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Configured entry point to the codec, formatter and enumerator
///
/// Holds no mutable state, so one engine can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct RecurrenceEngine {
    config: EngineConfig,
}

impl RecurrenceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Create an engine from a TOML config file
    ///
    /// # Arguments
    /// * `config_path` - Path to the config file; a missing file means defaults
    ///
    /// # Example
    /// ```no_run
    /// # use recur_engine::RecurrenceEngine;
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let engine = RecurrenceEngine::from_config_file("recur.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config_file(config_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(EngineConfig::load(config_path)?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse a pattern under the configured parse mode.
    ///
    /// Always `Ok` in lenient mode.
    pub fn parse(&self, text: &str) -> Result<RecurrenceRule, MalformedPatternError> {
        codec::parse_with(text, self.config.parse_mode)
    }

    pub fn format(&self, rule: &RecurrenceRule) -> String {
        codec::format(rule)
    }

    /// Canonical form of a pattern, as it should be persisted after an edit
    pub fn normalize(&self, text: &str) -> Result<String, MalformedPatternError> {
        self.parse(text).map(|rule| codec::format(&rule))
    }

    pub fn summarize(&self, rule: &RecurrenceRule) -> String {
        formatting::summarize(rule)
    }

    /// Build a query carrying the configured horizon and match options
    pub fn query(
        &self,
        rule: &RecurrenceRule,
        end: &EndCondition,
        anchor: NaiveDate,
        max_results: usize,
    ) -> OccurrenceQuery {
        OccurrenceQuery::new(*rule, anchor)
            .with_end(*end)
            .with_max_results(max_results)
            .with_horizon(self.config.search_horizon_days)
            .with_options(self.config.match_options())
    }

    /// Dates on which `rule` fires after `anchor`
    ///
    /// # Arguments
    /// * `rule` - The rule to enumerate
    /// * `end` - The series' end condition
    /// * `anchor` - Exclusive start of the scan
    /// * `max_results` - Upper bound on returned dates
    ///
    /// # Returns
    /// Up to `max_results` dates in ascending order; fewer when the horizon or
    /// end condition cuts the scan short
    pub fn occurrences(
        &self,
        rule: &RecurrenceRule,
        end: &EndCondition,
        anchor: NaiveDate,
        max_results: usize,
    ) -> Vec<NaiveDate> {
        self.query(rule, end, anchor, max_results).collect_dates()
    }

    /// Same as `occurrences`, for a series that has already fired `already_produced` times
    pub fn occurrences_continuing(
        &self,
        rule: &RecurrenceRule,
        end: &EndCondition,
        anchor: NaiveDate,
        max_results: usize,
        already_produced: u32,
    ) -> Vec<NaiveDate> {
        self.query(rule, end, anchor, max_results)
            .with_already_produced(already_produced)
            .collect_dates()
    }

    /// The next few dates for display, ignoring any end condition
    pub fn preview(&self, rule: &RecurrenceRule, anchor: NaiveDate) -> Vec<NaiveDate> {
        self.occurrences(rule, &EndCondition::Never, anchor, self.config.preview_count)
    }
}
