//! Import of legacy recurrence columns
//!
//! Older task stores kept recurrence as two loose columns: a lowercase
//! pattern name and a comma-separated config list.
//!
//! - daily: no config
//! - weekly: weekday names (e.g., "Monday,Wednesday,Friday")
//! - monthly: day numbers (e.g., "15")
//! - yearly: month-day pairs (e.g., "12-25")
//!
//! This module converts those columns into a single canonical rule. Lists that
//! would need several rules at once (monthly "5,15,25", yearly "1-1,12-25")
//! are rejected: one stored row maps to exactly one rule.

use crate::error::MalformedPatternError;
use crate::rule::{RecurrenceRule, WeekdaySet};
use chrono::{Month, Weekday};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::str::FromStr;

/// Legacy recurrence pattern column
///
/// Uses snake_case naming to match the stored TOML values.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegacyPattern {
    daily,
    weekly,
    monthly,
    yearly,
}

impl FromStr for LegacyPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "daily" => Ok(LegacyPattern::daily),
            "weekly" => Ok(LegacyPattern::weekly),
            "monthly" => Ok(LegacyPattern::monthly),
            "yearly" => Ok(LegacyPattern::yearly),
            other => Err(format!(
                "Invalid recurrence pattern '{}'. Valid options are: daily, weekly, monthly, yearly",
                other
            )),
        }
    }
}

/// A stored row's recurrence columns, as read from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRecurrence {
    pub recurrence_pattern: LegacyPattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_config: Option<String>,
}

impl LegacyRecurrence {
    pub fn to_rule(&self) -> Result<RecurrenceRule, MalformedPatternError> {
        rule_from_legacy(self.recurrence_pattern, self.recurrence_config.as_deref())
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.trim() {
        "Monday" => Some(Weekday::Mon),
        "Tuesday" => Some(Weekday::Tue),
        "Wednesday" => Some(Weekday::Wed),
        "Thursday" => Some(Weekday::Thu),
        "Friday" => Some(Weekday::Fri),
        "Saturday" => Some(Weekday::Sat),
        "Sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Convert legacy columns into a canonical rule
///
/// # Arguments
/// * `pattern` - The legacy pattern column
/// * `config` - The legacy config list, if any
///
/// # Returns
/// The equivalent rule, or an error when the config is missing, unreadable,
/// or lists more than one monthly/yearly date
pub fn rule_from_legacy(
    pattern: LegacyPattern,
    config: Option<&str>,
) -> Result<RecurrenceRule, MalformedPatternError> {
    let raw = match config {
        Some(config) => format!("{:?}:{}", pattern, config),
        None => format!("{:?}", pattern),
    };
    let items: Vec<&str> = config
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect();

    match pattern {
        LegacyPattern::daily => Ok(RecurrenceRule::default()),
        LegacyPattern::weekly => {
            if items.is_empty() {
                return Err(MalformedPatternError::new("missing recurrence config", raw));
            }
            let days = items
                .iter()
                .map(|name| {
                    weekday_from_name(name).ok_or_else(|| {
                        MalformedPatternError::new(format!("invalid weekday name '{}'", name), &raw)
                    })
                })
                .collect::<Result<WeekdaySet, _>>()?;
            Ok(RecurrenceRule::Weekly {
                interval: NonZeroU32::MIN,
                days,
            })
        }
        LegacyPattern::monthly => {
            let item = single_item(&items, &raw)?;
            item.parse::<u32>()
                .ok()
                .and_then(RecurrenceRule::monthly_by_date)
                .ok_or_else(|| MalformedPatternError::new(format!("invalid day of month '{}'", item), &raw))
        }
        LegacyPattern::yearly => {
            let item = single_item(&items, &raw)?;
            let (month, day) = item.split_once('-').unwrap_or((item, ""));
            let month = month
                .parse::<u8>()
                .ok()
                .and_then(|n| Month::try_from(n).ok());
            let day = day.parse::<u32>().ok();
            month
                .zip(day)
                .and_then(|(month, day)| RecurrenceRule::yearly(month, day))
                .ok_or_else(|| MalformedPatternError::new(format!("invalid month-day '{}'", item), &raw))
        }
    }
}

fn single_item<'a>(items: &[&'a str], raw: &str) -> Result<&'a str, MalformedPatternError> {
    match items {
        [only] => Ok(*only),
        [] => Err(MalformedPatternError::new("missing recurrence config", raw)),
        _ => Err(MalformedPatternError::new(
            format!("{} dates listed, only one rule per task is supported", items.len()),
            raw,
        )),
    }
}
