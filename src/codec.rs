//! Pattern codec: canonical pattern strings to and from `RecurrenceRule`
//!
//! Grammar (colon-delimited, keyword is case-insensitive):
//!
//! ```text
//! DAILY[:interval]
//! WEEKDAYS
//! WEEKLY:interval:day[,day...]     days 1..7, Monday = 1
//! MONTHLY:dayOfMonth               2 segments: by date
//! MONTHLY:ordinal:weekday          3 segments: by weekday, ordinal 5 = last
//! YEARLY:month-day
//! ```
//!
//! Two parse policies are offered and never mixed within one call:
//! - [`parse`] is lenient. It never fails: an empty or unknown pattern becomes
//!   `DAILY`, and a malformed field falls back to that field's default.
//! - [`parse_strict`] rejects the whole input with a [`MalformedPatternError`]
//!   at the first problem.

use crate::error::MalformedPatternError;
use crate::rule::{RecurrenceRule, WeekOrdinal, WeekdaySet, max_days_in_month, weekday_from_number};
use chrono::{Month, Weekday};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use tracing::debug;

/// How the codec treats malformed input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Fall back to defaults, never fail
    #[default]
    Lenient,
    /// Reject malformed input
    Strict,
}

/// Parse a pattern string, recovering from anything malformed.
///
/// # Example
/// ```
/// use recur_engine::codec;
///
/// assert_eq!(codec::format(&codec::parse("weekly:1:5,1,3")), "WEEKLY:1:1,3,5");
/// assert_eq!(codec::format(&codec::parse("")), "DAILY");
/// ```
pub fn parse(text: &str) -> RecurrenceRule {
    parse_with(text, ParseMode::Lenient).unwrap_or_default()
}

/// Parse a pattern string, rejecting anything that is not well-formed
pub fn parse_strict(text: &str) -> Result<RecurrenceRule, MalformedPatternError> {
    parse_with(text, ParseMode::Strict)
}

/// Parse a pattern string under the given policy.
///
/// In `Lenient` mode the result is always `Ok`.
pub fn parse_with(text: &str, mode: ParseMode) -> Result<RecurrenceRule, MalformedPatternError> {
    PatternParser { raw: text, mode }.run()
}

/// Render the canonical pattern string for a rule
pub fn format(rule: &RecurrenceRule) -> String {
    rule.to_string()
}

/// Canonicalize a stored pattern: `format(parse(text))`
pub fn normalize(text: &str) -> String {
    format(&parse(text))
}

struct PatternParser<'a> {
    raw: &'a str,
    mode: ParseMode,
}

impl PatternParser<'_> {
    fn run(&self) -> Result<RecurrenceRule, MalformedPatternError> {
        let trimmed = self.raw.trim();
        if trimmed.is_empty() {
            return self.recover("empty pattern", RecurrenceRule::default());
        }

        let segments: Vec<&str> = trimmed.split(':').map(str::trim).collect();
        let keyword = segments[0].to_ascii_uppercase();
        let args = &segments[1..];

        match keyword.as_str() {
            "DAILY" => {
                self.check_arity("DAILY", args, 1)?;
                Ok(RecurrenceRule::Daily {
                    interval: self.interval(args.first().copied())?,
                })
            }
            "WEEKDAYS" => {
                self.check_arity("WEEKDAYS", args, 0)?;
                Ok(RecurrenceRule::Weekdays)
            }
            "WEEKLY" => self.weekly(args),
            "MONTHLY" => self.monthly(args),
            "YEARLY" => self.yearly(args),
            _ => self.recover(
                format!("unknown keyword '{}'", segments[0]),
                RecurrenceRule::default(),
            ),
        }
    }

    fn error(&self, reason: impl Into<String>) -> MalformedPatternError {
        MalformedPatternError::new(reason, self.raw)
    }

    /// Either substitute `fallback` (lenient) or fail (strict)
    fn recover<T>(&self, reason: impl Into<String>, fallback: T) -> Result<T, MalformedPatternError> {
        let reason = reason.into();
        match self.mode {
            ParseMode::Lenient => {
                debug!(pattern = self.raw, reason = %reason, "recovering from malformed pattern");
                Ok(fallback)
            }
            ParseMode::Strict => Err(self.error(reason)),
        }
    }

    /// Resolve one numeric field, falling back to `default` when it did not parse
    fn field<T>(
        &self,
        parsed: Option<T>,
        default: T,
        what: &str,
        raw: &str,
    ) -> Result<T, MalformedPatternError> {
        match parsed {
            Some(value) => Ok(value),
            None => self.recover(format!("invalid {} '{}'", what, raw), default),
        }
    }

    fn check_arity(&self, keyword: &str, args: &[&str], max: usize) -> Result<(), MalformedPatternError> {
        if args.len() > max {
            self.recover(
                format!(
                    "{} takes at most {} argument(s), got {}",
                    keyword,
                    max,
                    args.len()
                ),
                (),
            )?;
        }
        Ok(())
    }

    fn interval(&self, raw: Option<&str>) -> Result<NonZeroU32, MalformedPatternError> {
        match raw {
            None => Ok(NonZeroU32::MIN),
            Some(raw) => self.field(raw.parse().ok(), NonZeroU32::MIN, "interval", raw),
        }
    }

    fn weekly(&self, args: &[&str]) -> Result<RecurrenceRule, MalformedPatternError> {
        self.check_arity("WEEKLY", args, 2)?;
        let interval = self.interval(args.first().copied())?;

        let monday = WeekdaySet::single(Weekday::Mon);
        let days = match args.get(1).filter(|list| !list.is_empty()) {
            None => self.recover("missing day list", monday)?,
            Some(list) => {
                let mut days = WeekdaySet::EMPTY;
                for item in list.split(',').map(str::trim) {
                    let day = item.parse().ok().and_then(weekday_from_number);
                    match day {
                        Some(day) => days = days.insert(day),
                        None => self.recover(format!("invalid weekday '{}'", item), ())?,
                    }
                }
                if days.is_empty() { monday } else { days }
            }
        };

        Ok(RecurrenceRule::Weekly { interval, days })
    }

    /// Segment count alone decides the form: one argument is by-date, two is by-weekday
    fn monthly(&self, args: &[&str]) -> Result<RecurrenceRule, MalformedPatternError> {
        match args {
            [] => {
                let day = self.recover("missing day of month", 1)?;
                Ok(RecurrenceRule::MonthlyByDate { day })
            }
            [day] => Ok(RecurrenceRule::MonthlyByDate {
                day: self.day_of_month(day)?,
            }),
            [ordinal, weekday, ..] => {
                self.check_arity("MONTHLY", args, 2)?;
                let ordinal = self.field(
                    ordinal.parse().ok().and_then(WeekOrdinal::from_number),
                    WeekOrdinal::First,
                    "ordinal",
                    ordinal,
                )?;
                let weekday = self.field(
                    weekday.parse().ok().and_then(weekday_from_number),
                    Weekday::Mon,
                    "weekday",
                    weekday,
                )?;
                Ok(RecurrenceRule::MonthlyByWeekday { ordinal, weekday })
            }
        }
    }

    fn yearly(&self, args: &[&str]) -> Result<RecurrenceRule, MalformedPatternError> {
        self.check_arity("YEARLY", args, 1)?;
        let Some(&date) = args.first() else {
            return self.recover(
                "missing month-day",
                RecurrenceRule::Yearly {
                    month: Month::January,
                    day: 1,
                },
            );
        };

        let (raw_month, raw_day) = date.split_once('-').unwrap_or((date, ""));
        let month = self.field(
            raw_month
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(|n| Month::try_from(n).ok()),
            Month::January,
            "month",
            raw_month,
        )?;
        let day = self.day_of_month(raw_day.trim())?;

        if self.mode == ParseMode::Strict && day > max_days_in_month(month) {
            return Err(self.error(format!(
                "{} has no day {}",
                month.name(),
                day
            )));
        }

        Ok(RecurrenceRule::Yearly { month, day })
    }

    fn day_of_month(&self, raw: &str) -> Result<u32, MalformedPatternError> {
        let parsed = raw.parse::<u32>().ok().filter(|d| (1..=31).contains(d));
        self.field(parsed, 1, "day of month", raw)
    }
}
