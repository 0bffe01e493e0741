//! Occurrence enumeration
//!
//! Produces the concrete calendar dates on which a rule fires, scanning
//! forward one day at a time from the day after the anchor. The scan is
//! bounded by a search horizon so sparse rules always terminate, and it stops
//! early when the result limit or the end condition is reached.

use crate::rule::{EndCondition, RecurrenceRule, WeekOrdinal};
use chrono::{Datelike, Days, Month, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use tracing::debug;

/// Days scanned past the anchor when no horizon is configured
pub const DEFAULT_SEARCH_HORIZON_DAYS: u32 = 365;

/// Result count used by the display preview
pub const DEFAULT_PREVIEW_COUNT: usize = 5;

/// Whether a weekly rule's interval gates which weeks fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyIntervalMode {
    /// Every week fires on the selected days; the interval is only displayed
    #[default]
    Ignore,
    /// Only every Nth week (counted in 7-day blocks from the anchor) fires
    EveryNthWeek,
}

/// What a February 29 yearly rule does in a non-leap year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapDayPolicy {
    /// Fires only in leap years
    #[default]
    Skip,
    /// Fires on February 28 in non-leap years
    Feb28,
    /// Fires on March 1 in non-leap years
    Mar1,
}

/// Day-test options that change how a rule is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    pub weekly_interval: WeeklyIntervalMode,
    pub leap_day: LeapDayPolicy,
}

/// A single request for occurrence dates.
///
/// Built per call and never persisted. Iterating it twice yields the same
/// dates; no state is carried between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceQuery {
    pub rule: RecurrenceRule,
    pub end: EndCondition,
    /// Scanning starts the day after this date
    pub anchor: NaiveDate,
    pub max_results: usize,
    pub search_horizon_days: u32,
    /// Occurrences of the series already produced before `anchor`
    pub already_produced: u32,
    pub options: MatchOptions,
}

impl OccurrenceQuery {
    /// Query with no end condition, the default horizon and the preview limit
    pub fn new(rule: RecurrenceRule, anchor: NaiveDate) -> Self {
        Self {
            rule,
            end: EndCondition::Never,
            anchor,
            max_results: DEFAULT_PREVIEW_COUNT,
            search_horizon_days: DEFAULT_SEARCH_HORIZON_DAYS,
            already_produced: 0,
            options: MatchOptions::default(),
        }
    }

    pub fn with_end(mut self, end: EndCondition) -> Self {
        self.end = end;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_horizon(mut self, days: u32) -> Self {
        self.search_horizon_days = days;
        self
    }

    pub fn with_already_produced(mut self, count: u32) -> Self {
        self.already_produced = count;
        self
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Lazily walk the matching dates
    pub fn iter(&self) -> Occurrences {
        let limit = match self.end.remaining(self.already_produced) {
            Some(remaining) => self.max_results.min(remaining as usize),
            None => self.max_results,
        };
        Occurrences {
            query: *self,
            offset: 0,
            remaining: limit,
            done: false,
        }
    }

    pub fn collect_dates(&self) -> Vec<NaiveDate> {
        self.iter().collect()
    }
}

impl IntoIterator for &OccurrenceQuery {
    type Item = NaiveDate;
    type IntoIter = Occurrences;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the dates of an `OccurrenceQuery`
#[derive(Debug, Clone)]
pub struct Occurrences {
    query: OccurrenceQuery,
    /// Days past the anchor already examined
    offset: u32,
    remaining: usize,
    done: bool,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.done {
            return None;
        }
        if self.remaining == 0 {
            self.done = true;
            return None;
        }

        let q = &self.query;
        while self.offset < q.search_horizon_days {
            self.offset += 1;
            let Some(candidate) = q.anchor.checked_add_days(Days::new(u64::from(self.offset)))
            else {
                break;
            };
            if q.end.is_past(candidate) {
                debug!(anchor = %q.anchor, end = %q.end, "scan reached end date");
                break;
            }
            if matches(&q.rule, q.anchor, candidate, q.options) {
                self.remaining -= 1;
                return Some(candidate);
            }
        }

        if self.offset >= q.search_horizon_days {
            debug!(
                pattern = %q.rule,
                anchor = %q.anchor,
                horizon = q.search_horizon_days,
                "search horizon exhausted"
            );
        }
        self.done = true;
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let days_left = (self.query.search_horizon_days - self.offset) as usize;
        (0, Some(self.remaining.min(days_left)))
    }
}

impl FusedIterator for Occurrences {}

/// Dates on which `rule` fires after `anchor`, honoring `end`.
///
/// Scans the default horizon with default match options.
pub fn enumerate(
    rule: &RecurrenceRule,
    end: &EndCondition,
    anchor: NaiveDate,
    max_results: usize,
) -> Vec<NaiveDate> {
    OccurrenceQuery::new(*rule, anchor)
        .with_end(*end)
        .with_max_results(max_results)
        .collect_dates()
}

/// The next few dates for display: the default preview count, no end condition
pub fn preview(rule: &RecurrenceRule, anchor: NaiveDate) -> Vec<NaiveDate> {
    enumerate(rule, &EndCondition::Never, anchor, DEFAULT_PREVIEW_COUNT)
}

/// Whether `rule` fires on `candidate` for a series anchored at `anchor`
pub fn matches(
    rule: &RecurrenceRule,
    anchor: NaiveDate,
    candidate: NaiveDate,
    options: MatchOptions,
) -> bool {
    match rule {
        RecurrenceRule::Daily { interval } => {
            interval.get() == 1
                || days_between(anchor, candidate).rem_euclid(i64::from(interval.get())) == 0
        }
        RecurrenceRule::Weekdays => {
            !matches!(candidate.weekday(), Weekday::Sat | Weekday::Sun)
        }
        RecurrenceRule::Weekly { interval, days } => {
            if !days.contains(candidate.weekday()) {
                return false;
            }
            match options.weekly_interval {
                WeeklyIntervalMode::Ignore => true,
                WeeklyIntervalMode::EveryNthWeek => {
                    let week = days_between(anchor, candidate).div_euclid(7);
                    week.rem_euclid(i64::from(interval.get())) == 0
                }
            }
        }
        RecurrenceRule::MonthlyByDate { day } => candidate.day() == *day,
        RecurrenceRule::MonthlyByWeekday { ordinal, weekday } => {
            if candidate.weekday() != *weekday {
                return false;
            }
            match ordinal {
                WeekOrdinal::Last => candidate.day() + 7 > days_in_month(candidate),
                other => candidate.day().div_ceil(7) == other.number(),
            }
        }
        RecurrenceRule::Yearly { month, day } => {
            let target_month = month.number_from_month();
            if candidate.month() == target_month && candidate.day() == *day {
                return true;
            }
            if *month != Month::February || *day != 29 || is_leap_year(candidate.year()) {
                return false;
            }
            match options.leap_day {
                LeapDayPolicy::Skip => false,
                LeapDayPolicy::Feb28 => candidate.month() == 2 && candidate.day() == 28,
                LeapDayPolicy::Mar1 => candidate.month() == 3 && candidate.day() == 1,
            }
        }
    }
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map_or(31, |last| last.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse;
    use std::num::NonZeroU32;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2025, 2, 10)), 28);
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(days_in_month(date(2025, 4, 1)), 30);
        assert_eq!(days_in_month(date(2025, 12, 31)), 31);
    }

    #[test]
    fn test_daily_interval_is_anchored_to_start() {
        let rule = parse("DAILY:3");
        let dates = enumerate(&rule, &EndCondition::Never, date(2025, 1, 1), 3);
        assert_eq!(dates, vec![date(2025, 1, 4), date(2025, 1, 7), date(2025, 1, 10)]);
    }

    #[test]
    fn test_daily_every_day() {
        let dates = preview(&parse("DAILY"), date(2025, 12, 30));
        assert_eq!(
            dates,
            vec![
                date(2025, 12, 31),
                date(2026, 1, 1),
                date(2026, 1, 2),
                date(2026, 1, 3),
                date(2026, 1, 4)
            ]
        );
    }

    #[test]
    fn test_weekdays_skip_weekend() {
        // 2025-10-31 is a Friday
        let dates = preview(&parse("WEEKDAYS"), date(2025, 10, 31));
        assert_eq!(
            dates,
            vec![
                date(2025, 11, 3),
                date(2025, 11, 4),
                date(2025, 11, 5),
                date(2025, 11, 6),
                date(2025, 11, 7)
            ]
        );
    }

    #[test]
    fn test_weekly_interval_gating() {
        // 2025-11-03 is a Monday
        let rule = parse("WEEKLY:2:1");
        let anchor = date(2025, 11, 3);

        let literal = OccurrenceQuery::new(rule, anchor).with_max_results(3);
        assert_eq!(
            literal.collect_dates(),
            vec![date(2025, 11, 10), date(2025, 11, 17), date(2025, 11, 24)]
        );

        let gated = literal.with_options(MatchOptions {
            weekly_interval: WeeklyIntervalMode::EveryNthWeek,
            ..MatchOptions::default()
        });
        assert_eq!(
            gated.collect_dates(),
            vec![date(2025, 11, 17), date(2025, 12, 1), date(2025, 12, 15)]
        );
    }

    #[test]
    fn test_monthly_nth_weekday() {
        // Second Tuesday
        let dates = enumerate(&parse("MONTHLY:2:2"), &EndCondition::Never, date(2025, 1, 1), 3);
        assert_eq!(dates, vec![date(2025, 1, 14), date(2025, 2, 11), date(2025, 3, 11)]);
    }

    #[test]
    fn test_last_weekday_in_five_occurrence_month() {
        // March 2025 has Sundays on 2, 9, 16, 23, 30; only the 30th is the last
        let rule = parse("MONTHLY:5:7");
        let dates: Vec<_> = OccurrenceQuery::new(rule, date(2025, 2, 28))
            .with_horizon(31)
            .with_max_results(10)
            .collect_dates();
        assert_eq!(dates, vec![date(2025, 3, 30)]);
    }

    #[test]
    fn test_horizon_limits_scan() {
        let rule = parse("YEARLY:6-1");
        let dates = OccurrenceQuery::new(rule, date(2025, 1, 1))
            .with_max_results(3)
            .collect_dates();
        assert_eq!(dates, vec![date(2025, 6, 1)]);

        let wide = OccurrenceQuery::new(rule, date(2025, 1, 1))
            .with_max_results(3)
            .with_horizon(365 * 3)
            .collect_dates();
        assert_eq!(wide, vec![date(2025, 6, 1), date(2026, 6, 1), date(2027, 6, 1)]);
    }

    #[test]
    fn test_zero_horizon_or_zero_results_is_empty() {
        let rule = parse("DAILY");
        assert!(OccurrenceQuery::new(rule, date(2025, 1, 1)).with_horizon(0).collect_dates().is_empty());
        assert!(OccurrenceQuery::new(rule, date(2025, 1, 1)).with_max_results(0).collect_dates().is_empty());
    }

    #[test]
    fn test_after_count_uses_running_offset() {
        let end = EndCondition::AfterCount {
            count: NonZeroU32::new(4).unwrap(),
        };
        let query = OccurrenceQuery::new(parse("DAILY"), date(2025, 1, 1))
            .with_end(end)
            .with_max_results(10);
        assert_eq!(query.collect_dates().len(), 4);
        assert_eq!(query.with_already_produced(3).collect_dates(), vec![date(2025, 1, 2)]);
        assert!(query.with_already_produced(4).collect_dates().is_empty());
    }

    #[test]
    fn test_on_date_includes_end_date() {
        let end = EndCondition::OnDate {
            date: date(2025, 1, 4),
        };
        let dates = enumerate(&parse("DAILY"), &end, date(2025, 1, 1), 10);
        assert_eq!(dates, vec![date(2025, 1, 2), date(2025, 1, 3), date(2025, 1, 4)]);
    }

    #[test]
    fn test_leap_day_policies() {
        let rule = parse("YEARLY:2-29");
        let anchor = date(2025, 1, 1);
        let with = |leap_day: LeapDayPolicy| {
            OccurrenceQuery::new(rule, anchor)
                .with_max_results(1)
                .with_options(MatchOptions {
                    leap_day,
                    ..MatchOptions::default()
                })
                .collect_dates()
        };
        assert!(with(LeapDayPolicy::Skip).is_empty());
        assert_eq!(with(LeapDayPolicy::Feb28), vec![date(2025, 2, 28)]);
        assert_eq!(with(LeapDayPolicy::Mar1), vec![date(2025, 3, 1)]);
    }

    #[test]
    fn test_leap_day_substitute_not_used_in_leap_year() {
        let rule = parse("YEARLY:2-29");
        let options = MatchOptions {
            leap_day: LeapDayPolicy::Feb28,
            ..MatchOptions::default()
        };
        assert!(!matches(&rule, date(2024, 1, 1), date(2024, 2, 28), options));
        assert!(matches(&rule, date(2024, 1, 1), date(2024, 2, 29), options));
    }

    #[test]
    fn test_iterator_is_fused_and_lazy() {
        let query = OccurrenceQuery::new(parse("DAILY"), date(2025, 1, 1)).with_max_results(2);
        let mut iter = query.iter();
        assert_eq!(iter.next(), Some(date(2025, 1, 2)));
        assert_eq!(iter.next(), Some(date(2025, 1, 3)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
