//! Human-readable summaries of recurrence rules
//!
//! This module renders a `RecurrenceRule` as the English phrase shown next to
//! a recurring task or habit, e.g. "Every 2 weeks on Monday and Thursday".

use crate::rule::{RecurrenceRule, WeekOrdinal, WeekdaySet};
use chrono::Weekday;
use tracing::warn;

/// Describe a rule in English
///
/// # Arguments
/// * `rule` - The rule to describe
///
/// # Returns
/// A display phrase such as "Every day" or "Every month on the Last Sunday"
///
/// # Example
/// ```
/// use recur_engine::{codec, formatting};
///
/// let rule = codec::parse("WEEKLY:2:1,3,5");
/// assert_eq!(
///     formatting::summarize(&rule),
///     "Every 2 weeks on Monday, Wednesday, and Friday"
/// );
/// ```
pub fn summarize(rule: &RecurrenceRule) -> String {
    match rule {
        RecurrenceRule::Daily { interval } if interval.get() == 1 => "Every day".to_string(),
        RecurrenceRule::Daily { interval } => format!("Every {} days", interval),
        RecurrenceRule::Weekdays => "Every weekday (Mon-Fri)".to_string(),
        RecurrenceRule::Weekly { interval, days } => {
            if days.is_empty() {
                warn!(pattern = %rule, "weekly rule has no days selected");
                return "No days selected".to_string();
            }
            let days = join_weekdays(days);
            if interval.get() == 1 {
                format!("Every {}", days)
            } else {
                format!("Every {} weeks on {}", interval, days)
            }
        }
        RecurrenceRule::MonthlyByDate { day } => {
            format!("Every month on the {}{}", day, ordinal_suffix(*day))
        }
        RecurrenceRule::MonthlyByWeekday { ordinal, weekday } => format!(
            "Every month on the {} {}",
            ordinal_label(*ordinal),
            weekday_name(*weekday)
        ),
        RecurrenceRule::Yearly { month, day } => {
            format!("Every year on {} {}", month.name(), day)
        }
    }
}

/// English ordinal suffix for `n` ("st", "nd", "rd" or "th").
///
/// 11, 12 and 13 (and 111, 112, ...) take "th".
pub fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// "1st".."4th", or "Last"
pub fn ordinal_label(ordinal: WeekOrdinal) -> String {
    match ordinal {
        WeekOrdinal::Last => "Last".to_string(),
        other => {
            let n = other.number();
            format!("{}{}", n, ordinal_suffix(n))
        }
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// "Monday", "Monday and Friday", "Monday, Wednesday, and Friday"
fn join_weekdays(days: &WeekdaySet) -> String {
    let names: Vec<&str> = days.iter().map(weekday_name).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}
