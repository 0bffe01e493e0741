use chrono::{Month, Weekday};
use std::fmt;
use std::num::NonZeroU32;

/// Convert a weekday number (1=Monday .. 7=Sunday) into a `Weekday`
pub fn weekday_from_number(n: u32) -> Option<Weekday> {
    match n {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Longest length a month can have (February counts its leap day)
pub fn max_days_in_month(month: Month) -> u32 {
    match month {
        Month::February => 29,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

/// A set of weekdays, stored as a bitmask (bit 0 = Monday).
///
/// Iteration always yields days in ascending order Monday..Sunday, which is
/// what keeps the canonical `WEEKLY` form stable regardless of input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// The empty set. Rules never hold it, but the type can.
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    /// Monday through Friday
    pub const WORKWEEK: WeekdaySet = WeekdaySet(0b0001_1111);

    pub fn single(day: Weekday) -> Self {
        Self(Self::bit(day))
    }

    /// Build a set from weekday numbers (1=Monday .. 7=Sunday).
    ///
    /// Out-of-range numbers are dropped; duplicates collapse.
    pub fn from_numbers(numbers: impl IntoIterator<Item = u32>) -> Self {
        numbers
            .into_iter()
            .filter_map(weekday_from_number)
            .collect()
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Days in the set, Monday first
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        (1..=7)
            .filter_map(weekday_from_number)
            .filter(|day| self.contains(*day))
    }

    /// Weekday numbers in the set, ascending
    pub fn numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter().map(|day| day.number_from_monday())
    }

    /// Return a copy of the set with `day` selected
    pub fn insert(self, day: Weekday) -> Self {
        Self(self.0 | Self::bit(day))
    }

    /// Return a copy of the set with `day` deselected.
    ///
    /// A set never becomes empty through editing: removing the only selected
    /// day leaves that day selected.
    pub fn remove(self, day: Weekday) -> Self {
        let remaining = Self(self.0 & !Self::bit(day));
        if remaining.is_empty() && !self.is_empty() {
            tracing::warn!(day = %day, "refusing to deselect the last weekday");
            return self;
        }
        remaining
    }

    /// Flip the selection state of `day` (subject to the same guard as `remove`)
    pub fn toggle(self, day: Weekday) -> Self {
        if self.contains(day) {
            self.remove(day)
        } else {
            self.insert(day)
        }
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter()
            .fold(WeekdaySet::EMPTY, |set, day| set.insert(day))
    }
}

/// Which occurrence of a weekday within a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekOrdinal {
    First,
    Second,
    Third,
    Fourth,
    /// The final occurrence, whether the month has four or five of that weekday.
    ///
    /// Matches when the weekday falls within the last seven days of the month
    /// (`day + 7 > days_in_month`). The looser `day > 21` test would also
    /// match the fourth occurrence in a month with five of that weekday.
    Last,
}

impl WeekOrdinal {
    /// Ordinal number as stored in the pattern string (5 means last)
    pub fn number(self) -> u32 {
        match self {
            WeekOrdinal::First => 1,
            WeekOrdinal::Second => 2,
            WeekOrdinal::Third => 3,
            WeekOrdinal::Fourth => 4,
            WeekOrdinal::Last => 5,
        }
    }

    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(WeekOrdinal::First),
            2 => Some(WeekOrdinal::Second),
            3 => Some(WeekOrdinal::Third),
            4 => Some(WeekOrdinal::Fourth),
            5 => Some(WeekOrdinal::Last),
            _ => None,
        }
    }
}

/// The repetition shape of a recurring task or habit.
///
/// Each variant carries only the fields that apply to it. Values are
/// immutable; editing helpers return a new rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrenceRule {
    /// Every `interval` days
    Daily { interval: NonZeroU32 },
    /// Monday through Friday, every week
    Weekdays,
    /// On the selected days of the week
    Weekly {
        interval: NonZeroU32,
        days: WeekdaySet,
    },
    /// On a fixed day of the month (1..=31).
    ///
    /// Building the variant directly skips the range check; prefer
    /// [`RecurrenceRule::monthly_by_date`].
    MonthlyByDate { day: u32 },
    /// On the Nth (or last) given weekday of the month
    MonthlyByWeekday {
        ordinal: WeekOrdinal,
        weekday: Weekday,
    },
    /// On a fixed month and day each year.
    ///
    /// Building the variant directly skips the range check; prefer
    /// [`RecurrenceRule::yearly`].
    Yearly { month: Month, day: u32 },
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        RecurrenceRule::Daily {
            interval: NonZeroU32::MIN,
        }
    }
}

impl RecurrenceRule {
    pub fn daily(interval: NonZeroU32) -> Self {
        RecurrenceRule::Daily { interval }
    }

    /// Weekly rule; an empty day set falls back to Monday
    pub fn weekly(interval: NonZeroU32, days: WeekdaySet) -> Self {
        let days = if days.is_empty() {
            WeekdaySet::single(Weekday::Mon)
        } else {
            days
        };
        RecurrenceRule::Weekly { interval, days }
    }

    pub fn monthly_by_date(day: u32) -> Option<Self> {
        (1..=31)
            .contains(&day)
            .then_some(RecurrenceRule::MonthlyByDate { day })
    }

    pub fn monthly_by_weekday(ordinal: WeekOrdinal, weekday: Weekday) -> Self {
        RecurrenceRule::MonthlyByWeekday { ordinal, weekday }
    }

    /// Yearly rule; `None` when the month never has that day (February 30)
    pub fn yearly(month: Month, day: u32) -> Option<Self> {
        (1..=max_days_in_month(month))
            .contains(&day)
            .then_some(RecurrenceRule::Yearly { month, day })
    }

    /// Keyword used in the canonical pattern string
    pub fn keyword(&self) -> &'static str {
        match self {
            RecurrenceRule::Daily { .. } => "DAILY",
            RecurrenceRule::Weekdays => "WEEKDAYS",
            RecurrenceRule::Weekly { .. } => "WEEKLY",
            RecurrenceRule::MonthlyByDate { .. } | RecurrenceRule::MonthlyByWeekday { .. } => {
                "MONTHLY"
            }
            RecurrenceRule::Yearly { .. } => "YEARLY",
        }
    }

    /// Return a copy with a new repeat interval.
    ///
    /// Only `Daily` and `Weekly` carry an interval; other variants are
    /// returned unchanged.
    pub fn with_interval(self, interval: NonZeroU32) -> Self {
        match self {
            RecurrenceRule::Daily { .. } => RecurrenceRule::Daily { interval },
            RecurrenceRule::Weekly { days, .. } => RecurrenceRule::Weekly { interval, days },
            other => other,
        }
    }

    /// Return a copy with the given day toggled, for `Weekly` rules only
    pub fn with_day_toggled(self, day: Weekday) -> Self {
        match self {
            RecurrenceRule::Weekly { interval, days } => RecurrenceRule::Weekly {
                interval,
                days: days.toggle(day),
            },
            other => other,
        }
    }
}

/// Canonical pattern string (see `codec::format`)
impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())?;
        match self {
            RecurrenceRule::Daily { interval } if interval.get() == 1 => Ok(()),
            RecurrenceRule::Daily { interval } => write!(f, ":{}", interval),
            RecurrenceRule::Weekdays => Ok(()),
            RecurrenceRule::Weekly { interval, days } => {
                let days: Vec<String> = days.numbers().map(|n| n.to_string()).collect();
                write!(f, ":{}:{}", interval, days.join(","))
            }
            RecurrenceRule::MonthlyByDate { day } => write!(f, ":{}", day),
            RecurrenceRule::MonthlyByWeekday { ordinal, weekday } => write!(
                f,
                ":{}:{}",
                ordinal.number(),
                weekday.number_from_monday()
            ),
            RecurrenceRule::Yearly { month, day } => {
                write!(f, ":{}-{}", month.number_from_month(), day)
            }
        }
    }
}
