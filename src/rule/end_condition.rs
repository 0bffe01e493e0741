use crate::error::EndConditionError;
use chrono::NaiveDate;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// When a recurring series stops producing occurrences
///
/// Stored next to the `RecurrenceRule` rather than inside it, since the
/// repetition shape and the termination policy vary independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EndCondition {
    /// Repeats forever
    #[default]
    Never,
    /// Stops once `count` occurrences have been produced over the whole series
    AfterCount { count: NonZeroU32 },
    /// Stops after `date` (an occurrence on `date` itself still counts)
    OnDate { date: NaiveDate },
}

impl EndCondition {
    /// Discriminant used in the persisted form
    pub fn kind(&self) -> &'static str {
        match self {
            EndCondition::Never => "never",
            EndCondition::AfterCount { .. } => "after",
            EndCondition::OnDate { .. } => "on",
        }
    }

    /// How many more occurrences may be produced when `already_produced`
    /// occurrences of the series exist before the scan starts.
    ///
    /// `None` means no count limit applies.
    pub fn remaining(&self, already_produced: u32) -> Option<u32> {
        match self {
            EndCondition::AfterCount { count } => Some(count.get().saturating_sub(already_produced)),
            _ => None,
        }
    }

    /// Whether a candidate date falls past the end date
    pub fn is_past(&self, candidate: NaiveDate) -> bool {
        match self {
            EndCondition::OnDate { date } => candidate > *date,
            _ => false,
        }
    }
}

/// Text form used on the command line: `never`, `after:N`, `on:YYYY-MM-DD`
impl fmt::Display for EndCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndCondition::Never => f.write_str("never"),
            EndCondition::AfterCount { count } => write!(f, "after:{}", count),
            EndCondition::OnDate { date } => write!(f, "on:{}", date.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for EndCondition {
    type Err = EndConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind, value) = match s.split_once(':') {
            Some((kind, value)) => (kind.trim(), Some(value.trim())),
            None => (s, None),
        };

        match (kind.to_ascii_lowercase().as_str(), value) {
            ("never", None) => Ok(EndCondition::Never),
            ("after", Some(count)) => parse_count(count),
            ("after", None) => Err(EndConditionError::MissingField {
                kind: "after",
                field: "count",
            }),
            ("on", Some(date)) => parse_date(date),
            ("on", None) => Err(EndConditionError::MissingField {
                kind: "on",
                field: "date",
            }),
            _ => Err(EndConditionError::UnknownKind(s.to_string())),
        }
    }
}

fn parse_count(raw: &str) -> Result<EndCondition, EndConditionError> {
    raw.parse::<NonZeroU32>()
        .map(|count| EndCondition::AfterCount { count })
        .map_err(|_| EndConditionError::InvalidCount(raw.to_string()))
}

fn parse_date(raw: &str) -> Result<EndCondition, EndConditionError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| EndCondition::OnDate { date })
        .map_err(|_| EndConditionError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_forms() {
        assert_eq!("never".parse::<EndCondition>(), Ok(EndCondition::Never));
        assert_eq!(
            "after:10".parse::<EndCondition>(),
            Ok(EndCondition::AfterCount {
                count: NonZeroU32::new(10).unwrap()
            })
        );
        assert_eq!(
            " ON:2025-03-15 ".parse::<EndCondition>(),
            Ok(EndCondition::OnDate {
                date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert_eq!(
            "after:0".parse::<EndCondition>(),
            Err(EndConditionError::InvalidCount("0".to_string()))
        );
        assert_eq!(
            "on:15/03/2025".parse::<EndCondition>(),
            Err(EndConditionError::InvalidDate("15/03/2025".to_string()))
        );
        assert!(matches!(
            "after".parse::<EndCondition>(),
            Err(EndConditionError::MissingField { kind: "after", .. })
        ));
        assert!(matches!(
            "sometimes".parse::<EndCondition>(),
            Err(EndConditionError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_display_matches_parse() {
        for text in ["never", "after:3", "on:2026-01-31"] {
            let end: EndCondition = text.parse().unwrap();
            assert_eq!(end.to_string(), text);
        }
    }

    #[test]
    fn test_remaining_accounts_for_earlier_occurrences() {
        let end = EndCondition::AfterCount {
            count: NonZeroU32::new(5).unwrap(),
        };
        assert_eq!(end.remaining(0), Some(5));
        assert_eq!(end.remaining(3), Some(2));
        assert_eq!(end.remaining(9), Some(0));
        assert_eq!(EndCondition::Never.remaining(3), None);
    }

    #[test]
    fn test_on_date_is_inclusive() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = EndCondition::OnDate { date };
        assert!(!end.is_past(date));
        assert!(end.is_past(date.succ_opt().unwrap()));
    }
}
