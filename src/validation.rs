//! Validation helper functions for command-line input
//!
//! This module turns raw argument strings into engine values with messages
//! that tell the user which form was expected.

use crate::migration::LegacyPattern;
use crate::rule::EndCondition;
use chrono::NaiveDate;

/// Parse and validate a date argument
///
/// # Arguments
/// * `date_str` - Date string in YYYY-MM-DD format
///
/// # Returns
/// Result containing parsed NaiveDate or error message
pub fn parse_date_arg(date_str: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        format!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
            date_str
        )
    })
}

/// Parse and validate an end condition argument (`never`, `after:N`, `on:YYYY-MM-DD`)
pub fn parse_end_condition_arg(end_str: &str) -> Result<EndCondition, String> {
    end_str.parse::<EndCondition>().map_err(|e| e.to_string())
}

/// Parse and validate a legacy pattern name
pub fn parse_legacy_pattern_arg(pattern_str: &str) -> Result<LegacyPattern, String> {
    pattern_str.parse::<LegacyPattern>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_arg() {
        assert_eq!(
            parse_date_arg("2025-03-15"),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap())
        );
        let err = parse_date_arg("03/15/2025").unwrap_err();
        assert!(err.contains("Use YYYY-MM-DD"));
    }

    #[test]
    fn test_parse_end_condition_arg_message() {
        let err = parse_end_condition_arg("until:friday").unwrap_err();
        assert_eq!(
            err,
            "Invalid end condition 'until:friday'. Valid forms: never, after:N, on:YYYY-MM-DD"
        );
    }

    #[test]
    fn test_parse_legacy_pattern_arg() {
        assert_eq!(parse_legacy_pattern_arg("monthly"), Ok(LegacyPattern::monthly));
        assert!(parse_legacy_pattern_arg("hourly").is_err());
    }
}
