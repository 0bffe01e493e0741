//! Error types for the recurrence engine
//!
//! Lenient parsing never fails, so these only surface from the strict codec,
//! legacy import, and end-condition decoding.

use thiserror::Error;

/// A pattern string that the strict codec refused to accept.
///
/// Parsing is all-or-nothing: when this error is returned no rule was built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed recurrence pattern '{raw_input}': {reason}")]
pub struct MalformedPatternError {
    /// Human-readable explanation of the first problem found
    pub reason: String,
    /// The input exactly as it was handed to the parser
    pub raw_input: String,
}

impl MalformedPatternError {
    pub fn new(reason: impl Into<String>, raw_input: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            raw_input: raw_input.into(),
        }
    }
}

/// Failure to decode an end condition from its text or stored form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndConditionError {
    #[error("Invalid end condition '{0}'. Valid forms: never, after:N, on:YYYY-MM-DD")]
    UnknownKind(String),

    #[error("Invalid occurrence count '{0}'. Use a positive integer (e.g., 'after:10')")]
    InvalidCount(String),

    #[error("Invalid end date '{0}'. Use YYYY-MM-DD (e.g., 'on:2025-03-15')")]
    InvalidDate(String),

    #[error("End condition '{kind}' is missing its '{field}' value")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}
