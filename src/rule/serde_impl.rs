//! Serialization and deserialization implementations for rule values
//!
//! Both values are persisted verbatim by the surrounding application:
//! - `RecurrenceRule` as its canonical pattern string
//! - `EndCondition` as a `kind` discriminant plus optional `count` and `date`

use super::end_condition::EndCondition;
use super::pattern::RecurrenceRule;
use crate::codec;
use crate::error::EndConditionError;
use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::num::NonZeroU32;

impl Serialize for RecurrenceRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&codec::format(self))
    }
}

impl<'de> Deserialize<'de> for RecurrenceRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Stored strings go through the lenient parser, same as any other caller
        let text = String::deserialize(deserializer)?;
        Ok(codec::parse(&text))
    }
}

/// Column layout of a stored end condition
#[derive(Serialize, Deserialize)]
struct StoredEndCondition {
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

impl Serialize for EndCondition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let (count, date) = match self {
            EndCondition::Never => (None, None),
            EndCondition::AfterCount { count } => (Some(count.get()), None),
            EndCondition::OnDate { date } => (None, Some(*date)),
        };
        StoredEndCondition {
            kind: self.kind().to_string(),
            count,
            date,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EndCondition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let stored = StoredEndCondition::deserialize(deserializer)?;

        let end = match stored.kind.as_str() {
            "never" => EndCondition::Never,
            "after" => {
                let raw = stored
                    .count
                    .ok_or(EndConditionError::MissingField {
                        kind: "after",
                        field: "count",
                    })
                    .map_err(D::Error::custom)?;
                let count = NonZeroU32::new(raw)
                    .ok_or_else(|| EndConditionError::InvalidCount(raw.to_string()))
                    .map_err(D::Error::custom)?;
                EndCondition::AfterCount { count }
            }
            "on" => {
                let date = stored
                    .date
                    .ok_or(EndConditionError::MissingField {
                        kind: "on",
                        field: "date",
                    })
                    .map_err(D::Error::custom)?;
                EndCondition::OnDate { date }
            }
            other => {
                return Err(D::Error::custom(EndConditionError::UnknownKind(
                    other.to_string(),
                )));
            }
        };

        Ok(end)
    }
}
