use crate::codec::ParseMode;
use crate::occurrence::{
    DEFAULT_PREVIEW_COUNT, DEFAULT_SEARCH_HORIZON_DAYS, LeapDayPolicy, MatchOptions,
    WeeklyIntervalMode,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Engine settings, stored as TOML
///
/// ```toml
/// search_horizon_days = 730
/// preview_count = 5
/// weekly_interval = "every_nth_week"
/// leap_day = "feb28"
/// parse_mode = "strict"
/// ```
///
/// Every key is optional; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Days scanned past the anchor before enumeration gives up
    pub search_horizon_days: u32,
    /// Number of dates shown by the preview
    pub preview_count: usize,
    pub weekly_interval: WeeklyIntervalMode,
    pub leap_day: LeapDayPolicy,
    pub parse_mode: ParseMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_horizon_days: DEFAULT_SEARCH_HORIZON_DAYS,
            preview_count: DEFAULT_PREVIEW_COUNT,
            weekly_interval: WeeklyIntervalMode::default(),
            leap_day: LeapDayPolicy::default(),
            parse_mode: ParseMode::default(),
        }
    }
}

impl EngineConfig {
    /// Load settings from a TOML file.
    ///
    /// A file that does not exist yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            weekly_interval: self.weekly_interval,
            leap_day: self.leap_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("leap_day = \"mar1\"").unwrap();
        assert_eq!(config.leap_day, LeapDayPolicy::Mar1);
        assert_eq!(config.search_horizon_days, 365);
        assert_eq!(config.preview_count, 5);
        assert_eq!(config.parse_mode, ParseMode::Lenient);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result: Result<EngineConfig, _> = toml::from_str("leap_day = \"feb30\"");
        assert!(result.is_err());
    }
}
