//! Engine configuration loaded from TOML files
mod common;

use common::date;
use recur_engine::{
    EndCondition, EngineConfig, LeapDayPolicy, ParseMode, RecurrenceEngine, WeeklyIntervalMode,
};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_missing_config_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig::load(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.search_horizon_days, 365);
    assert_eq!(config.preview_count, 5);
    assert_eq!(config.weekly_interval, WeeklyIntervalMode::Ignore);
    assert_eq!(config.leap_day, LeapDayPolicy::Skip);
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recur.toml");
    let config = EngineConfig {
        search_horizon_days: 730,
        preview_count: 3,
        weekly_interval: WeeklyIntervalMode::EveryNthWeek,
        leap_day: LeapDayPolicy::Feb28,
        parse_mode: ParseMode::Strict,
    };
    config.save(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("weekly_interval = \"every_nth_week\""));
    assert!(content.contains("leap_day = \"feb28\""));

    assert_eq!(EngineConfig::load(&path).unwrap(), config);
}

#[test]
fn test_invalid_config_file_reports_path() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "search_horizon_days = \"forever\"").unwrap();

    let err = EngineConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_engine_applies_file_settings() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "preview_count = 2").unwrap();
    writeln!(file, "weekly_interval = \"every_nth_week\"").unwrap();
    writeln!(file, "parse_mode = \"strict\"").unwrap();

    let engine = RecurrenceEngine::from_config_file(file.path()).unwrap();

    // strict parsing
    assert!(engine.parse("WEEKLY:2:9").is_err());
    assert!(engine.normalize("weekly:2:3,1").is_ok());

    // every other week, anchored on Monday 2025-11-03
    let rule = engine.parse("WEEKLY:2:1").unwrap();
    assert_eq!(
        engine.preview(&rule, date(2025, 11, 3)),
        vec![date(2025, 11, 17), date(2025, 12, 1)]
    );
}

#[test]
fn test_lenient_engine_never_fails_to_parse() {
    let engine = RecurrenceEngine::default();
    assert_eq!(engine.config().parse_mode, ParseMode::Lenient);
    for input in ["", "???", "WEEKLY:x:y", "MONTHLY:1:2:3:4", "YEARLY:-"] {
        assert!(engine.parse(input).is_ok(), "input {:?}", input);
    }
    assert_eq!(engine.normalize("nonsense").unwrap(), "DAILY");
}

#[test]
fn test_horizon_from_config_bounds_results() {
    let engine = common::engine_with_horizon(10);
    let rule = engine.parse("MONTHLY:15").unwrap();
    assert!(
        engine
            .occurrences(&rule, &EndCondition::Never, date(2025, 1, 1), 5)
            .is_empty()
    );
    assert_eq!(
        engine.occurrences(&rule, &EndCondition::Never, date(2025, 1, 10), 5),
        vec![date(2025, 1, 15)]
    );
}
