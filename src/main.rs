//! recur - Command-line front end for the recurrence engine
//!
//! Summarizes, canonicalizes and previews recurrence patterns.
//! The actual implementation is in the `recur_engine` library.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use recur_engine::migration::{LegacyPattern, rule_from_legacy};
use recur_engine::validation::{parse_date_arg, parse_end_condition_arg, parse_legacy_pattern_arg};
use recur_engine::{EndCondition, EngineConfig, ParseMode, RecurrenceEngine, local_date_today};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// recur - inspect recurrence patterns such as "WEEKLY:2:1,3,5"
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML engine config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reject malformed patterns instead of falling back to defaults
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the English summary of a pattern
    Summary {
        pattern: String,
    },

    /// Print the canonical form of a pattern
    Normalize {
        pattern: String,
    },

    /// List upcoming occurrence dates
    Next {
        pattern: String,

        /// Anchor date (exclusive), defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,

        /// Maximum number of dates, defaults to the configured preview count
        #[arg(long)]
        count: Option<usize>,

        /// End condition: never, after:N, on:YYYY-MM-DD
        #[arg(long, value_parser = parse_end_condition_arg, default_value = "never")]
        end: EndCondition,

        /// Occurrences the series already had before the anchor
        #[arg(long, default_value_t = 0)]
        done: u32,
    },

    /// Convert legacy recurrence columns into a canonical pattern
    Import {
        #[arg(value_parser = parse_legacy_pattern_arg)]
        pattern: LegacyPattern,

        /// Comma-separated config list, e.g. "Monday,Friday" or "12-25"
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if args.strict {
        config.parse_mode = ParseMode::Strict;
    }
    let engine = RecurrenceEngine::new(config);

    match args.command {
        Command::Summary { pattern } => {
            let rule = engine.parse(&pattern)?;
            println!("{}", engine.summarize(&rule));
        }
        Command::Normalize { pattern } => {
            println!("{}", engine.normalize(&pattern)?);
        }
        Command::Next {
            pattern,
            from,
            count,
            end,
            done,
        } => {
            let rule = engine.parse(&pattern)?;
            let anchor = from.unwrap_or_else(local_date_today);
            let count = count.unwrap_or(engine.config().preview_count);
            let dates = engine.occurrences_continuing(&rule, &end, anchor, count, done);

            println!("{} ({})", engine.summarize(&rule), engine.format(&rule));
            if dates.is_empty() {
                println!(
                    "No occurrences within {} days after {}",
                    engine.config().search_horizon_days,
                    anchor
                );
            }
            for date in dates {
                println!("  {} {}", date.format("%Y-%m-%d"), date.format("%a"));
            }
        }
        Command::Import { pattern, config } => {
            let rule = rule_from_legacy(pattern, config.as_deref())?;
            println!("{}", engine.format(&rule));
        }
    }

    Ok(())
}
