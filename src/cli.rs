//! CLI interface for stint
//!
//! This module defines the command-line interface using clap: global filter
//! and output flags on the top-level struct, plus one subcommand per report.
//!
//! # Example
//!
//! ```bash
//! # Weekly report for January 2024, with per-day breakdown
//! stint weekly --start 2024-01-01 --end 2024-01-31 --daily
//!
//! # Monthly report as JSON
//! stint monthly --json
//!
//! # Ten most frequent tags among completed work
//! stint tags --status completed
//! ```

use crate::error::{Result, StintError};
use clap::{Args, Parser, Subcommand};

/// Analyze internship activity logs
#[derive(Parser, Debug, Clone)]
#[command(name = "stint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress informational output (only warnings and errors)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Reporting period start (YYYY-MM-DD or YYYY-MM); defaults to the earliest record
    #[arg(long, global = true)]
    pub start: Option<String>,

    /// Reporting period end (YYYY-MM-DD or YYYY-MM); defaults to the latest record
    #[arg(long, global = true)]
    pub end: Option<String>,

    /// Only include records dated on or after this date (YYYY-MM-DD or YYYY-MM)
    #[arg(long, global = true)]
    pub since: Option<String>,

    /// Only include records dated on or before this date (YYYY-MM-DD or YYYY-MM)
    #[arg(long, global = true)]
    pub until: Option<String>,

    /// Only include records with this status (completed, in_progress, pending)
    #[arg(long, global = true)]
    pub status: Option<String>,

    /// Only include records carrying this tag
    #[arg(long, short = 't', global = true)]
    pub tag: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Arguments for the weekly report
#[derive(Args, Debug, Clone, Default)]
pub struct WeeklyArgs {
    /// Show per-day breakdown rows under each week
    #[arg(long, short = 'd')]
    pub daily: bool,
}

/// Arguments for the tags and tools reports
#[derive(Args, Debug, Clone)]
pub struct TopArgs {
    /// Number of labels to show
    #[arg(long, default_value = "10")]
    pub top: usize,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show weekly activity summary
    Weekly(WeeklyArgs),
    /// Show monthly activity summary
    Monthly,
    /// Show most frequent tags
    Tags(TopArgs),
    /// Show most frequent skills and tools
    Tools(TopArgs),
    /// Show overall totals
    Summary,
}

/// Parse a date flag in YYYY-MM-DD or YYYY-MM form
///
/// A month shorthand resolves to its first day, so `--start 2024-03`
/// means `--start 2024-03-01`.
///
/// # Example
///
/// ```
/// use stint::cli::parse_date_filter;
/// use chrono::Datelike;
///
/// let date = parse_date_filter("2024-01-15").unwrap();
/// assert_eq!(date.day(), 15);
///
/// let date = parse_date_filter("2024-01").unwrap();
/// assert_eq!(date.day(), 1);
/// ```
pub fn parse_date_filter(date_str: &str) -> Result<chrono::NaiveDate> {
    let trimmed = date_str.trim();

    // Full date first; a month shorthand is padded out to its first day,
    // which also rejects out-of-range months via the same calendar check.
    chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| chrono::NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
        .map_err(|_| {
            StintError::InvalidDate(format!(
                "'{date_str}' is not a YYYY-MM-DD date or YYYY-MM month"
            ))
        })
}
