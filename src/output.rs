//! Output formatting module for stint
//!
//! This module provides formatters for displaying aggregated activity data in
//! different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use stint::output::get_formatter;
//! use stint::aggregation::{PeriodAggregator, PeriodRange, Totals};
//! use chrono::NaiveDate;
//!
//! let range = PeriodRange::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//! );
//! let aggregator = PeriodAggregator::new()
//!     .with_today(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
//! let weeks = aggregator.bucket_by_week(&[], &range);
//! let totals = Totals::from_week_buckets(&weeks);
//!
//! let formatter = get_formatter(false, false);
//! println!("{}", formatter.format_weekly(&weeks, &totals));
//! ```

use crate::aggregation::{LabelCount, MonthBucket, Totals, WeekBucket};
use prettytable::{Cell, Row, Table, format, row};
use serde_json::json;

/// Trait for output formatters
///
/// Implementations render the aggregator's buckets, tallies, and totals into
/// a display string; the binary picks one based on the `--json` flag.
pub trait OutputFormatter {
    /// Format weekly buckets with totals
    fn format_weekly(&self, data: &[WeekBucket], totals: &Totals) -> String;

    /// Format monthly buckets with totals
    fn format_monthly(&self, data: &[MonthBucket], totals: &Totals) -> String;

    /// Format a label tally under a heading ("Tags", "Skills & Tools")
    fn format_labels(&self, heading: &str, data: &[LabelCount]) -> String;

    /// Format overall totals
    fn format_summary(&self, totals: &Totals) -> String;
}

/// Table formatter for human-readable output
///
/// Produces ASCII tables suitable for terminal display. Durations are shown
/// both as raw minutes and as hours for readability.
pub struct TableFormatter {
    /// Whether weekly tables include per-day breakdown rows
    pub show_daily: bool,
}

impl TableFormatter {
    /// Create a new TableFormatter
    pub fn new(show_daily: bool) -> Self {
        Self { show_daily }
    }

    /// Format fractional hours with one decimal
    fn format_hours(minutes: crate::types::Minutes) -> String {
        format!("{:.1}h", minutes.as_hours())
    }

    /// Format a completion rate as a percentage
    fn format_rate(rate: u32) -> String {
        format!("{rate}%")
    }

    /// Create a totals row for bucket tables
    fn format_totals_row(totals: &Totals) -> Row {
        row![
            b -> "TOTAL",
            b -> "",
            br -> totals.total_minutes,
            br -> Self::format_hours(totals.total_minutes),
            br -> totals.records,
            br -> totals.completed,
            br -> Self::format_rate(totals.completion_rate)
        ]
    }
}

impl OutputFormatter for TableFormatter {
    fn format_weekly(&self, data: &[WeekBucket], totals: &Totals) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        table.set_titles(row![
            b -> "Week Start",
            b -> "Week End",
            b -> "Minutes",
            b -> "Hours",
            b -> "Records",
            b -> "Completed",
            b -> "Rate"
        ]);

        for bucket in data {
            table.add_row(row![
                bucket.week_start.format("%Y-%m-%d"),
                bucket.week_end.format("%Y-%m-%d"),
                r -> bucket.total_minutes,
                r -> Self::format_hours(bucket.total_minutes),
                r -> bucket.records,
                r -> bucket.completed,
                r -> Self::format_rate(bucket.completion_rate)
            ]);

            if self.show_daily {
                for day in &bucket.daily_breakdown {
                    table.add_row(row![
                        format!("  └─ {} {}", day.weekday(), day.date.format("%Y-%m-%d")),
                        "",
                        r -> day.minutes,
                        r -> Self::format_hours(day.minutes),
                        "",
                        "",
                        ""
                    ]);
                }
            }
        }

        // Add separator
        table.add_row(Row::new(vec![Cell::new(""); 7]));

        // Add totals row
        table.add_row(Self::format_totals_row(totals));

        table.to_string()
    }

    fn format_monthly(&self, data: &[MonthBucket], totals: &Totals) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        table.set_titles(row![
            b -> "Month",
            b -> "Through",
            b -> "Minutes",
            b -> "Hours",
            b -> "Records",
            b -> "Completed",
            b -> "Rate"
        ]);

        for bucket in data {
            table.add_row(row![
                bucket.label(),
                bucket.month_end.format("%Y-%m-%d"),
                r -> bucket.total_minutes,
                r -> Self::format_hours(bucket.total_minutes),
                r -> bucket.records,
                r -> bucket.completed,
                r -> Self::format_rate(bucket.completion_rate)
            ]);
        }

        // Add separator
        table.add_row(Row::new(vec![Cell::new(""); 7]));

        // Add totals row
        table.add_row(Self::format_totals_row(totals));

        table.to_string()
    }

    fn format_labels(&self, heading: &str, data: &[LabelCount]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        table.set_titles(row![
            b -> heading,
            b -> "Count"
        ]);

        for entry in data {
            table.add_row(row![
                entry.label,
                r -> entry.count
            ]);
        }

        table.to_string()
    }

    fn format_summary(&self, totals: &Totals) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        table.set_titles(row![b -> "Summary", b -> ""]);
        table.add_row(row!["Total time", r -> totals.total_minutes]);
        table.add_row(row!["Total hours", r -> Self::format_hours(totals.total_minutes)]);
        table.add_row(row!["Records", r -> totals.records]);
        table.add_row(row!["Completed", r -> totals.completed]);
        table.add_row(row!["Completion rate", r -> Self::format_rate(totals.completion_rate)]);

        table.to_string()
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    fn totals_json(totals: &Totals) -> serde_json::Value {
        json!({
            "total_minutes": totals.total_minutes,
            "total_hours": totals.total_minutes.as_hours(),
            "records": totals.records,
            "completed": totals.completed,
            "completion_rate": totals.completion_rate,
        })
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_weekly(&self, data: &[WeekBucket], totals: &Totals) -> String {
        let weeks: Vec<_> = data
            .iter()
            .map(|bucket| {
                json!({
                    "week_start": bucket.week_start.format("%Y-%m-%d").to_string(),
                    "week_end": bucket.week_end.format("%Y-%m-%d").to_string(),
                    "total_minutes": bucket.total_minutes,
                    "records": bucket.records,
                    "completed": bucket.completed,
                    "completion_rate": bucket.completion_rate,
                    "daily_breakdown": bucket.daily_breakdown.iter().map(|day| {
                        json!({
                            "date": day.date.format("%Y-%m-%d").to_string(),
                            "weekday": day.weekday().to_string(),
                            "minutes": day.minutes,
                        })
                    }).collect::<Vec<_>>(),
                })
            })
            .collect();

        let output = json!({
            "weekly": weeks,
            "totals": Self::totals_json(totals),
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_monthly(&self, data: &[MonthBucket], totals: &Totals) -> String {
        let months: Vec<_> = data
            .iter()
            .map(|bucket| {
                json!({
                    "month": bucket.label(),
                    "month_start": bucket.month_start.format("%Y-%m-%d").to_string(),
                    "month_end": bucket.month_end.format("%Y-%m-%d").to_string(),
                    "total_minutes": bucket.total_minutes,
                    "records": bucket.records,
                    "completed": bucket.completed,
                    "completion_rate": bucket.completion_rate,
                })
            })
            .collect();

        let output = json!({
            "monthly": months,
            "totals": Self::totals_json(totals),
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_labels(&self, heading: &str, data: &[LabelCount]) -> String {
        let output = json!({
            "heading": heading,
            "labels": data,
        });
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_summary(&self, totals: &Totals) -> String {
        serde_json::to_string_pretty(&Self::totals_json(totals))
            .unwrap_or_else(|_| "{}".to_string())
    }
}

/// Get the appropriate formatter based on output format preference
pub fn get_formatter(json: bool, show_daily: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new(show_daily))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{PeriodAggregator, PeriodRange};
    use crate::types::{ActivityDate, ActivityRecord, ActivityStatus, Minutes};
    use chrono::NaiveDate;

    fn sample_weeks() -> (Vec<WeekBucket>, Totals) {
        let records = vec![ActivityRecord {
            date: ActivityDate::new("2024-01-02"),
            duration_minutes: Minutes::new(90),
            status: ActivityStatus::Completed,
            title: None,
            tags: None,
            skills_tools: None,
        }];
        let range = PeriodRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        );
        let aggregator =
            PeriodAggregator::new().with_today(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        let weeks = aggregator.bucket_by_week(&records, &range);
        let totals = Totals::from_week_buckets(&weeks);
        (weeks, totals)
    }

    #[test]
    fn test_table_weekly() {
        let (weeks, totals) = sample_weeks();
        let output = TableFormatter::new(false).format_weekly(&weeks, &totals);

        assert!(output.contains("Week Start"));
        assert!(output.contains("2024-01-01"));
        assert!(output.contains("1h 30m"));
        assert!(output.contains("TOTAL"));
        assert!(output.contains("100%"));
        // No daily rows unless requested
        assert!(!output.contains("└─"));
    }

    #[test]
    fn test_table_weekly_with_daily_rows() {
        let (weeks, totals) = sample_weeks();
        let output = TableFormatter::new(true).format_weekly(&weeks, &totals);

        assert!(output.contains("└─ Mon 2024-01-01"));
        assert!(output.contains("└─ Tue 2024-01-02"));
    }

    #[test]
    fn test_json_weekly_parses_back() {
        let (weeks, totals) = sample_weeks();
        let output = JsonFormatter.format_weekly(&weeks, &totals);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["weekly"][0]["total_minutes"], 90);
        assert_eq!(parsed["weekly"][0]["daily_breakdown"][1]["minutes"], 90);
        assert_eq!(parsed["totals"]["completion_rate"], 100);
    }

    #[test]
    fn test_labels_table() {
        let counts = vec![
            LabelCount {
                label: "api".to_string(),
                count: 2,
            },
            LabelCount {
                label: "testing".to_string(),
                count: 1,
            },
        ];
        let output = TableFormatter::new(false).format_labels("Tags", &counts);
        assert!(output.contains("Tags"));
        assert!(output.contains("api"));

        let json_output = JsonFormatter.format_labels("Tags", &counts);
        let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
        assert_eq!(parsed["heading"], "Tags");
        assert_eq!(parsed["labels"][0]["label"], "api");
        assert_eq!(parsed["labels"][0]["count"], 2);
    }

    #[test]
    fn test_get_formatter() {
        let (weeks, totals) = sample_weeks();
        let json_output = get_formatter(true, false).format_weekly(&weeks, &totals);
        assert!(serde_json::from_str::<serde_json::Value>(&json_output).is_ok());

        let table_output = get_formatter(false, false).format_weekly(&weeks, &totals);
        assert!(table_output.contains("TOTAL"));
    }
}
