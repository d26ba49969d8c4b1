//! Aggregation module for summarizing activity records
//!
//! This module provides the period aggregator: it consumes an in-memory
//! collection of activity records plus a reporting range and produces
//! display-ready weekly and monthly buckets, label tallies, and overall
//! totals.
//!
//! The aggregator is a pure, synchronous computation: it performs no I/O,
//! never mutates its inputs, and allocates only fresh output structures, so
//! it is safely callable repeatedly and from multiple contexts. The analysis
//! end is always clamped to "today" so open-ended internships report only
//! elapsed progress; "today" is injected via [`PeriodAggregator::with_today`]
//! to keep that clamp deterministic under test.
//!
//! # Examples
//!
//! ```
//! use stint::aggregation::{PeriodAggregator, PeriodRange};
//! use stint::types::{ActivityDate, ActivityRecord, ActivityStatus, Minutes};
//! use chrono::NaiveDate;
//!
//! let records = vec![ActivityRecord {
//!     date: ActivityDate::new("2024-01-02"),
//!     duration_minutes: Minutes::new(90),
//!     status: ActivityStatus::Completed,
//!     title: None,
//!     tags: Some("api, testing".to_string()),
//!     skills_tools: None,
//! }];
//!
//! let range = PeriodRange::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//! );
//! let aggregator = PeriodAggregator::new()
//!     .with_today(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
//!
//! let weeks = aggregator.bucket_by_week(&records, &range);
//! assert_eq!(weeks[0].total_minutes, Minutes::new(90));
//! assert_eq!(weeks[0].completion_rate, 100);
//! ```

use crate::types::{ActivityRecord, Minutes};
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Reporting window: the internship's nominal start and end dates
///
/// The end is nominal; aggregation clamps it to "today" so that unelapsed
/// future time is never reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    /// First date of the window (inclusive)
    pub start: NaiveDate,
    /// Nominal last date of the window (inclusive, not necessarily elapsed)
    pub end: NaiveDate,
}

impl PeriodRange {
    /// Create a new range
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// End actually used for analysis: the lesser of today and the nominal end
    pub fn effective_end(&self, today: NaiveDate) -> NaiveDate {
        self.end.min(today)
    }
}

/// Minutes logged on a single day of a weekly bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMinutes {
    /// Calendar date of the day
    pub date: NaiveDate,
    /// Minutes logged on that date
    pub minutes: Minutes,
}

impl DayMinutes {
    /// Day of week for this slot
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

/// Weekly aggregate of activity records
///
/// Weeks are Monday-aligned; the final bucket of a range may be shorter than
/// seven days when clipped by the effective analysis end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBucket {
    /// Monday of the bucket's week
    pub week_start: NaiveDate,
    /// Last day covered by the bucket (Sunday, or the effective end if earlier)
    pub week_end: NaiveDate,
    /// Sum of minutes for records dated within the bucket
    pub total_minutes: Minutes,
    /// Number of records in the bucket
    pub records: usize,
    /// Number of completed records in the bucket
    pub completed: usize,
    /// Percentage of records completed, rounded; 0 for empty buckets
    pub completion_rate: u32,
    /// Per-day minutes, ordered from `week_start` through `week_end`
    pub daily_breakdown: Vec<DayMinutes>,
}

/// Monthly aggregate of activity records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// First day of the bucket's month
    pub month_start: NaiveDate,
    /// Last day covered by the bucket (month end, or the effective end if earlier)
    pub month_end: NaiveDate,
    /// Sum of minutes for records dated within the bucket
    pub total_minutes: Minutes,
    /// Number of records in the bucket
    pub records: usize,
    /// Number of completed records in the bucket
    pub completed: usize,
    /// Percentage of records completed, rounded; 0 for empty buckets
    pub completion_rate: u32,
}

impl MonthBucket {
    /// Month label in YYYY-MM form
    pub fn label(&self) -> String {
        self.month_start.format("%Y-%m").to_string()
    }
}

/// Accumulator shared by weekly and monthly bucketing
#[derive(Default)]
struct BucketAccumulator {
    minutes: Minutes,
    records: usize,
    completed: usize,
}

impl BucketAccumulator {
    fn add(&mut self, record: &ActivityRecord) {
        self.minutes += record.duration_minutes;
        self.records += 1;
        if record.status.is_completed() {
            self.completed += 1;
        }
    }

    fn completion_rate(&self) -> u32 {
        if self.records == 0 {
            0
        } else {
            ((self.completed as f64 / self.records as f64) * 100.0).round() as u32
        }
    }
}

/// Monday of the week containing `date`
fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First day of the month containing `date`
fn month_start_of(date: NaiveDate) -> NaiveDate {
    // The first of any valid date's month is itself valid.
    date.with_day(1).expect("first of month is always valid")
}

/// Last day of the month beginning at `month_start`
fn month_end_of(month_start: NaiveDate) -> NaiveDate {
    month_start
        .checked_add_months(Months::new(1))
        .expect("month arithmetic stays in range")
        - Duration::days(1)
}

/// The period aggregation engine
///
/// Holds the injected "today" used for the effective-end clamp; everything
/// else is stateless.
#[derive(Debug, Clone, Copy)]
pub struct PeriodAggregator {
    today: NaiveDate,
}

impl Default for PeriodAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodAggregator {
    /// Create an aggregator clamped to the local calendar date
    pub fn new() -> Self {
        Self {
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Override "today" (fixed-date reports, deterministic tests)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The date used as "today" for effective-end clamping
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Resolve dates once, dropping records outside `[from, to]` and logging
    /// records whose raw date does not parse as a data-quality event.
    fn dated_records<'a>(
        records: &'a [ActivityRecord],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<(NaiveDate, &'a ActivityRecord)> {
        let mut dated = Vec::with_capacity(records.len());
        let mut unparseable = 0usize;

        for record in records {
            match record.parsed_date() {
                Some(date) if date >= from && date <= to => dated.push((date, record)),
                Some(_) => {}
                None => unparseable += 1,
            }
        }

        if unparseable > 0 {
            warn!(
                "Excluded {} record(s) with unparseable dates from bucketing",
                unparseable
            );
        }

        dated
    }

    /// Partition records into Monday-aligned weekly buckets
    ///
    /// The sequence is eager, ordered ascending by week start, contiguous and
    /// non-overlapping; the final bucket is clipped to the effective end. A
    /// degenerate range (start after effective end) yields a single empty
    /// one-day bucket so the reporting view stays renderable.
    pub fn bucket_by_week(
        &self,
        records: &[ActivityRecord],
        range: &PeriodRange,
    ) -> Vec<WeekBucket> {
        let effective_end = range.effective_end(self.today);
        let anchor = week_start_of(range.start);

        if effective_end < range.start {
            return vec![Self::empty_week(anchor)];
        }

        let dated = Self::dated_records(records, range.start, effective_end);
        let week_count = ((effective_end - anchor).num_days() / 7) as usize + 1;

        let mut buckets = Vec::with_capacity(week_count);
        for i in 0..week_count {
            let week_start = anchor + Duration::weeks(i as i64);
            if week_start > effective_end {
                break;
            }
            let week_end = (week_start + Duration::days(6)).min(effective_end);

            let day_count = ((week_end - week_start).num_days() + 1) as usize;
            let mut daily: Vec<DayMinutes> = (0..day_count)
                .map(|offset| DayMinutes {
                    date: week_start + Duration::days(offset as i64),
                    minutes: Minutes::ZERO,
                })
                .collect();

            let mut acc = BucketAccumulator::default();
            for (date, record) in &dated {
                if *date >= week_start && *date <= week_end {
                    acc.add(record);
                    let slot = (*date - week_start).num_days() as usize;
                    daily[slot].minutes += record.duration_minutes;
                }
            }

            buckets.push(WeekBucket {
                week_start,
                week_end,
                total_minutes: acc.minutes,
                records: acc.records,
                completed: acc.completed,
                completion_rate: acc.completion_rate(),
                daily_breakdown: daily,
            });
        }

        buckets
    }

    /// Partition records into calendar-month buckets
    ///
    /// Mirrors the weekly algorithm at month granularity; the final bucket's
    /// end is clamped to the effective analysis end.
    pub fn bucket_by_month(
        &self,
        records: &[ActivityRecord],
        range: &PeriodRange,
    ) -> Vec<MonthBucket> {
        let effective_end = range.effective_end(self.today);
        let anchor = month_start_of(range.start);

        if effective_end < range.start {
            return vec![Self::empty_month(anchor)];
        }

        let dated = Self::dated_records(records, range.start, effective_end);
        let month_count = (effective_end.year() - anchor.year()) * 12
            + (effective_end.month() as i32 - anchor.month() as i32)
            + 1;

        let mut buckets = Vec::with_capacity(month_count.max(1) as usize);
        for i in 0..month_count.max(1) as u32 {
            let month_start = anchor
                .checked_add_months(Months::new(i))
                .expect("month arithmetic stays in range");
            if month_start > effective_end {
                break;
            }
            let month_end = month_end_of(month_start).min(effective_end);

            let mut acc = BucketAccumulator::default();
            for (date, record) in &dated {
                if *date >= month_start && *date <= month_end {
                    acc.add(record);
                }
            }

            buckets.push(MonthBucket {
                month_start,
                month_end,
                total_minutes: acc.minutes,
                records: acc.records,
                completed: acc.completed,
                completion_rate: acc.completion_rate(),
            });
        }

        buckets
    }

    // Degenerate ranges collapse to a single one-day bucket.
    fn empty_week(week_start: NaiveDate) -> WeekBucket {
        WeekBucket {
            week_start,
            week_end: week_start,
            total_minutes: Minutes::ZERO,
            records: 0,
            completed: 0,
            completion_rate: 0,
            daily_breakdown: vec![DayMinutes {
                date: week_start,
                minutes: Minutes::ZERO,
            }],
        }
    }

    fn empty_month(month_start: NaiveDate) -> MonthBucket {
        MonthBucket {
            month_start,
            month_end: month_end_of(month_start),
            total_minutes: Minutes::ZERO,
            records: 0,
            completed: 0,
            completion_rate: 0,
        }
    }
}

/// A free-text label and how often it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    /// The trimmed label text
    pub label: String,
    /// Number of records carrying the label
    pub count: usize,
}

/// Count tag occurrences across records, in first-occurrence order
pub fn tally_tags(records: &[ActivityRecord]) -> Vec<LabelCount> {
    tally_field(records.iter().map(|r| r.tags.as_deref()))
}

/// Count skill/tool occurrences across records, in first-occurrence order
pub fn tally_tools(records: &[ActivityRecord]) -> Vec<LabelCount> {
    tally_field(records.iter().map(|r| r.skills_tools.as_deref()))
}

/// Split each comma-delimited field, trim the pieces, and count the
/// non-empty labels. Output order is insertion order of first occurrence.
fn tally_field<'a>(fields: impl Iterator<Item = Option<&'a str>>) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for field in fields.flatten() {
        for piece in field.split(',') {
            let label = piece.trim();
            if label.is_empty() {
                continue;
            }
            match index.get(label) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(label.to_string(), counts.len());
                    counts.push(LabelCount {
                        label: label.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts
}

/// Keep the `n` most frequent labels, descending by count
///
/// The sort is stable, so ties keep their first-occurrence order.
pub fn top_labels(mut counts: Vec<LabelCount>, n: usize) -> Vec<LabelCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Overall totals across a record set or a bucket sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of logged minutes
    pub total_minutes: Minutes,
    /// Number of records
    pub records: usize,
    /// Number of completed records
    pub completed: usize,
    /// Percentage of records completed, rounded; 0 when there are none
    pub completion_rate: u32,
}

impl Totals {
    fn finish(minutes: Minutes, records: usize, completed: usize) -> Self {
        let completion_rate = if records == 0 {
            0
        } else {
            ((completed as f64 / records as f64) * 100.0).round() as u32
        };
        Self {
            total_minutes: minutes,
            records,
            completed,
            completion_rate,
        }
    }

    /// Totals over a raw record collection (dates not required to parse)
    pub fn from_records(records: &[ActivityRecord]) -> Self {
        let mut minutes = Minutes::ZERO;
        let mut completed = 0;
        for record in records {
            minutes += record.duration_minutes;
            if record.status.is_completed() {
                completed += 1;
            }
        }
        Self::finish(minutes, records.len(), completed)
    }

    /// Totals over weekly buckets
    pub fn from_week_buckets(buckets: &[WeekBucket]) -> Self {
        let mut minutes = Minutes::ZERO;
        let mut records = 0;
        let mut completed = 0;
        for bucket in buckets {
            minutes += bucket.total_minutes;
            records += bucket.records;
            completed += bucket.completed;
        }
        Self::finish(minutes, records, completed)
    }

    /// Totals over monthly buckets
    pub fn from_month_buckets(buckets: &[MonthBucket]) -> Self {
        let mut minutes = Minutes::ZERO;
        let mut records = 0;
        let mut completed = 0;
        for bucket in buckets {
            minutes += bucket.total_minutes;
            records += bucket.records;
            completed += bucket.completed;
        }
        Self::finish(minutes, records, completed)
    }
}
