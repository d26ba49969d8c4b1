//! Record filtering for queries
//!
//! This module provides filtering of activity records by date window, status,
//! and tag before aggregation. Filters are cheap to construct, composable via
//! builder methods, and applicable either to a single record or to a whole
//! fallible record stream.

use crate::error::Result;
use crate::types::{ActivityRecord, ActivityStatus};
use chrono::NaiveDate;
use futures::stream::{Stream, StreamExt};

/// Filter criteria for activity records
///
/// An unset criterion matches everything; criteria combine with AND.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    status: Option<ActivityStatus>,
    tag: Option<String>,
}

impl RecordFilter {
    /// Create an empty filter that matches every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Only match records dated on or after this date
    pub fn with_since(mut self, since: NaiveDate) -> Self {
        self.since = Some(since);
        self
    }

    /// Only match records dated on or before this date
    pub fn with_until(mut self, until: NaiveDate) -> Self {
        self.until = Some(until);
        self
    }

    /// Only match records with this status
    pub fn with_status(mut self, status: ActivityStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only match records carrying this tag (case-insensitive)
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Whether a record passes all set criteria
    ///
    /// Date criteria require a parseable record date; records with
    /// unparseable dates fail any date-bounded filter.
    pub fn matches(&self, record: &ActivityRecord) -> bool {
        if self.since.is_some() || self.until.is_some() {
            let Some(date) = record.parsed_date() else {
                return false;
            };
            if let Some(since) = self.since {
                if date < since {
                    return false;
                }
            }
            if let Some(until) = self.until {
                if date > until {
                    return false;
                }
            }
        }

        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            let found = record.tags.as_deref().is_some_and(|tags| {
                tags.split(',')
                    .any(|piece| piece.trim().eq_ignore_ascii_case(tag))
            });
            if !found {
                return false;
            }
        }

        true
    }

    /// Apply the filter to a fallible record stream
    ///
    /// Errors pass through untouched so the caller decides how to handle
    /// them; only successfully parsed records are tested.
    pub fn filter_stream<S>(self, stream: S) -> impl Stream<Item = Result<ActivityRecord>>
    where
        S: Stream<Item = Result<ActivityRecord>>,
    {
        stream.filter(move |item| {
            let keep = match item {
                Ok(record) => self.matches(record),
                Err(_) => true,
            };
            futures::future::ready(keep)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityDate, Minutes};
    use futures::stream;

    fn record(date: &str, status: ActivityStatus, tags: Option<&str>) -> ActivityRecord {
        ActivityRecord {
            date: ActivityDate::new(date),
            duration_minutes: Minutes::new(60),
            status,
            title: None,
            tags: tags.map(String::from),
            skills_tools: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = RecordFilter::new();
        assert!(filter.matches(&record("2024-01-15", ActivityStatus::Pending, None)));
        assert!(filter.matches(&record("garbage", ActivityStatus::Completed, None)));
    }

    #[test]
    fn test_date_window() {
        let filter = RecordFilter::new()
            .with_since(date(2024, 1, 10))
            .with_until(date(2024, 1, 20));

        assert!(filter.matches(&record("2024-01-10", ActivityStatus::Pending, None)));
        assert!(filter.matches(&record("2024-01-20", ActivityStatus::Pending, None)));
        assert!(!filter.matches(&record("2024-01-09", ActivityStatus::Pending, None)));
        assert!(!filter.matches(&record("2024-01-21", ActivityStatus::Pending, None)));
        // Unparseable dates fail date-bounded filters
        assert!(!filter.matches(&record("garbage", ActivityStatus::Pending, None)));
    }

    #[test]
    fn test_status_filter() {
        let filter = RecordFilter::new().with_status(ActivityStatus::Completed);
        assert!(filter.matches(&record("2024-01-15", ActivityStatus::Completed, None)));
        assert!(!filter.matches(&record("2024-01-15", ActivityStatus::InProgress, None)));
    }

    #[test]
    fn test_tag_filter_case_insensitive() {
        let filter = RecordFilter::new().with_tag("API");
        assert!(filter.matches(&record(
            "2024-01-15",
            ActivityStatus::Pending,
            Some("api, testing")
        )));
        assert!(!filter.matches(&record(
            "2024-01-15",
            ActivityStatus::Pending,
            Some("design")
        )));
        assert!(!filter.matches(&record("2024-01-15", ActivityStatus::Pending, None)));
    }

    #[tokio::test]
    async fn test_filter_stream_passes_errors_through() {
        let items: Vec<Result<ActivityRecord>> = vec![
            Ok(record("2024-01-15", ActivityStatus::Completed, None)),
            Err(crate::error::StintError::NoDataDirectory),
            Ok(record("2024-01-15", ActivityStatus::Pending, None)),
        ];
        let filter = RecordFilter::new().with_status(ActivityStatus::Completed);

        let out: Vec<_> = filter.filter_stream(stream::iter(items)).collect().await;
        assert_eq!(out.len(), 2);
        assert!(out[0].is_ok());
        assert!(out[1].is_err());
    }
}
