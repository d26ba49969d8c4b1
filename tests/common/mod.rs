//! Common test utilities and helpers for stint tests
//!
//! This module provides reusable test utilities, mock data generators,
//! and helper functions to make testing easier and more consistent.

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use stint::data_loader::DataLoader;
use tempfile::TempDir;
use tokio::fs;
use tokio::io::AsyncWriteExt;

// Global mutex to serialize environment variable modifications in tests
pub static ENV_MUTEX: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Common test tags used across tests
#[allow(dead_code)]
pub const TEST_TAGS: &[&str] = &["api", "testing", "design", "documentation"];

/// Builder for creating test activity records as export JSON
pub struct ActivityRecordBuilder {
    date: String,
    minutes: i64,
    status: String,
    title: Option<String>,
    tags: Option<String>,
    tools: Option<String>,
}

impl ActivityRecordBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            date: "2024-01-15".to_string(),
            minutes: 60,
            status: "completed".to_string(),
            title: None,
            tags: None,
            tools: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date.format("%Y-%m-%d").to_string();
        self
    }

    /// Set the raw date string verbatim (for malformed-date cases)
    pub fn with_raw_date(mut self, raw: &str) -> Self {
        self.date = raw.to_string();
        self
    }

    pub fn with_minutes(mut self, minutes: i64) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    #[allow(dead_code)]
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_tags(mut self, tags: &str) -> Self {
        self.tags = Some(tags.to_string());
        self
    }

    pub fn with_tools(mut self, tools: &str) -> Self {
        self.tools = Some(tools.to_string());
        self
    }

    /// Build as a single-line JSON string in the store's export format
    #[allow(clippy::wrong_self_convention)]
    pub fn to_json(self) -> String {
        let title_field = self
            .title
            .map(|t| format!(r#","title":"{}""#, t))
            .unwrap_or_default();
        let tags_field = self
            .tags
            .map(|t| format!(r#","tags":"{}""#, t))
            .unwrap_or_default();
        let tools_field = self
            .tools
            .map(|t| format!(r#","skillsTools":"{}""#, t))
            .unwrap_or_default();

        format!(
            r#"{{"date":"{}","durationMinutes":{},"status":"{}"{}{}{}}}"#,
            self.date, self.minutes, self.status, title_field, tags_field, tools_field
        )
    }
}

impl Default for ActivityRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to create a test data directory with a JSONL export
pub async fn create_test_data_dir(lines: Vec<String>) -> (TempDir, DataLoader) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();

    // Write lines to a JSONL export (no mutex needed for file operations)
    let jsonl_path = path.join("activities.jsonl");
    let mut file = fs::File::create(&jsonl_path).await.unwrap();

    for line in lines {
        file.write_all(line.as_bytes()).await.unwrap();
        file.write_all(b"\n").await.unwrap();
    }

    drop(file);

    // Lock the mutex for environment variable modification and loader
    // creation. STINT_DATA_PATH replaces platform discovery entirely, so
    // the loader sees only the temp directory.
    let loader = {
        let _lock = ENV_MUTEX.lock().await;

        // Note: env functions are unsafe in Rust 1.82+ due to thread-safety concerns.
        // The mutex serializes access, but the calls still require unsafe blocks.
        unsafe {
            std::env::set_var("STINT_DATA_PATH", path.to_str().unwrap());
        }

        let loader = DataLoader::new().await.expect("Failed to create DataLoader");

        unsafe {
            std::env::remove_var("STINT_DATA_PATH");
        }

        loader
    };

    (temp_dir, loader)
}

/// Generate one completed record per day across a date range
pub fn generate_internship_data(
    start_date: NaiveDate,
    end_date: NaiveDate,
    minutes_per_day: i64,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = start_date;

    while current <= end_date {
        lines.push(
            ActivityRecordBuilder::new()
                .with_date(current)
                .with_minutes(minutes_per_day)
                .with_status("completed")
                .to_json(),
        );
        current += Duration::days(1);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder_json() {
        let json = ActivityRecordBuilder::new()
            .with_raw_date("2024-02-01")
            .with_minutes(45)
            .with_status("in progress")
            .with_tags("api, testing")
            .to_json();

        assert!(json.contains(r#""date":"2024-02-01""#));
        assert!(json.contains(r#""durationMinutes":45"#));
        assert!(json.contains(r#""status":"in progress""#));
        assert!(json.contains(r#""tags":"api, testing""#));
        assert!(!json.contains("skillsTools"));
    }

    #[test]
    fn test_generate_internship_data() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let lines = generate_internship_data(start, end, 60);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("2024-01-01"));
        assert!(lines[2].contains("2024-01-03"));
    }
}
