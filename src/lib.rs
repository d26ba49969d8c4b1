//! stint - Analyze internship activity logs from local export files
//!
//! This library provides functionality to:
//! - Parse JSON and JSONL activity exports from the stint data directory
//! - Bucket activity by Monday-aligned week and by calendar month
//! - Tally free-text tags and skills/tools
//! - Generate reports in table and JSON formats
//!
//! # Examples
//!
//! ```no_run
//! use stint::{
//!     aggregation::{PeriodAggregator, PeriodRange, Totals},
//!     data_loader::DataLoader,
//! };
//! use chrono::NaiveDate;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> stint::Result<()> {
//!     let loader = DataLoader::new().await?;
//!
//!     let records_stream = loader.load_records();
//!     tokio::pin!(records_stream);
//!     let mut records = Vec::new();
//!     while let Some(result) = records_stream.next().await {
//!         records.push(result?);
//!     }
//!
//!     let range = PeriodRange::new(
//!         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
//!     );
//!     let weeks = PeriodAggregator::new().bucket_by_week(&records, &range);
//!     let totals = Totals::from_week_buckets(&weeks);
//!
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod cli;
pub mod data_loader;
pub mod error;
pub mod filters;
pub mod output;
pub mod types;

// Re-export commonly used types
pub use aggregation::{
    LabelCount, MonthBucket, PeriodAggregator, PeriodRange, Totals, WeekBucket,
};
pub use error::{Result, StintError};
pub use types::{ActivityDate, ActivityRecord, ActivityStatus, Minutes};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
