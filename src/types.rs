//! Core domain types for stint
//!
//! This module contains the fundamental types used throughout the stint
//! library: durations, calendar dates as exported by the backing store,
//! the canonical activity status enumeration, and the activity record itself.
//!
//! The record store's exports are dirty by design tolerance: dates arrive as
//! raw strings that may not parse, durations may be missing or negative, and
//! statuses come in several spellings. All of that is normalized here, at the
//! deserialization boundary, so the rest of the crate works with clean values.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Logged duration in whole minutes
///
/// Supports arithmetic for aggregation and owns the minutes-to-hours
/// conversion so it is not re-derived per view.
///
/// # Examples
/// ```
/// use stint::types::Minutes;
///
/// let m = Minutes::new(90) + Minutes::new(30);
/// assert_eq!(m.get(), 120);
/// assert_eq!(m.as_hours(), 2.0);
/// assert_eq!(m.to_string(), "2h 0m");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Minutes(u64);

impl Minutes {
    /// Zero minutes
    pub const ZERO: Self = Self(0);

    /// Create a new Minutes value
    pub fn new(minutes: u64) -> Self {
        Self(minutes)
    }

    /// Get the raw minute count
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Convert to fractional hours
    pub fn as_hours(&self) -> f64 {
        self.0 as f64 / 60.0
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 60 {
            write!(f, "{}m", self.0)
        } else {
            write!(f, "{}h {}m", self.0 / 60, self.0 % 60)
        }
    }
}

impl Add for Minutes {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Minutes {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl<'de> Deserialize<'de> for Minutes {
    /// Deserialize from any JSON number; negative or non-finite values
    /// collapse to zero rather than failing the record.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        if raw.is_finite() && raw > 0.0 {
            Ok(Self(raw as u64))
        } else {
            Ok(Self(0))
        }
    }
}

/// Calendar date of an activity, as exported by the record store
///
/// The raw string is preserved; parsing is attempted on demand. A record
/// whose date does not parse is excluded from date-bucketed aggregates but
/// never causes an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityDate(String);

impl ActivityDate {
    /// Create from a raw date string
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Create from an already-valid calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }

    /// Get the raw string as exported
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Parse to a calendar date
    ///
    /// Accepts plain `YYYY-MM-DD` dates and timestamp strings with a
    /// `YYYY-MM-DD` prefix (the store exports both). Returns `None` for
    /// anything else.
    pub fn parse(&self) -> Option<NaiveDate> {
        let raw = self.0.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        raw.get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    }
}

impl fmt::Display for ActivityDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical activity status
///
/// The source data spells "in progress" several ways; normalization happens
/// once, at the data-access boundary, so every call site sees one
/// enumeration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    /// Work item finished
    Completed,
    /// Work item started but not finished
    InProgress,
    /// Work item not yet started
    #[default]
    Pending,
}

impl ActivityStatus {
    /// Normalize a raw status string from the record store
    ///
    /// Unknown spellings map to `Pending`, keeping dirty exports renderable.
    pub fn normalize(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// Canonical string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in_progress",
            Self::Pending => "pending",
        }
    }

    /// Whether this status counts toward the completion rate
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Fold case, spaces, hyphens and underscores so "In Progress",
        // "in_progress" and "inprogress" all compare equal.
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match folded.as_str() {
            "completed" | "complete" | "done" => Ok(Self::Completed),
            "inprogress" => Ok(Self::InProgress),
            "pending" | "planned" | "todo" => Ok(Self::Pending),
            _ => Err(format!("Invalid status: {s}")),
        }
    }
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<ActivityStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(ActivityStatus::normalize)
        .unwrap_or_default())
}

/// One logged internship activity
///
/// Externally owned by the record store; read-only to the aggregator. Field
/// names follow the store's camelCase export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Calendar date the work occurred
    pub date: ActivityDate,
    /// Total minutes logged for the record; missing or negative becomes zero
    #[serde(default)]
    pub duration_minutes: Minutes,
    /// Canonical status, normalized from the store's free-form spelling
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: ActivityStatus,
    /// Short description of the activity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Comma-delimited free-text tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Comma-delimited skills and tools used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills_tools: Option<String>,
}

impl ActivityRecord {
    /// Parsed calendar date, if the raw date is valid
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.parse()
    }
}
