//! Data loader module for discovering and parsing export files
//!
//! This module handles discovery of internship activity exports on the local
//! system and provides streaming access to parse them. Exports come in two
//! shapes: `.jsonl` files with one record per line, and `.json` files holding
//! an array of records.
//!
//! # Discovery
//!
//! The loader searches, in order:
//! - the platform data directory, e.g. `~/.local/share/stint` on Linux
//! - `~/.stint`
//!
//! Setting the `STINT_DATA_PATH` environment variable replaces that search
//! entirely; only the named directory is used.
//!
//! # Examples
//!
//! ```no_run
//! use stint::data_loader::DataLoader;
//! use futures::StreamExt;
//!
//! # async fn example() -> stint::Result<()> {
//! let loader = DataLoader::new().await?;
//!
//! let records = loader.load_records();
//! tokio::pin!(records);
//! while let Some(result) = records.next().await {
//!     let record = result?;
//!     println!("{}: {}", record.date, record.duration_minutes);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, StintError};
use crate::types::ActivityRecord;
use futures::StreamExt;
use futures::stream::Stream;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Data loader for discovering and streaming activity export files
pub struct DataLoader {
    /// Discovered stint data directories
    data_paths: Vec<PathBuf>,
}

impl DataLoader {
    /// Create a new DataLoader by discovering stint data directories
    ///
    /// # Errors
    ///
    /// Returns an error if no stint data directories are found
    pub async fn new() -> Result<Self> {
        let paths = Self::discover_data_paths();
        if paths.is_empty() {
            return Err(StintError::NoDataDirectory);
        }

        debug!("Discovered {} stint data directories", paths.len());
        Ok(Self { data_paths: paths })
    }

    /// Discover stint data directories on the system
    fn discover_data_paths() -> Vec<PathBuf> {
        Self::resolve_data_paths(std::env::var("STINT_DATA_PATH").ok())
    }

    /// Resolve search paths, honoring an explicit override
    ///
    /// An override replaces platform discovery entirely; if it names a
    /// missing directory the result is empty rather than falling back.
    fn resolve_data_paths(override_path: Option<String>) -> Vec<PathBuf> {
        if let Some(custom_path) = override_path {
            let path = PathBuf::from(custom_path);
            if path.exists() {
                return vec![path];
            }
            return Vec::new();
        }

        let mut paths = Vec::new();

        if let Some(data_dir) = dirs::data_dir() {
            let stint_path = data_dir.join("stint");
            if stint_path.exists() {
                paths.push(stint_path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let stint_path = home.join(".stint");
            if stint_path.exists() {
                paths.push(stint_path);
            }
        }

        paths
    }

    /// Find all export files in the discovered directories
    ///
    /// Recursively searches for `.json` and `.jsonl` files; results are
    /// sorted so load order is deterministic.
    pub fn find_export_files(&self) -> Vec<PathBuf> {
        let mut export_files = Vec::new();

        for base_path in &self.data_paths {
            for entry in WalkDir::new(base_path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                match entry.path().extension().and_then(|s| s.to_str()) {
                    Some("json") | Some("jsonl") => export_files.push(entry.into_path()),
                    _ => {}
                }
            }
        }

        export_files.sort();
        debug!("Found {} export files", export_files.len());
        export_files
    }

    /// Load activity records as an async stream
    ///
    /// Streams records from all discovered export files in order. Malformed
    /// lines and files are logged and skipped; only I/O failures surface as
    /// stream errors.
    pub fn load_records(&self) -> impl Stream<Item = Result<ActivityRecord>> + '_ {
        async_stream::stream! {
            for file_path in self.find_export_files() {
                match file_path.extension().and_then(|s| s.to_str()) {
                    Some("jsonl") => {
                        let records = Self::parse_jsonl_stream(file_path);
                        tokio::pin!(records);
                        while let Some(result) = records.next().await {
                            yield result;
                        }
                    }
                    _ => {
                        match Self::parse_json_file(&file_path).await {
                            Ok(records) => {
                                for record in records {
                                    yield Ok(record);
                                }
                            }
                            Err(e) => yield Err(e),
                        }
                    }
                }
            }
        }
    }

    /// Parse a single JSONL export as a stream
    fn parse_jsonl_stream(path: PathBuf) -> impl Stream<Item = Result<ActivityRecord>> {
        async_stream::stream! {
            let file = match tokio::fs::File::open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    yield Err(e.into());
                    return;
                }
            };

            let reader = BufReader::new(file);
            let mut lines = reader.lines();
            let mut line_number = 0;

            while let Ok(Some(line)) = lines.next_line().await {
                line_number += 1;

                if line.trim().is_empty() {
                    continue;
                }

                match serde_json::from_str::<ActivityRecord>(&line) {
                    Ok(record) => yield Ok(record),
                    Err(e) => {
                        warn!(
                            "Failed to parse line {} in {}: {}",
                            line_number,
                            path.display(),
                            e
                        );
                        // Continue processing other lines
                    }
                }
            }
        }
    }

    /// Parse a whole-file JSON export holding an array of records
    ///
    /// A file that fails to parse is logged and treated as empty; the other
    /// exports still load.
    async fn parse_json_file(path: &PathBuf) -> Result<Vec<ActivityRecord>> {
        let contents = tokio::fs::read_to_string(path).await?;
        match serde_json::from_str::<Vec<ActivityRecord>>(&contents) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    /// Get the discovered data directories
    ///
    /// Useful for debugging or displaying where data is being loaded from.
    pub fn paths(&self) -> &[PathBuf] {
        &self.data_paths
    }
}
