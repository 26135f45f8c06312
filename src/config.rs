//! Tracker configuration.
//!
//! All tunables live in an immutable [`TrackerConfig`] handed to each
//! component at construction; nothing reads ambient global state. An
//! optional YAML file can override the defaults, discovered from an
//! explicit path, the working directory, or the user config directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Sheet column headers, in storage order. Row 0 of the grid holds exactly
/// these values.
pub const COLUMNS: [&str; 9] = [
    "ID",
    "Task",
    "Status",
    "Priority",
    "Created Date",
    "Due Date",
    "Notes",
    "Tags",
    "Assignee",
];

/// Column positions within a data row.
pub mod col {
    pub const ID: usize = 0;
    pub const TITLE: usize = 1;
    pub const STATUS: usize = 2;
    pub const PRIORITY: usize = 3;
    pub const CREATED: usize = 4;
    pub const DUE: usize = 5;
    pub const NOTES: usize = 6;
    pub const TAGS: usize = 7;
    pub const ASSIGNEE: usize = 8;
}

/// Immutable tracker configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Rows per chunk for batch appends.
    pub batch_size: usize,
    /// Pause between batch chunks, to respect host rate limits.
    pub batch_pause: Duration,
    /// Time-to-live for the cached task list.
    pub cache_ttl: Duration,
    /// Path of the file-backed grid used by the CLI.
    pub store_path: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            batch_pause: Duration::from_millis(500),
            cache_ttl: Duration::from_secs(300),
            store_path: default_store_path(),
        }
    }
}

impl TrackerConfig {
    /// Configuration suited to tests: no inter-chunk pause.
    pub fn for_tests() -> Self {
        Self {
            batch_pause: Duration::ZERO,
            ..Default::default()
        }
    }
}

/// Default store location: `~/.tasksheet/tasks.json`, falling back to the
/// working directory when no home is available.
fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".tasksheet").join("tasks.json"))
        .unwrap_or_else(|| PathBuf::from("tasks.json"))
}

/// On-disk configuration file. Every field is optional; absent fields keep
/// their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub batch_size: Option<usize>,
    pub batch_pause_ms: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
    pub store_path: Option<PathBuf>,
}

impl ConfigFile {
    /// Apply this file's overrides on top of `base`.
    pub fn apply(self, base: TrackerConfig) -> TrackerConfig {
        TrackerConfig {
            batch_size: self.batch_size.unwrap_or(base.batch_size).max(1),
            batch_pause: self
                .batch_pause_ms
                .map(Duration::from_millis)
                .unwrap_or(base.batch_pause),
            cache_ttl: self
                .cache_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(base.cache_ttl),
            store_path: self.store_path.unwrap_or(base.store_path),
        }
    }
}

/// Candidate config file locations, highest priority first.
fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(p) = explicit {
        paths.push(p.to_path_buf());
    }
    paths.push(PathBuf::from(".tasksheet.yaml"));
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".tasksheet").join("config.yaml"));
    }
    paths
}

/// Load the tracker configuration.
///
/// An explicitly given path must exist and parse; discovered paths are
/// skipped silently when absent. The first file found wins.
pub fn load_config(explicit: Option<&Path>) -> Result<TrackerConfig> {
    for path in candidate_paths(explicit) {
        let required = explicit.is_some_and(|p| p == path);
        if !path.exists() {
            if required {
                anyhow::bail!("config file not found: {}", path.display());
            }
            continue;
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        return Ok(file.apply(TrackerConfig::default()));
    }
    Ok(TrackerConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = TrackerConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn file_overrides_apply_over_defaults() {
        let file: ConfigFile =
            serde_yaml::from_str("batch_size: 25\ncache_ttl_secs: 10\n").unwrap();
        let config = file.apply(TrackerConfig::default());
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.cache_ttl, Duration::from_secs(10));
        // untouched fields keep defaults
        assert_eq!(config.batch_pause, Duration::from_millis(500));
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        let file: ConfigFile = serde_yaml::from_str("batch_size: 0\n").unwrap();
        let config = file.apply(TrackerConfig::default());
        assert_eq!(config.batch_size, 1);
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let parsed: std::result::Result<ConfigFile, _> =
            serde_yaml::from_str("batch_sized: 25\n");
        assert!(parsed.is_err());
    }
}
