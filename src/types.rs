//! Core types for the tasksheet tracker.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Task status as stored in the sheet's `Status` column.
///
/// Only the `Completed` transition is exposed by the operations layer;
/// `InProgress` and `Blocked` appear when the sheet is edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    /// All statuses, in sheet option order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    /// The display string written to the sheet.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Blocked => "Blocked",
        }
    }

    /// Parse a status from sheet or CLI input. Case-insensitive, accepts
    /// both `in progress` and `in_progress`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(TaskStatus::Pending),
            "in progress" | "in_progress" | "in-progress" => Some(TaskStatus::InProgress),
            "completed" | "done" => Some(TaskStatus::Completed),
            "blocked" => Some(TaskStatus::Blocked),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// All priorities, in sheet option order.
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    /// Parse a priority string. Returns `Medium` for unrecognized values.
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            "critical" => Priority::Critical,
            _ => Priority::Medium,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as persisted in the sheet, one per data row.
///
/// Row position is not identity: deletes shift rows up while `id` stays
/// with the task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Comma-separated labels, split only at analytics time.
    pub tags: Option<String>,
    pub assignee: Option<String>,
}

impl Task {
    /// Split the `tags` field into trimmed, non-empty labels.
    pub fn tag_labels(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Input for creating a task, before validation and normalization.
///
/// `priority` and `due_date` are raw strings: unrecognized priorities fall
/// back to `Medium`, unparseable dates coerce to absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Best-effort due-date parse. Accepts `YYYY-MM-DD` or RFC 3339; anything
/// else (including empty input) coerces to `None` rather than failing.
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn status_accepts_snake_case_in_progress() {
        assert_eq!(
            TaskStatus::from_str("in_progress"),
            Some(TaskStatus::InProgress)
        );
    }

    #[test]
    fn unrecognized_priority_falls_back_to_medium() {
        assert_eq!(Priority::parse_or_default("Bogus"), Priority::Medium);
        assert_eq!(Priority::parse_or_default(""), Priority::Medium);
        assert_eq!(Priority::parse_or_default("CRITICAL"), Priority::Critical);
    }

    #[test]
    fn due_date_parse_is_best_effort() {
        assert_eq!(
            parse_due_date("2026-03-01"),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(
            parse_due_date("2026-03-01T10:30:00Z"),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(parse_due_date("next tuesday"), None);
        assert_eq!(parse_due_date("  "), None);
    }

    #[test]
    fn tag_labels_trim_and_drop_empties() {
        let task = Task {
            id: 1,
            title: "t".into(),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            created_at: Utc::now(),
            due_date: None,
            notes: None,
            tags: Some(" a, b ,, c".into()),
            assignee: None,
        };
        assert_eq!(task.tag_labels(), vec!["a", "b", "c"]);
    }
}
