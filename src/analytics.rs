//! Aggregate analytics over a task-list snapshot.
//!
//! A stateless reduction: one pass over the list, no store access. The
//! caller supplies `now` so reports are reproducible in tests.

use crate::types::{Priority, Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate report over one task-list snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub total: usize,
    /// Count per status; every status present, zero-filled.
    pub by_status: BTreeMap<String, usize>,
    /// Count per priority; every priority present, zero-filled.
    pub by_priority: BTreeMap<String, usize>,
    /// Tasks past their due date and not completed.
    pub overdue_count: usize,
    /// Percent of tasks completed, two decimals. Zero for an empty list.
    pub completion_rate: f64,
    /// Mean task age in days, two decimals. Zero for an empty list.
    pub average_age_days: f64,
    /// Task count per assignee; unassigned tasks excluded.
    pub top_assignees: BTreeMap<String, usize>,
    /// Occurrence count per tag label.
    pub tag_distribution: BTreeMap<String, usize>,
}

/// Reduce a task list into a [`TaskReport`].
pub fn analyze(tasks: &[Task], now: DateTime<Utc>) -> TaskReport {
    let mut by_status: BTreeMap<String, usize> = TaskStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    let mut by_priority: BTreeMap<String, usize> = Priority::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), 0))
        .collect();
    let mut top_assignees: BTreeMap<String, usize> = BTreeMap::new();
    let mut tag_distribution: BTreeMap<String, usize> = BTreeMap::new();

    let today = now.date_naive();
    let mut completed = 0usize;
    let mut overdue_count = 0usize;
    let mut total_age_days = 0.0f64;

    for task in tasks {
        *by_status.entry(task.status.as_str().to_string()).or_insert(0) += 1;
        *by_priority
            .entry(task.priority.as_str().to_string())
            .or_insert(0) += 1;

        if task.status == TaskStatus::Completed {
            completed += 1;
        }
        if task.status != TaskStatus::Completed
            && task.due_date.is_some_and(|due| due < today)
        {
            overdue_count += 1;
        }
        total_age_days +=
            (now - task.created_at).num_seconds().max(0) as f64 / 86_400.0;

        if let Some(assignee) = task.assignee.as_deref() {
            *top_assignees.entry(assignee.to_string()).or_insert(0) += 1;
        }
        for tag in task.tag_labels() {
            *tag_distribution.entry(tag.to_string()).or_insert(0) += 1;
        }
    }

    let total = tasks.len();
    let (completion_rate, average_age_days) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            round2(completed as f64 * 100.0 / total as f64),
            round2(total_age_days / total as f64),
        )
    };

    TaskReport {
        total,
        by_status,
        by_priority,
        overdue_count,
        completion_rate,
        average_age_days,
        top_assignees,
        tag_distribution,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
