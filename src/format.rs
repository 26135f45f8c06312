//! Text rendering for task lists and analytics reports.

use crate::analytics::TaskReport;
use crate::types::{Priority, Task, TaskStatus};

/// Output format for list and stats commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Format a task list grouped by status, active statuses first.
pub fn format_task_list(tasks: &[Task]) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Tasks ({})\n\n", tasks.len()));

    // In Progress and Blocked first, then Pending, then Completed
    let order = [
        TaskStatus::InProgress,
        TaskStatus::Blocked,
        TaskStatus::Pending,
        TaskStatus::Completed,
    ];
    for status in order {
        let group: Vec<&Task> = tasks.iter().filter(|t| t.status == status).collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("## {}\n\n", status));
        for task in group {
            out.push_str(&format_task_short(task));
        }
        out.push('\n');
    }

    out
}

/// Format a task in short form for lists.
fn format_task_short(task: &Task) -> String {
    let priority_marker = match task.priority {
        Priority::Critical => "!!! ",
        Priority::High => "! ",
        Priority::Medium | Priority::Low => "",
    };

    let due = task
        .due_date
        .map(|d| format!(" due {}", d.format("%Y-%m-%d")))
        .unwrap_or_default();

    let assignee = task
        .assignee
        .as_ref()
        .map(|a| format!(" @{}", a))
        .unwrap_or_default();

    let tags = if task.tag_labels().is_empty() {
        String::new()
    } else {
        format!(" [{}]", task.tag_labels().join(", "))
    };

    format!(
        "- #{} {}{}{}{}{}\n",
        task.id, priority_marker, task.title, assignee, due, tags,
    )
}

/// Format an analytics report as a text block.
pub fn format_report(report: &TaskReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Task Report ({} tasks)\n\n", report.total));

    out.push_str("## Status\n");
    for status in TaskStatus::ALL {
        let count = report.by_status.get(status.as_str()).copied().unwrap_or(0);
        out.push_str(&format!("- {}: {}\n", status, count));
    }

    out.push_str("\n## Priority\n");
    for priority in Priority::ALL {
        let count = report
            .by_priority
            .get(priority.as_str())
            .copied()
            .unwrap_or(0);
        out.push_str(&format!("- {}: {}\n", priority, count));
    }

    out.push_str(&format!(
        "\n- **overdue**: {}\n- **completion rate**: {:.2}%\n- **average age**: {:.2} days\n",
        report.overdue_count, report.completion_rate, report.average_age_days,
    ));

    if !report.top_assignees.is_empty() {
        out.push_str("\n## Assignees\n");
        for (assignee, count) in &report.top_assignees {
            out.push_str(&format!("- {}: {}\n", assignee, count));
        }
    }

    if !report.tag_distribution.is_empty() {
        out.push_str("\n## Tags\n");
        for (tag, count) in &report.tag_distribution {
            out.push_str(&format!("- {}: {}\n", tag, count));
        }
    }

    out
}
