//! Task operations: the layer the CLI calls into.
//!
//! Composes the store adapter and the list cache. Validation happens
//! before any store mutation; unknown ids on complete/delete are reported
//! as `Ok(false)`, not errors.

use crate::cache::TaskCache;
use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::store::TaskStore;
use crate::types::{Priority, Task, TaskDraft, TaskStatus, parse_due_date};
use chrono::Utc;
use tracing::{info, warn};

/// Operations facade over one task store.
#[derive(Clone)]
pub struct TaskOps {
    store: TaskStore,
    cache: TaskCache,
}

impl TaskOps {
    pub fn new(store: TaskStore, config: &TrackerConfig) -> Self {
        Self {
            store,
            cache: TaskCache::new(config.cache_ttl),
        }
    }

    /// Provision (or destructively reset) the backing store.
    pub fn init_store(&self) -> Result<()> {
        self.store.ensure_store()?;
        self.cache.invalidate();
        Ok(())
    }

    /// Whether the backing store has been provisioned.
    pub fn is_initialized(&self) -> bool {
        self.store.is_initialized()
    }

    /// Validate and normalize a draft, append it, and return the new id.
    pub fn add_task(&self, draft: TaskDraft) -> Result<u64> {
        let task = self.build_task(self.store.next_id()?, draft)?;
        let id = task.id;
        self.store.append_task(&task)?;
        self.cache.invalidate();
        info!(id, "added task");
        Ok(id)
    }

    /// Add many tasks in one chunked append.
    ///
    /// Every draft is validated before any row is written. Returns the
    /// count actually added; a result short of `drafts.len()` means one or
    /// more chunks failed (already logged by the store).
    pub fn add_tasks_batch(&self, drafts: Vec<TaskDraft>) -> Result<usize> {
        if drafts.is_empty() {
            return Err(TrackerError::validation("batch input is empty"));
        }
        let requested = drafts.len();
        let first_id = self.store.next_id()?;
        let mut tasks = Vec::with_capacity(requested);
        for (i, draft) in drafts.into_iter().enumerate() {
            let task = self.build_task(first_id + i as u64, draft).map_err(|err| {
                TrackerError::validation(format!("batch entry {}: {err}", i + 1))
            })?;
            tasks.push(task);
        }
        let added = self.store.append_tasks(&tasks)?;
        self.cache.invalidate();
        if added < requested {
            warn!(added, requested, "batch append partially applied");
        } else {
            info!(added, "added batch of tasks");
        }
        Ok(added)
    }

    /// Mark the task as completed. Returns `false` when the id is unknown
    /// (found-or-ignore semantics, not an error).
    pub fn complete_task(&self, id: u64) -> Result<bool> {
        let found = self.store.update_status(id, TaskStatus::Completed)?;
        if found {
            self.cache.invalidate();
            info!(id, "completed task");
        }
        Ok(found)
    }

    /// Delete the task's row. Returns `false` when the id is unknown.
    pub fn delete_task(&self, id: u64) -> Result<bool> {
        let found = self.store.delete_by_id(id)?;
        if found {
            self.cache.invalidate();
            info!(id, "deleted task");
        }
        Ok(found)
    }

    /// List tasks in store order, optionally filtered to one status.
    ///
    /// With `use_cache` a non-expired cached list is returned without
    /// touching the store; otherwise the list is read through and the
    /// cache repopulated.
    pub fn list_tasks(&self, status: Option<TaskStatus>, use_cache: bool) -> Result<Vec<Task>> {
        let cached = if use_cache { self.cache.get() } else { None };
        let tasks = match cached {
            Some(cached) => cached,
            None => {
                let fresh = self.store.read_all()?;
                self.cache.put(fresh.clone());
                fresh
            }
        };
        Ok(match status {
            Some(wanted) => tasks.into_iter().filter(|t| t.status == wanted).collect(),
            None => tasks,
        })
    }

    fn build_task(&self, id: u64, draft: TaskDraft) -> Result<Task> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(TrackerError::validation("task title must not be empty"));
        }
        Ok(Task {
            id,
            title,
            status: TaskStatus::Pending,
            priority: draft
                .priority
                .as_deref()
                .map(Priority::parse_or_default)
                .unwrap_or_default(),
            created_at: Utc::now(),
            due_date: draft.due_date.as_deref().and_then(parse_due_date),
            notes: normalize(draft.notes),
            tags: normalize(draft.tags),
            assignee: normalize(draft.assignee),
        })
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
