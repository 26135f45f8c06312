//! Task store adapter: tasks to rows and back.
//!
//! Owns the column layout, ID assignment, and the single grid binding.
//! Lookups by id are linear scans; the store is bounded at roughly a
//! thousand rows by design assumption, so no secondary index is kept.

use super::grid::{Row, SheetGrid};
use crate::config::{COLUMNS, TrackerConfig, col};
use crate::error::{Result, TrackerError};
use crate::types::{Priority, Task, TaskStatus};
use chrono::DateTime;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Store handle wrapping a shared grid.
#[derive(Clone)]
pub struct TaskStore {
    grid: Arc<Mutex<Box<dyn SheetGrid>>>,
    batch_size: usize,
    batch_pause: Duration,
}

impl TaskStore {
    /// Bind the adapter to a grid.
    pub fn new<G: SheetGrid + 'static>(grid: G, config: &TrackerConfig) -> Self {
        Self {
            grid: Arc::new(Mutex::new(Box::new(grid))),
            batch_size: config.batch_size,
            batch_pause: config.batch_pause,
        }
    }

    /// Execute a function with exclusive access to the grid.
    fn with_grid<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Box<dyn SheetGrid>) -> Result<T>,
    {
        let mut grid = self.grid.lock().unwrap();
        f(&mut grid)
    }

    /// Provision the backing table with the fixed header layout.
    ///
    /// Destructive on re-invocation: an existing table is cleared and
    /// rebuilt, not migrated. Callers must treat this as a reset.
    pub fn ensure_store(&self) -> Result<()> {
        self.with_grid(|grid| {
            let created = grid.create()?;
            if !created {
                grid.clear()?;
            }
            let header: Row = COLUMNS.iter().map(|c| c.to_string()).collect();
            grid.append(&[header])?;
            debug!(created, "provisioned task store");
            Ok(())
        })
    }

    /// Whether the backing table has been provisioned.
    pub fn is_initialized(&self) -> bool {
        self.grid.lock().unwrap().exists()
    }

    /// Next task id: `max(live id) + 1`. Equals the row count while no task
    /// has ever been deleted, and never reuses the id of a deleted task
    /// that left a higher id behind.
    pub fn next_id(&self) -> Result<u64> {
        self.with_grid(|grid| {
            require_initialized(grid.as_ref())?;
            let max_id = grid
                .read_all()?
                .iter()
                .skip(1)
                .filter_map(|row| parse_id(row))
                .max()
                .unwrap_or(0);
            Ok(max_id + 1)
        })
    }

    /// Append one task at the end of the table.
    pub fn append_task(&self, task: &Task) -> Result<()> {
        self.with_grid(|grid| {
            require_initialized(grid.as_ref())?;
            grid.append(&[task_to_row(task)])?;
            Ok(())
        })
    }

    /// Append many tasks, chunked to respect host rate limits.
    ///
    /// A chunk that fails is logged and skipped; remaining chunks still
    /// run. Returns the count actually appended, which callers compare to
    /// the requested count to detect partial application.
    pub fn append_tasks(&self, tasks: &[Task]) -> Result<usize> {
        if !self.is_initialized() {
            return Err(TrackerError::StoreNotInitialized);
        }
        let rows: Vec<Row> = tasks.iter().map(task_to_row).collect();
        let mut appended = 0;
        let chunks: Vec<&[Row]> = rows.chunks(self.batch_size).collect();
        let total_chunks = chunks.len();
        for (i, chunk) in chunks.into_iter().enumerate() {
            let result = self.with_grid(|grid| {
                grid.append(chunk)?;
                Ok(())
            });
            match result {
                Ok(()) => appended += chunk.len(),
                Err(err) => {
                    warn!(chunk = i + 1, total_chunks, %err, "batch chunk failed; continuing");
                }
            }
            if i + 1 < total_chunks && !self.batch_pause.is_zero() {
                std::thread::sleep(self.batch_pause);
            }
        }
        Ok(appended)
    }

    /// Read every data row as a task, in store order. Malformed rows are
    /// skipped with a warning rather than failing the read.
    pub fn read_all(&self) -> Result<Vec<Task>> {
        self.with_grid(|grid| {
            require_initialized(grid.as_ref())?;
            let rows = grid.read_all()?;
            let mut tasks = Vec::with_capacity(rows.len().saturating_sub(1));
            for (i, row) in rows.iter().enumerate().skip(1) {
                match row_to_task(row) {
                    Some(task) => tasks.push(task),
                    None => warn!(row = i, "skipping malformed row"),
                }
            }
            Ok(tasks)
        })
    }

    /// Set the status of the first row matching `id`. Returns `false` when
    /// no row matches.
    pub fn update_status(&self, id: u64, status: TaskStatus) -> Result<bool> {
        self.with_grid(|grid| {
            require_initialized(grid.as_ref())?;
            match find_row(grid.as_ref(), id)? {
                Some(row) => {
                    grid.set_cell(row, col::STATUS, status.as_str())?;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    /// Remove the row matching `id`; later rows shift up. Returns `false`
    /// when no row matches.
    pub fn delete_by_id(&self, id: u64) -> Result<bool> {
        self.with_grid(|grid| {
            require_initialized(grid.as_ref())?;
            match find_row(grid.as_ref(), id)? {
                Some(row) => {
                    grid.delete_row(row)?;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    /// Total row count, header included.
    pub fn row_count(&self) -> Result<usize> {
        self.with_grid(|grid| Ok(grid.row_count()?))
    }
}

fn require_initialized(grid: &dyn SheetGrid) -> Result<()> {
    if grid.exists() {
        Ok(())
    } else {
        Err(TrackerError::StoreNotInitialized)
    }
}

/// Linear scan for the absolute row index of the task with `id`.
fn find_row(grid: &dyn SheetGrid, id: u64) -> Result<Option<usize>> {
    let rows = grid.read_all()?;
    for (i, row) in rows.iter().enumerate().skip(1) {
        if parse_id(row) == Some(id) {
            return Ok(Some(i));
        }
    }
    Ok(None)
}

fn parse_id(row: &Row) -> Option<u64> {
    row.first()?.trim().parse().ok()
}

fn task_to_row(task: &Task) -> Row {
    vec![
        task.id.to_string(),
        task.title.clone(),
        task.status.as_str().to_string(),
        task.priority.as_str().to_string(),
        task.created_at.to_rfc3339(),
        task.due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        task.notes.clone().unwrap_or_default(),
        task.tags.clone().unwrap_or_default(),
        task.assignee.clone().unwrap_or_default(),
    ]
}

/// Decode a data row. Returns `None` for rows that cannot be a task: bad
/// id, empty title, unknown status, or an unparseable creation timestamp.
/// Priority stays lenient, unknown values read as Medium.
fn row_to_task(row: &Row) -> Option<Task> {
    let id = parse_id(row)?;
    let title = row.get(col::TITLE)?.trim();
    if title.is_empty() {
        return None;
    }
    let status = TaskStatus::from_str(row.get(col::STATUS)?)?;
    let priority = Priority::parse_or_default(row.get(col::PRIORITY).map(String::as_str).unwrap_or(""));
    let created_at = DateTime::parse_from_rfc3339(row.get(col::CREATED)?.trim())
        .ok()?
        .to_utc();
    let due_date = row
        .get(col::DUE)
        .and_then(|s| crate::types::parse_due_date(s));
    Some(Task {
        id,
        title: title.to_string(),
        status,
        priority,
        created_at,
        due_date,
        notes: cell_opt(row, col::NOTES),
        tags: cell_opt(row, col::TAGS),
        assignee: cell_opt(row, col::ASSIGNEE),
    })
}

fn cell_opt(row: &Row, col: usize) -> Option<String> {
    row.get(col)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
