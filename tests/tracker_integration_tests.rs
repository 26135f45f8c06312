//! Integration tests for the tracker operations layer.
//!
//! These tests exercise the store adapter, cache, and operations against an
//! in-memory grid. Tests are organized by module and functionality.

use std::time::Duration;
use tasksheet::config::TrackerConfig;
use tasksheet::error::TrackerError;
use tasksheet::ops::TaskOps;
use tasksheet::store::{MemoryGrid, Row, SheetGrid, TaskStore};
use tasksheet::types::{Priority, TaskDraft, TaskStatus};

/// Helper to create an initialized ops facade over a fresh in-memory grid.
fn setup_ops() -> TaskOps {
    setup_ops_with(TrackerConfig::for_tests())
}

fn setup_ops_with(config: TrackerConfig) -> TaskOps {
    let store = TaskStore::new(MemoryGrid::new(), &config);
    let ops = TaskOps::new(store, &config);
    ops.init_store().expect("failed to provision store");
    ops
}

/// Same as [`setup_ops`] but keeps a second handle on the store so tests
/// can mutate the grid out of band.
fn setup_ops_and_store(config: &TrackerConfig) -> (TaskOps, TaskStore) {
    let store = TaskStore::new(MemoryGrid::new(), config);
    let ops = TaskOps::new(store.clone(), config);
    ops.init_store().expect("failed to provision store");
    (ops, store)
}

fn draft(title: &str) -> TaskDraft {
    TaskDraft::new(title)
}

mod add_tests {
    use super::*;

    #[test]
    fn add_task_assigns_increasing_ids_and_stores_normalized_fields() {
        let ops = setup_ops();

        let first = ops.add_task(draft("  write the report  ")).unwrap();
        let second = ops.add_task(draft("review it")).unwrap();
        assert!(second > first);

        let tasks = ops.list_tasks(None, false).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, first);
        assert_eq!(tasks[0].title, "write the report");
        assert_eq!(tasks[0].status, TaskStatus::Pending);
        assert_eq!(tasks[0].priority, Priority::Medium);
    }

    #[test]
    fn empty_and_whitespace_titles_are_rejected_without_append() {
        let ops = setup_ops();

        for bad in ["", "   "] {
            let err = ops.add_task(draft(bad)).unwrap_err();
            assert!(matches!(err, TrackerError::Validation(_)));
        }
        assert!(ops.list_tasks(None, false).unwrap().is_empty());
    }

    #[test]
    fn bogus_priority_stores_medium() {
        let ops = setup_ops();
        let mut d = draft("prioritized");
        d.priority = Some("Bogus".into());
        let id = ops.add_task(d).unwrap();

        let tasks = ops.list_tasks(None, false).unwrap();
        assert_eq!(tasks[0].id, id);
        assert_eq!(tasks[0].priority, Priority::Medium);
    }

    #[test]
    fn unparseable_due_date_coerces_to_absent() {
        let ops = setup_ops();
        let mut d = draft("dated");
        d.due_date = Some("whenever".into());
        ops.add_task(d).unwrap();

        let tasks = ops.list_tasks(None, false).unwrap();
        assert!(tasks[0].due_date.is_none());
    }

    #[test]
    fn add_before_init_reports_store_not_initialized() {
        let config = TrackerConfig::for_tests();
        let store = TaskStore::new(MemoryGrid::new(), &config);
        let ops = TaskOps::new(store, &config);

        let err = ops.add_task(draft("too early")).unwrap_err();
        assert!(matches!(err, TrackerError::StoreNotInitialized));
    }
}

mod mutation_tests {
    use super::*;

    #[test]
    fn complete_marks_only_the_matching_task() {
        let ops = setup_ops();
        let id = ops.add_task(draft("a")).unwrap();
        ops.add_task(draft("b")).unwrap();

        assert!(ops.complete_task(id).unwrap());

        let tasks = ops.list_tasks(None, false).unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert_eq!(tasks[1].status, TaskStatus::Pending);
    }

    #[test]
    fn delete_then_complete_on_same_id_is_a_noop() {
        let ops = setup_ops();
        let id = ops.add_task(draft("short lived")).unwrap();
        ops.add_task(draft("survivor")).unwrap();

        assert!(ops.delete_task(id).unwrap());
        assert!(ops.list_tasks(None, false).unwrap().iter().all(|t| t.id != id));

        // found-or-ignore: no error, no row created
        assert!(!ops.complete_task(id).unwrap());
        assert_eq!(ops.list_tasks(None, false).unwrap().len(), 1);
    }

    #[test]
    fn unknown_ids_are_reported_as_not_found_not_errors() {
        let ops = setup_ops();
        assert!(!ops.complete_task(999).unwrap());
        assert!(!ops.delete_task(999).unwrap());
    }

    #[test]
    fn deletes_do_not_renumber_surviving_tasks() {
        let ops = setup_ops();
        let a = ops.add_task(draft("a")).unwrap();
        let b = ops.add_task(draft("b")).unwrap();
        let c = ops.add_task(draft("c")).unwrap();

        ops.delete_task(b).unwrap();

        let ids: Vec<u64> = ops
            .list_tasks(None, false)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![a, c]);

        // the freed id is never handed out again
        let d = ops.add_task(draft("d")).unwrap();
        assert!(d > c);
    }
}

mod list_tests {
    use super::*;

    #[test]
    fn status_filter_matches_exactly() {
        let ops = setup_ops();
        let done = ops.add_task(draft("done")).unwrap();
        ops.add_task(draft("open")).unwrap();
        ops.complete_task(done).unwrap();

        let completed = ops
            .list_tasks(Some(TaskStatus::Completed), false)
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, done);

        let pending = ops.list_tasks(Some(TaskStatus::Pending), false).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "open");
    }

    #[test]
    fn no_filter_returns_everything_in_store_order() {
        let ops = setup_ops();
        for title in ["one", "two", "three"] {
            ops.add_task(draft(title)).unwrap();
        }
        let titles: Vec<String> = ops
            .list_tasks(None, false)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
    }
}

mod batch_tests {
    use super::*;

    #[test]
    fn empty_batch_is_a_validation_error() {
        let ops = setup_ops();
        let err = ops.add_tasks_batch(Vec::new()).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[test]
    fn batch_with_a_blank_title_aborts_before_any_append() {
        let ops = setup_ops();
        let drafts = vec![draft("ok"), draft("   "), draft("also ok")];
        let err = ops.add_tasks_batch(drafts).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
        assert!(ops.list_tasks(None, false).unwrap().is_empty());
    }

    #[test]
    fn batch_of_250_is_fully_applied() {
        let ops = setup_ops();
        let drafts: Vec<TaskDraft> = (0..250).map(|i| draft(&format!("task {i}"))).collect();
        let added = ops.add_tasks_batch(drafts).unwrap();
        assert_eq!(added, 250);
        assert_eq!(ops.list_tasks(None, false).unwrap().len(), 250);
    }

    #[test]
    fn batch_of_250_splits_into_three_chunks() {
        let config = TrackerConfig::for_tests();
        let grid = ChunkRecordingGrid::default();
        let appends = grid.appends.clone();
        let store = TaskStore::new(grid, &config);
        let ops = TaskOps::new(store, &config);
        ops.init_store().unwrap();

        let drafts: Vec<TaskDraft> = (0..250).map(|i| draft(&format!("task {i}"))).collect();
        let added = ops.add_tasks_batch(drafts).unwrap();
        assert_eq!(added, 250);

        let sizes = appends.lock().unwrap().clone();
        // first append is the header row from init
        assert_eq!(sizes, vec![1, 100, 100, 50]);
    }

    #[test]
    fn failed_chunk_is_skipped_and_count_reflects_it() {
        let config = TrackerConfig::for_tests();
        let grid = FlakyGrid::failing_on_append(2);
        let store = TaskStore::new(grid, &config);
        let ops = TaskOps::new(store.clone(), &config);
        ops.init_store().unwrap();

        let drafts: Vec<TaskDraft> = (0..250).map(|i| draft(&format!("task {i}"))).collect();
        let added = ops.add_tasks_batch(drafts).unwrap();

        // header append is call 1; the second batch chunk (call 3) fails
        assert_eq!(added, 150);
        assert_eq!(store.read_all().unwrap().len(), 150);
    }

    /// Grid that records the row count of every append call.
    #[derive(Default)]
    struct ChunkRecordingGrid {
        inner: MemoryGrid,
        appends: std::sync::Arc<std::sync::Mutex<Vec<usize>>>,
    }

    impl SheetGrid for ChunkRecordingGrid {
        fn exists(&self) -> bool {
            self.inner.exists()
        }
        fn create(&mut self) -> anyhow::Result<bool> {
            self.inner.create()
        }
        fn clear(&mut self) -> anyhow::Result<()> {
            self.inner.clear()
        }
        fn row_count(&self) -> anyhow::Result<usize> {
            self.inner.row_count()
        }
        fn append(&mut self, rows: &[Row]) -> anyhow::Result<()> {
            self.appends.lock().unwrap().push(rows.len());
            self.inner.append(rows)
        }
        fn read_all(&self) -> anyhow::Result<Vec<Row>> {
            self.inner.read_all()
        }
        fn set_cell(&mut self, row: usize, c: usize, value: &str) -> anyhow::Result<()> {
            self.inner.set_cell(row, c, value)
        }
        fn delete_row(&mut self, row: usize) -> anyhow::Result<()> {
            self.inner.delete_row(row)
        }
    }

    /// Grid whose nth append call (after init) fails once.
    struct FlakyGrid {
        inner: MemoryGrid,
        calls: usize,
        fail_on_data_append: usize,
    }

    impl FlakyGrid {
        fn failing_on_append(nth_data_append: usize) -> Self {
            Self {
                inner: MemoryGrid::new(),
                calls: 0,
                fail_on_data_append: nth_data_append,
            }
        }
    }

    impl SheetGrid for FlakyGrid {
        fn exists(&self) -> bool {
            self.inner.exists()
        }
        fn create(&mut self) -> anyhow::Result<bool> {
            self.inner.create()
        }
        fn clear(&mut self) -> anyhow::Result<()> {
            self.inner.clear()
        }
        fn row_count(&self) -> anyhow::Result<usize> {
            self.inner.row_count()
        }
        fn append(&mut self, rows: &[Row]) -> anyhow::Result<()> {
            self.calls += 1;
            // call 1 writes the header during init
            if self.calls == self.fail_on_data_append + 1 {
                anyhow::bail!("host quota exceeded");
            }
            self.inner.append(rows)
        }
        fn read_all(&self) -> anyhow::Result<Vec<Row>> {
            self.inner.read_all()
        }
        fn set_cell(&mut self, row: usize, c: usize, value: &str) -> anyhow::Result<()> {
            self.inner.set_cell(row, c, value)
        }
        fn delete_row(&mut self, row: usize) -> anyhow::Result<()> {
            self.inner.delete_row(row)
        }
    }
}

mod cache_tests {
    use super::*;

    #[test]
    fn cached_list_stays_stale_against_out_of_band_edits() {
        let config = TrackerConfig::for_tests();
        let (ops, store) = setup_ops_and_store(&config);
        let id = ops.add_task(draft("watched")).unwrap();

        // populate the cache
        let before = ops.list_tasks(None, true).unwrap();
        assert_eq!(before[0].status, TaskStatus::Pending);

        // out-of-band edit through the adapter, bypassing the ops layer
        store.update_status(id, TaskStatus::Blocked).unwrap();

        // still within TTL: identical stale result
        let stale = ops.list_tasks(None, true).unwrap();
        assert_eq!(stale, before);

        // bypassing the cache reflects the edit
        let fresh = ops.list_tasks(None, false).unwrap();
        assert_eq!(fresh[0].status, TaskStatus::Blocked);
    }

    #[test]
    fn expired_ttl_reflects_out_of_band_edits() {
        let config = TrackerConfig {
            cache_ttl: Duration::ZERO,
            ..TrackerConfig::for_tests()
        };
        let (ops, store) = setup_ops_and_store(&config);
        let id = ops.add_task(draft("watched")).unwrap();

        ops.list_tasks(None, true).unwrap();
        store.update_status(id, TaskStatus::Blocked).unwrap();

        let refreshed = ops.list_tasks(None, true).unwrap();
        assert_eq!(refreshed[0].status, TaskStatus::Blocked);
    }

    #[test]
    fn mutations_through_ops_invalidate_the_cache() {
        let config = TrackerConfig::for_tests();
        let (ops, _store) = setup_ops_and_store(&config);
        let id = ops.add_task(draft("first")).unwrap();

        ops.list_tasks(None, true).unwrap();
        ops.complete_task(id).unwrap();

        let after = ops.list_tasks(None, true).unwrap();
        assert_eq!(after[0].status, TaskStatus::Completed);
    }
}

mod init_tests {
    use super::*;

    #[test]
    fn reinit_resets_an_existing_store() {
        let ops = setup_ops();
        ops.add_task(draft("doomed")).unwrap();

        ops.init_store().unwrap();
        assert!(ops.list_tasks(None, true).unwrap().is_empty());
    }

    #[test]
    fn header_row_matches_the_fixed_layout() {
        let config = TrackerConfig::for_tests();
        let (_ops, store) = setup_ops_and_store(&config);
        assert_eq!(store.row_count().unwrap(), 1);
        // the adapter never surfaces the header as a task
        assert!(store.read_all().unwrap().is_empty());
    }
}

mod file_store_tests {
    use super::*;
    use tasksheet::store::FileGrid;

    #[test]
    fn tasks_survive_reopening_the_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let config = TrackerConfig::for_tests();

        {
            let store = TaskStore::new(FileGrid::open(&path).unwrap(), &config);
            let ops = TaskOps::new(store, &config);
            ops.init_store().unwrap();
            let mut d = draft("persisted");
            d.tags = Some("a, b".into());
            ops.add_task(d).unwrap();
        }

        let store = TaskStore::new(FileGrid::open(&path).unwrap(), &config);
        let ops = TaskOps::new(store, &config);
        let tasks = ops.list_tasks(None, false).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "persisted");
        assert_eq!(tasks[0].tag_labels(), vec!["a", "b"]);
    }

    #[test]
    fn uninitialized_file_store_reports_store_not_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrackerConfig::for_tests();
        let store = TaskStore::new(
            FileGrid::open(dir.path().join("missing.json")).unwrap(),
            &config,
        );
        let ops = TaskOps::new(store, &config);

        let err = ops.list_tasks(None, false).unwrap_err();
        assert!(matches!(err, TrackerError::StoreNotInitialized));
    }
}

mod resilience_tests {
    use super::*;

    fn cells(values: &[&str]) -> Row {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn malformed_out_of_band_rows_are_skipped_on_read() {
        // prefill a grid the way a careless manual edit would leave it
        let mut grid = MemoryGrid::new();
        grid.create().unwrap();
        let created = "2026-08-01T09:00:00+00:00";
        grid.append(&[
            cells(&[
                "ID", "Task", "Status", "Priority", "Created Date", "Due Date", "Notes", "Tags",
                "Assignee",
            ]),
            cells(&["1", "good", "Pending", "Medium", created, "", "", "", ""]),
            cells(&["oops", "bad id", "Pending", "Medium", created, "", "", "", ""]),
            cells(&["3", "bad status", "Maybe", "Medium", created, "", "", "", ""]),
            cells(&["4", "also good", "Blocked", "Nonsense", created, "", "", "", ""]),
        ])
        .unwrap();

        let config = TrackerConfig::for_tests();
        let store = TaskStore::new(grid, &config);
        let tasks = store.read_all().unwrap();

        let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 4]);
        // lenient priority: unknown value reads back as Medium
        assert_eq!(tasks[1].priority, Priority::Medium);
        assert_eq!(tasks[1].status, TaskStatus::Blocked);
    }
}
