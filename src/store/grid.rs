//! The sheet grid abstraction.
//!
//! [`SheetGrid`] is the seam between the tracker and whatever tabular host
//! actually holds the rows. It exposes only what the tracker consumes:
//! create-if-absent, clear, append, full-range read, single-cell write, and
//! row deletion. Row 0 is the header; the grid never reorders rows, so
//! top-to-bottom remains insertion order across deletes.

use anyhow::Result;

/// One grid row: an ordered tuple of cell values.
pub type Row = Vec<String>;

/// Minimal surface of the external tabular store.
pub trait SheetGrid: Send {
    /// Whether the backing table has been provisioned.
    fn exists(&self) -> bool;

    /// Provision an empty table. Idempotent; returns `true` when the table
    /// was newly created.
    fn create(&mut self) -> Result<bool>;

    /// Remove every row, header included.
    fn clear(&mut self) -> Result<()>;

    /// Total row count, header included.
    fn row_count(&self) -> Result<usize>;

    /// Append rows at the end.
    fn append(&mut self, rows: &[Row]) -> Result<()>;

    /// Read the full range, header included, in store order.
    fn read_all(&self) -> Result<Vec<Row>>;

    /// Overwrite a single cell. `row` and `col` are zero-based over the
    /// whole grid.
    fn set_cell(&mut self, row: usize, col: usize, value: &str) -> Result<()>;

    /// Remove one row; later rows shift up.
    fn delete_row(&mut self, row: usize) -> Result<()>;
}

/// In-memory grid, used by tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryGrid {
    rows: Option<Vec<Row>>,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// A grid that is already provisioned (empty, no header yet).
    pub fn provisioned() -> Self {
        Self {
            rows: Some(Vec::new()),
        }
    }
}

impl SheetGrid for MemoryGrid {
    fn exists(&self) -> bool {
        self.rows.is_some()
    }

    fn create(&mut self) -> Result<bool> {
        if self.rows.is_some() {
            return Ok(false);
        }
        self.rows = Some(Vec::new());
        Ok(true)
    }

    fn clear(&mut self) -> Result<()> {
        if let Some(rows) = self.rows.as_mut() {
            rows.clear();
        }
        Ok(())
    }

    fn row_count(&self) -> Result<usize> {
        Ok(self.rows.as_ref().map_or(0, Vec::len))
    }

    fn append(&mut self, rows: &[Row]) -> Result<()> {
        let table = self
            .rows
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("grid does not exist"))?;
        table.extend_from_slice(rows);
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Row>> {
        Ok(self.rows.clone().unwrap_or_default())
    }

    fn set_cell(&mut self, row: usize, col: usize, value: &str) -> Result<()> {
        let cell = self
            .rows
            .as_mut()
            .and_then(|rows| rows.get_mut(row))
            .and_then(|r| r.get_mut(col))
            .ok_or_else(|| anyhow::anyhow!("cell ({row}, {col}) out of range"))?;
        *cell = value.to_string();
        Ok(())
    }

    fn delete_row(&mut self, row: usize) -> Result<()> {
        let rows = self
            .rows
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("grid does not exist"))?;
        if row >= rows.len() {
            anyhow::bail!("row {row} out of range");
        }
        rows.remove(row);
        Ok(())
    }
}
