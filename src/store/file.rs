//! JSON-file-backed grid.
//!
//! Persists the whole grid as a JSON array of rows. Every mutation rewrites
//! the file; the grid is small by design assumption, so whole-file rewrites
//! stay cheap. A missing file means the store has not been provisioned.

use super::grid::{Row, SheetGrid};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File-backed grid used by the CLI for durable state.
#[derive(Debug)]
pub struct FileGrid {
    path: PathBuf,
    rows: Option<Vec<Row>>,
}

impl FileGrid {
    /// Open the grid at `path`, loading existing rows when the file is
    /// present. The file itself is only created by [`SheetGrid::create`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let rows = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading store file {}", path.display()))?;
            Some(
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing store file {}", path.display()))?,
            )
        } else {
            None
        };
        Ok(Self { path, rows })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let rows = self.rows.as_deref().unwrap_or(&[]);
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating store directory {}", parent.display()))?;
            }
        }
        let text = serde_json::to_string_pretty(rows)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("writing store file {}", self.path.display()))?;
        Ok(())
    }
}

impl SheetGrid for FileGrid {
    fn exists(&self) -> bool {
        self.rows.is_some()
    }

    fn create(&mut self) -> Result<bool> {
        if self.rows.is_some() {
            return Ok(false);
        }
        self.rows = Some(Vec::new());
        self.persist()?;
        Ok(true)
    }

    fn clear(&mut self) -> Result<()> {
        if let Some(rows) = self.rows.as_mut() {
            rows.clear();
            self.persist()?;
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
            .ok_or_else(|| anyhow::anyhow!("store file {} does not exist", self.path.display()))?;
        table.extend_from_slice(rows);
        self.persist()
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
        self.persist()
    }

    fn delete_row(&mut self, row: usize) -> Result<()> {
        let rows = self
            .rows
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("store file {} does not exist", self.path.display()))?;
        if row >= rows.len() {
            anyhow::bail!("row {row} out of range");
        }
        rows.remove(row);
        self.persist()
    }
}
