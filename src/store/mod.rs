//! Storage layer: the sheet grid abstraction and the task store adapter.

pub mod adapter;
pub mod file;
pub mod grid;

pub use adapter::TaskStore;
pub use file::FileGrid;
pub use grid::{MemoryGrid, Row, SheetGrid};
