//! tasksheet library
//!
//! This module exports the core components for testing and integration.

pub mod analytics;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod ops;
pub mod store;
pub mod types;
