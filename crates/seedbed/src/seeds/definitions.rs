//! Core types for seed files and migrator results

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A discovered seed script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedFile {
    /// Identifier derived from the file stem; the ordering and log key
    pub name: String,
    /// Where the file was found
    pub path: PathBuf,
    /// Statements applied when the seed runs
    pub up_sql: String,
    /// Statements applied on rollback; empty means rollback is a no-op
    pub down_sql: String,
}

impl SeedFile {
    /// Whether the seed defines a teardown script.
    pub fn has_down(&self) -> bool {
        !self.down_sql.trim().is_empty()
    }
}

/// Options recognized by [`crate::SeedMigrator::run`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Report the statements that would run without applying them or
    /// writing log rows
    pub pretend: bool,
}

/// Result of a run invocation
#[derive(Debug, Default)]
pub struct SeedRunResult {
    /// Number of seeds applied in this batch
    pub applied_count: usize,
    /// Identifiers applied, in execution order
    pub applied_seeds: Vec<String>,
    /// Number of discovered seeds skipped because they already ran
    pub skipped_count: usize,
    /// Statements reported instead of executed when pretending
    pub pretended_statements: Vec<String>,
    /// Total execution time in milliseconds
    pub execution_time_ms: u128,
}

/// Result of a rollback or reset invocation
#[derive(Debug, Default)]
pub struct RollbackResult {
    /// Number of seeds removed from the log
    pub rolled_back_count: usize,
    /// Identifiers rolled back, in teardown order
    pub rolled_back_seeds: Vec<String>,
    /// Number of batches processed
    pub batches: usize,
    /// Total execution time in milliseconds
    pub execution_time_ms: u128,
}

/// Ran/pending state of one discovered seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedStatus {
    /// Whether the seed is logged for the active environment (or `all`)
    pub ran: bool,
    /// Seed identifier
    pub seed: String,
}
