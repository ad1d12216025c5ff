//! Seed repository - the persistent record of applied seeds
//!
//! One row per applied seed: identifier, environment, batch number. A seed
//! logged under the `all` environment counts as ran under every environment,
//! which is why every read goes through [`scoped_environments`].

pub mod database;
pub mod fk_guard;

pub use database::*;
pub use fk_guard::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SeederResult;

/// Sentinel environment applying regardless of the active one
pub const ALL_ENVIRONMENTS: &str = "all";

/// The environments a query for `environment` must match. Seeds logged under
/// [`ALL_ENVIRONMENTS`] always count as ran; this is the single place
/// encoding that rule.
pub fn scoped_environments(environment: &str) -> [&str; 2] {
    [environment, ALL_ENVIRONMENTS]
}

/// One applied seed as recorded in the repository table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    /// Seed identifier (file stem)
    pub seed: String,
    /// Environment the seed was logged under
    pub env: String,
    /// Batch the seed was applied in
    pub batch: i32,
}

/// Storage contract for the applied-seed log.
///
/// The store does not enforce uniqueness of `(seed, env)`; the migrator
/// checks "already ran" before applying, and a duplicate insert is a caller
/// bug rather than a store-level rejection.
#[async_trait]
pub trait SeedRepository: Send + Sync {
    /// Create the backing table.
    async fn create_repository(&self) -> SeederResult<()>;

    /// Whether the backing table exists.
    async fn repository_exists(&self) -> SeederResult<bool>;

    /// Identifiers logged under `environment` or `all`.
    async fn get_ran(&self, environment: &str) -> SeederResult<Vec<String>>;

    /// Records of the current highest batch for the scoped environments,
    /// ordered by seed identifier descending.
    async fn get_last(&self, environment: &str) -> SeederResult<Vec<SeedRecord>>;

    /// The batch number the next run should use.
    async fn get_next_batch_number(&self, environment: &str) -> SeederResult<i32>;

    /// Record that a seed ran.
    async fn log(&self, seed: &str, environment: &str, batch: i32) -> SeederResult<()>;

    /// Remove a seed from the log. Not an error when nothing matches.
    async fn delete(&self, record: &SeedRecord, environment: &str) -> SeederResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_environments_always_include_all() {
        assert_eq!(scoped_environments("staging"), ["staging", "all"]);
        assert_eq!(scoped_environments("all"), ["all", "all"]);
    }
}
