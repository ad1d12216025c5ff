//! Shared command wiring: configuration, connection, migrator, confirmation

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use seedbed::{
    resolve_seed_paths, ConnectionManager, DatabaseSeedRepository, SeedMigrator, SeederConfig,
    SqlSeedExecutor,
};

pub type Migrator = SeedMigrator<DatabaseSeedRepository, SqlSeedExecutor>;

/// Everything a seed command needs, resolved from configuration plus the
/// per-invocation overrides.
pub struct SeedContext {
    pub config: SeederConfig,
    pub environment: String,
    pub migrator: Migrator,
}

impl SeedContext {
    pub async fn build(
        env: Option<String>,
        database_name: Option<String>,
    ) -> anyhow::Result<Self> {
        let config = SeederConfig::from_env();

        let environment = env
            .or_else(|| config.environment.clone())
            .unwrap_or_else(|| "development".to_string());

        let database_url = config
            .database_url
            .clone()
            .context("DATABASE_URL is not set")?;

        let connections = Arc::new(ConnectionManager::new(&database_url)?);
        if let Some(name) = database_name {
            connections.set_database_name(&name).await;
        }

        let repository = DatabaseSeedRepository::new(Arc::clone(&connections), config.table.clone());
        let executor = SqlSeedExecutor::new(connections);
        let migrator = SeedMigrator::new(repository, executor, environment.clone());

        Ok(Self {
            config,
            environment,
            migrator,
        })
    }

    /// Expand the command-line roots (or the configured ones when none are
    /// given) into the concrete directories to scan.
    pub fn seed_paths(&self, overrides: &[PathBuf]) -> Vec<PathBuf> {
        let roots = if overrides.is_empty() {
            self.config.dirs.clone()
        } else {
            overrides.to_vec()
        };
        resolve_seed_paths(&roots, &self.environment)
    }
}

/// Destructive commands against production need an explicit yes unless
/// `--force` was given.
pub fn confirm_to_proceed(environment: &str, force: bool) -> anyhow::Result<bool> {
    if force || environment != "production" {
        return Ok(true);
    }

    let confirmed = inquire::Confirm::new("Application in production. Do you really wish to run this command?")
        .with_default(false)
        .prompt()?;

    if !confirmed {
        println!("Command canceled.");
    }
    Ok(confirmed)
}
