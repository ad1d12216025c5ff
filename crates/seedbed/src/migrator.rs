//! Seed migrator - applies pending seed scripts and records them in batches
//!
//! Every invocation walks the same sequence: make sure the repository table
//! exists (creating it transparently when missing), discover the seed files
//! under the resolved paths, then run, roll back, reset, or report status.
//! A whole run shares one batch number; rollback and reset work batch by
//! batch in reverse. Errors from the repository or from an individual seed
//! are never swallowed - the first failure halts the invocation with the
//! offending identifier and environment attached.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::connection::ConnectionManager;
use crate::error::{SeederError, SeederResult};
use crate::repository::{ForeignKeyGuard, SeedRepository};
use crate::seeds::{
    load_seed_files, seed_name, split_sql_statements, RollbackResult, RunOptions, SeedFile,
    SeedRunResult, SeedStatus,
};

/// Executes seed scripts against the target database.
///
/// This is the seam between the migrator and the connection: production code
/// uses [`SqlSeedExecutor`], tests inject a fake.
#[async_trait]
pub trait SeedExecutor: Send + Sync {
    /// Driver name, used to look up the foreign-key guard statements.
    fn driver(&self) -> &str;

    /// Execute a seed's up script.
    async fn apply(&self, seed: &SeedFile) -> SeederResult<()>;

    /// Execute a seed's down script.
    async fn revert(&self, seed: &SeedFile) -> SeederResult<()>;

    /// Execute a raw statement outside any seed (foreign-key toggling).
    async fn execute_raw(&self, sql: &str) -> SeederResult<()>;

    /// Pin one session for every subsequent call until [`end_session`].
    ///
    /// Foreign-key toggling is session-scoped on every supported driver, so
    /// the disable statement, the down scripts, and the enable statement
    /// only take effect together when they share a session.
    ///
    /// [`end_session`]: SeedExecutor::end_session
    async fn begin_session(&self) -> SeederResult<()>;

    /// Release the pinned session; later calls get per-call sessions again.
    async fn end_session(&self) -> SeederResult<()>;
}

/// Executor running seed statements over dedicated database sessions.
///
/// Outside a pinned session every script gets a session of its own, closed
/// when the script finishes. Between `begin_session` and `end_session` all
/// statements run on the one pinned session.
pub struct SqlSeedExecutor {
    connections: Arc<ConnectionManager>,
    pinned: tokio::sync::Mutex<Option<sqlx::PgPool>>,
}

impl SqlSeedExecutor {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self {
            connections,
            pinned: tokio::sync::Mutex::new(None),
        }
    }

    async fn execute_script(&self, sql: &str) -> SeederResult<()> {
        let statements: Vec<String> = split_sql_statements(sql)
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect();
        self.execute_statements(&statements).await
    }

    async fn execute_statements(&self, statements: &[String]) -> SeederResult<()> {
        let pinned = self.pinned.lock().await.clone();
        if let Some(pool) = pinned {
            return Self::run_on(&pool, statements).await;
        }

        let pool = self.connections.dedicated_session().await?;
        let outcome = Self::run_on(&pool, statements).await;
        pool.close().await;
        outcome
    }

    async fn run_on(pool: &sqlx::PgPool, statements: &[String]) -> SeederResult<()> {
        for statement in statements {
            sqlx::query(statement).execute(pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SeedExecutor for SqlSeedExecutor {
    fn driver(&self) -> &str {
        self.connections.driver()
    }

    async fn apply(&self, seed: &SeedFile) -> SeederResult<()> {
        self.execute_script(&seed.up_sql).await
    }

    async fn revert(&self, seed: &SeedFile) -> SeederResult<()> {
        self.execute_script(&seed.down_sql).await
    }

    async fn execute_raw(&self, sql: &str) -> SeederResult<()> {
        self.execute_statements(&[sql.to_string()]).await
    }

    async fn begin_session(&self) -> SeederResult<()> {
        let pool = self.connections.dedicated_session().await?;
        if let Some(previous) = self.pinned.lock().await.replace(pool) {
            previous.close().await;
        }
        Ok(())
    }

    async fn end_session(&self) -> SeederResult<()> {
        if let Some(pool) = self.pinned.lock().await.take() {
            pool.close().await;
        }
        Ok(())
    }
}

/// The seed migration engine
pub struct SeedMigrator<R: SeedRepository, E: SeedExecutor> {
    repository: R,
    executor: E,
    environment: String,
}

impl<R: SeedRepository, E: SeedExecutor> SeedMigrator<R, E> {
    pub fn new(repository: R, executor: E, environment: impl Into<String>) -> Self {
        Self {
            repository,
            executor,
            environment: environment.into(),
        }
    }

    /// The active environment.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Switch the active environment.
    pub fn set_environment(&mut self, environment: impl Into<String>) {
        self.environment = environment.into();
    }

    /// The repository recording applied seeds.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// The executor running seed scripts.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Derive the seed identifier for a file path.
    pub fn seed_name(path: &std::path::Path) -> String {
        seed_name(path)
    }

    /// Discover the seed files under the given paths, one entry per
    /// identifier, sorted ascending.
    pub fn get_seed_files(&self, paths: &[PathBuf]) -> SeederResult<Vec<SeedFile>> {
        load_seed_files(paths)
    }

    /// Run every pending seed under `paths` as one batch.
    ///
    /// Fail-fast: a seed that errors aborts the run; seeds already applied
    /// and logged in this batch stay logged.
    pub async fn run(&self, paths: &[PathBuf], options: RunOptions) -> SeederResult<SeedRunResult> {
        let start = Instant::now();
        self.prepare_repository().await?;

        let files = self.get_seed_files(paths)?;
        let ran: HashSet<String> = self
            .repository
            .get_ran(&self.environment)
            .await?
            .into_iter()
            .collect();

        let pending: Vec<&SeedFile> = files.iter().filter(|f| !ran.contains(&f.name)).collect();
        let skipped_count = files.len() - pending.len();

        if pending.is_empty() {
            tracing::info!(environment = %self.environment, "nothing to seed");
            return Ok(SeedRunResult {
                skipped_count,
                execution_time_ms: start.elapsed().as_millis(),
                ..Default::default()
            });
        }

        // One batch per invocation, allocated up front. The read-then-insert
        // is not transactionally guarded; concurrent invocations can allocate
        // the same batch number (documented limitation).
        let batch = self.repository.get_next_batch_number(&self.environment).await?;

        let mut applied_seeds = Vec::new();
        let mut pretended_statements = Vec::new();

        for seed in pending {
            if options.pretend {
                for statement in split_sql_statements(&seed.up_sql) {
                    tracing::info!(seed = %seed.name, "would run: {}", statement);
                    pretended_statements.push(statement);
                }
                continue;
            }

            tracing::info!(
                seed = %seed.name,
                environment = %self.environment,
                batch,
                "applying seed"
            );

            self.executor
                .apply(seed)
                .await
                .map_err(|e| self.seed_failure(seed, e))?;
            self.repository.log(&seed.name, &self.environment, batch).await?;
            applied_seeds.push(seed.name.clone());
        }

        Ok(SeedRunResult {
            applied_count: applied_seeds.len(),
            applied_seeds,
            skipped_count,
            pretended_statements,
            execution_time_ms: start.elapsed().as_millis(),
        })
    }

    /// Roll back the `steps` most recent batches for the active environment.
    pub async fn rollback(&self, paths: &[PathBuf], steps: usize) -> SeederResult<RollbackResult> {
        self.prepare_repository().await?;
        self.guarded_rollback(paths, steps).await
    }

    /// Roll back until no ran seeds remain for the active environment.
    pub async fn reset(&self, paths: &[PathBuf]) -> SeederResult<RollbackResult> {
        self.prepare_repository().await?;
        self.guarded_rollback(paths, usize::MAX).await
    }

    /// Ran/pending state for every discovered seed, in discovery order.
    pub async fn status(&self, paths: &[PathBuf]) -> SeederResult<Vec<SeedStatus>> {
        self.prepare_repository().await?;

        let ran: HashSet<String> = self
            .repository
            .get_ran(&self.environment)
            .await?
            .into_iter()
            .collect();

        Ok(self
            .get_seed_files(paths)?
            .iter()
            .map(|seed| SeedStatus {
                ran: ran.contains(&seed.name),
                seed: seed.name.clone(),
            })
            .collect())
    }

    /// Create the repository table when it is missing, so scoped operations
    /// never fail on a fresh database.
    async fn prepare_repository(&self) -> SeederResult<()> {
        if !self.repository.repository_exists().await? {
            tracing::info!("seed repository missing, creating it");
            self.repository.create_repository().await?;
        }
        Ok(())
    }

    /// Bracket batch removal with the foreign-key guard; checks are
    /// re-enabled even when the rollback itself fails.
    ///
    /// The disable statement, every down script, and the enable statement
    /// run on one pinned executor session, since the toggles are
    /// session-scoped. Store table accesses keep their own sessions.
    async fn guarded_rollback(&self, paths: &[PathBuf], steps: usize) -> SeederResult<RollbackResult> {
        let guard = ForeignKeyGuard::for_driver(self.executor.driver())?;

        self.executor.begin_session().await?;
        let result = match self.executor.execute_raw(guard.disable_statement()).await {
            Ok(()) => {
                let outcome = self.rollback_batches(paths, steps).await;
                let enable = self.executor.execute_raw(guard.enable_statement()).await;
                match outcome {
                    Ok(rolled_back) => enable.map(|_| rolled_back),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        };
        let ended = self.executor.end_session().await;

        let result = result?;
        ended?;
        Ok(result)
    }

    async fn rollback_batches(&self, paths: &[PathBuf], steps: usize) -> SeederResult<RollbackResult> {
        let start = Instant::now();

        let seed_index: HashMap<String, SeedFile> = self
            .get_seed_files(paths)?
            .into_iter()
            .map(|seed| (seed.name.clone(), seed))
            .collect();

        let mut rolled_back_seeds = Vec::new();
        let mut batches = 0;

        for _ in 0..steps {
            // Records arrive in reverse-identifier order within the batch.
            let records = self.repository.get_last(&self.environment).await?;
            if records.is_empty() {
                break;
            }
            batches += 1;

            for record in &records {
                match seed_index.get(&record.seed) {
                    Some(seed) if seed.has_down() => {
                        tracing::info!(
                            seed = %record.seed,
                            environment = %self.environment,
                            batch = record.batch,
                            "reverting seed"
                        );
                        self.executor
                            .revert(seed)
                            .await
                            .map_err(|e| self.seed_failure(seed, e))?;
                    }
                    Some(_) => {
                        tracing::debug!(seed = %record.seed, "seed has no down script, removing log row only");
                    }
                    None => {
                        tracing::warn!(seed = %record.seed, "seed file not found, removing log row only");
                    }
                }

                self.repository.delete(record, &self.environment).await?;
                rolled_back_seeds.push(record.seed.clone());
            }
        }

        Ok(RollbackResult {
            rolled_back_count: rolled_back_seeds.len(),
            rolled_back_seeds,
            batches,
            execution_time_ms: start.elapsed().as_millis(),
        })
    }

    fn seed_failure(&self, seed: &SeedFile, err: SeederError) -> SeederError {
        SeederError::SeedExecution {
            seed: seed.name.clone(),
            environment: self.environment.clone(),
            message: err.to_string(),
        }
    }
}
