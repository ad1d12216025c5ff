//! Postgres-backed seed repository
//!
//! Every table access obtains a fresh session from the connection manager,
//! so a database-name switch earlier in the process can never leak a stale
//! handle into a query.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::{scoped_environments, SeedRecord, SeedRepository};
use crate::connection::ConnectionManager;
use crate::error::{SeederError, SeederResult};

/// Seed repository persisting to a database table
pub struct DatabaseSeedRepository {
    connections: Arc<ConnectionManager>,
    table: String,
}

impl DatabaseSeedRepository {
    /// Create a repository over the given connection manager and table name.
    pub fn new(connections: Arc<ConnectionManager>, table: impl Into<String>) -> Self {
        Self {
            connections,
            table: table.into(),
        }
    }

    /// The connection manager backing this repository.
    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    /// The tracking table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Rebind the repository to a different database name before any other
    /// operation; the next session reconnects against it.
    pub async fn set_database_name(&self, database_name: &str) {
        self.connections.set_database_name(database_name).await;
    }

    async fn session(&self) -> SeederResult<PgPool> {
        self.connections.fresh_session().await
    }

    async fn last_batch_number(&self, environment: &str) -> SeederResult<i32> {
        let pool = self.session().await?;
        let [env, all] = scoped_environments(environment);

        let sql = format!(
            "SELECT COALESCE(MAX(batch), 0) FROM {} WHERE env IN ($1, $2)",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(env)
            .bind(all)
            .fetch_one(&pool)
            .await?;

        // COALESCE guarantees a non-null value even on an empty table
        let last: i32 = row.try_get(0)?;
        Ok(last)
    }
}

#[async_trait]
impl SeedRepository for DatabaseSeedRepository {
    async fn create_repository(&self) -> SeederResult<()> {
        let pool = self.session().await?;

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    \
                seed VARCHAR(255) NOT NULL,\n    \
                env VARCHAR(255) NOT NULL,\n    \
                batch INTEGER NOT NULL\n\
            )",
            self.table
        );
        sqlx::query(&sql)
            .execute(&pool)
            .await
            .map_err(|e| SeederError::Schema(format!("failed to create table {}: {}", self.table, e)))?;

        Ok(())
    }

    async fn repository_exists(&self) -> SeederResult<bool> {
        let pool = self.session().await?;

        // Scope to the search path so a same-named table in another schema
        // does not mask a missing repository.
        let row = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
             WHERE table_name = $1 AND table_schema = ANY(current_schemas(false)))",
        )
        .bind(&self.table)
        .fetch_one(&pool)
        .await?;

        let exists: bool = row.try_get(0)?;
        Ok(exists)
    }

    async fn get_ran(&self, environment: &str) -> SeederResult<Vec<String>> {
        let pool = self.session().await?;
        let [env, all] = scoped_environments(environment);

        let sql = format!("SELECT seed FROM {} WHERE env IN ($1, $2)", self.table);
        let rows = sqlx::query(&sql)
            .bind(env)
            .bind(all)
            .fetch_all(&pool)
            .await?;

        let mut ran = Vec::with_capacity(rows.len());
        for row in rows {
            ran.push(row.try_get("seed")?);
        }
        Ok(ran)
    }

    async fn get_last(&self, environment: &str) -> SeederResult<Vec<SeedRecord>> {
        let batch = self.last_batch_number(environment).await?;

        let pool = self.session().await?;
        let [env, all] = scoped_environments(environment);

        let sql = format!(
            "SELECT seed, env, batch FROM {} WHERE env IN ($1, $2) AND batch = $3 ORDER BY seed DESC",
            self.table
        );
        let rows = sqlx::query(&sql)
            .bind(env)
            .bind(all)
            .bind(batch)
            .fetch_all(&pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(SeedRecord {
                seed: row.try_get("seed")?,
                env: row.try_get("env")?,
                batch: row.try_get("batch")?,
            });
        }
        Ok(records)
    }

    async fn get_next_batch_number(&self, environment: &str) -> SeederResult<i32> {
        Ok(self.last_batch_number(environment).await? + 1)
    }

    async fn log(&self, seed: &str, environment: &str, batch: i32) -> SeederResult<()> {
        let pool = self.session().await?;

        let sql = format!(
            "INSERT INTO {} (seed, env, batch) VALUES ($1, $2, $3)",
            self.table
        );
        sqlx::query(&sql)
            .bind(seed)
            .bind(environment)
            .bind(batch)
            .execute(&pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, record: &SeedRecord, environment: &str) -> SeederResult<()> {
        let pool = self.session().await?;
        let [env, all] = scoped_environments(environment);

        let sql = format!(
            "DELETE FROM {} WHERE env IN ($1, $2) AND seed = $3",
            self.table
        );
        sqlx::query(&sql)
            .bind(env)
            .bind(all)
            .bind(&record.seed)
            .execute(&pool)
            .await?;

        Ok(())
    }
}
