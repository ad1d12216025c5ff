//! Database connection management
//!
//! The store never caches a session across table accesses: switching the
//! target database name mid-process must not leave a stale session behind, so
//! every table access goes through [`ConnectionManager::fresh_session`],
//! which closes the previous pool and reconnects. Script execution instead
//! uses [`ConnectionManager::dedicated_session`], a session the caller owns
//! outright, since session-scoped state (foreign-key toggling) must survive
//! the store's reconnect churn. The manager is an explicit handle passed into
//! the store and executor rather than ambient global state, so tests can swap
//! the whole seam out.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::Mutex;
use url::Url;

use crate::error::{SeederError, SeederResult};

/// Connection factory with forced disconnect-reconnect semantics
#[derive(Debug)]
pub struct ConnectionManager {
    driver: String,
    url: Mutex<Url>,
    pool: Mutex<Option<PgPool>>,
}

impl ConnectionManager {
    /// Create a manager for the given database URL.
    pub fn new(database_url: &str) -> SeederResult<Self> {
        let url = Url::parse(database_url)?;
        let driver = url.scheme().to_string();

        Ok(Self {
            driver,
            url: Mutex::new(url),
            pool: Mutex::new(None),
        })
    }

    /// Driver name taken from the URL scheme (e.g. `postgres`).
    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// Point the manager at a different database name. The current session
    /// is torn down; the next table access reconnects against the new name.
    pub async fn set_database_name(&self, database_name: &str) {
        {
            let mut url = self.url.lock().await;
            url.set_path(&format!("/{}", database_name));
        }

        if let Some(stale) = self.pool.lock().await.take() {
            stale.close().await;
        }

        tracing::debug!(database_name, "database name changed, connection dropped");
    }

    /// Disconnect the previous session and hand out a fresh one.
    pub async fn fresh_session(&self) -> SeederResult<PgPool> {
        if let Some(stale) = self.pool.lock().await.take() {
            stale.close().await;
        }

        let url = self.url.lock().await.clone();
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(url.as_str())
            .await
            .map_err(|e| SeederError::Connection(format!("failed to connect to database: {}", e)))?;

        tracing::debug!(driver = %self.driver, "fresh database session established");

        *self.pool.lock().await = Some(pool.clone());
        Ok(pool)
    }

    /// Open a session the caller owns outright. Unlike [`fresh_session`] it
    /// neither tears down nor occupies the shared slot, so store table
    /// accesses reconnecting mid-operation cannot close it.
    ///
    /// [`fresh_session`]: ConnectionManager::fresh_session
    pub async fn dedicated_session(&self) -> SeederResult<PgPool> {
        let url = self.url.lock().await.clone();
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(url.as_str())
            .await
            .map_err(|e| SeederError::Connection(format!("failed to connect to database: {}", e)))?;

        tracing::debug!(driver = %self.driver, "dedicated database session established");
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_comes_from_url_scheme() {
        let manager = ConnectionManager::new("postgres://localhost/app").unwrap();
        assert_eq!(manager.driver(), "postgres");
    }

    #[tokio::test]
    async fn set_database_name_rewrites_url() {
        let manager = ConnectionManager::new("postgres://localhost/app").unwrap();
        manager.set_database_name("tenant_42").await;
        assert_eq!(manager.url.lock().await.path(), "/tenant_42");
    }

    #[test]
    fn invalid_url_is_a_configuration_error() {
        let err = ConnectionManager::new("not a url").unwrap_err();
        assert!(matches!(err, SeederError::Configuration(_)));
    }
}
