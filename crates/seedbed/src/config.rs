//! Seeder configuration
//!
//! Covers the repository table name, the default environment, the root seed
//! directories, and the database URL. Values come from `from_env` or are set
//! directly; commands may override the environment and database name per
//! invocation.

use std::env;
use std::path::PathBuf;

/// Configuration for the seeder system
#[derive(Debug, Clone)]
pub struct SeederConfig {
    /// Table name for tracking applied seeds
    pub table: String,
    /// Default environment to seed; commands can override it
    pub environment: Option<String>,
    /// Root directories scanned for seed files; the first one is the
    /// target for generated stubs
    pub dirs: Vec<PathBuf>,
    /// Database URL for the tracked connection
    pub database_url: Option<String>,
}

impl Default for SeederConfig {
    fn default() -> Self {
        Self {
            table: "seeders".to_string(),
            environment: None,
            dirs: vec![PathBuf::from("database/seeders")],
            database_url: None,
        }
    }
}

impl SeederConfig {
    /// Build a configuration from environment variables, falling back to
    /// the defaults for anything unset.
    ///
    /// Recognized variables: `SEEDBED_TABLE`, `SEEDBED_ENV` (or `APP_ENV`),
    /// `SEEDBED_DIR` (comma separated), `DATABASE_URL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(table) = env::var("SEEDBED_TABLE") {
            if !table.is_empty() {
                config.table = table;
            }
        }

        config.environment = env::var("SEEDBED_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .ok()
            .filter(|env| !env.is_empty());

        if let Ok(dirs) = env::var("SEEDBED_DIR") {
            let dirs: Vec<PathBuf> = dirs
                .split(',')
                .map(str::trim)
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from)
                .collect();
            if !dirs.is_empty() {
                config.dirs = dirs;
            }
        }

        config.database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SeederConfig::default();
        assert_eq!(config.table, "seeders");
        assert_eq!(config.environment, None);
        assert_eq!(config.dirs, vec![PathBuf::from("database/seeders")]);
        assert_eq!(config.database_url, None);
    }
}
