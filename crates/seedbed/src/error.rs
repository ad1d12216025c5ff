//! Error types for the seeder system
//!
//! One variant per failure class: connection/session problems, repository
//! schema trouble, unsupported drivers for the foreign-key guard, scaffold
//! collisions, and failures inside a seed script itself.

/// Result type alias for seeder operations
pub type SeederResult<T> = Result<T, SeederError>;

/// Error types for seeder operations
#[derive(Debug, thiserror::Error)]
pub enum SeederError {
    /// Database unreachable or session invalid
    #[error("Connection error: {0}")]
    Connection(String),

    /// Repository table creation or inspection failed
    #[error("Schema error: {0}")]
    Schema(String),

    /// Foreign-key guard invoked for a driver with no registered statements
    #[error("No foreign key statements registered for driver '{0}'")]
    UnsupportedDriver(String),

    /// Scaffold target name collides with an existing seed
    #[error("Seed '{0}' already exists")]
    AlreadyExists(String),

    /// Scaffold target directory could not be created
    #[error("Path error: {0}")]
    Path(String),

    /// A seed script's own logic failed; prior successes in the batch stay logged
    #[error("Seed '{seed}' failed for environment '{environment}': {message}")]
    SeedExecution {
        seed: String,
        environment: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filesystem error while scanning or writing seed files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for SeederError {
    fn from(err: sqlx::Error) -> Self {
        SeederError::Connection(err.to_string())
    }
}

impl From<url::ParseError> for SeederError {
    fn from(err: url::ParseError) -> Self {
        SeederError::Configuration(format!("invalid database URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlx_errors_map_to_connection() {
        let err: SeederError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, SeederError::Connection(_)));
    }

    #[test]
    fn seed_execution_error_carries_context() {
        let err = SeederError::SeedExecution {
            seed: "20230101_users".to_string(),
            environment: "staging".to_string(),
            message: "relation missing".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("20230101_users"));
        assert!(rendered.contains("staging"));
    }
}
