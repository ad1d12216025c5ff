//! Foreign-key guard
//!
//! Bulk batch operations (reset, rollback) delete seed data out of dependency
//! order, so they bracket the work with a driver-specific pair of statements
//! toggling referential-integrity enforcement. The caller is responsible for
//! re-enabling checks even when the bracketed operation fails.

use crate::error::{SeederError, SeederResult};

/// Disable/enable statement pair registered for a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FkStatements {
    pub disable: &'static str,
    pub enable: &'static str,
}

/// Statement lookup keyed on the active driver name
#[derive(Debug)]
pub struct ForeignKeyGuard {
    driver: String,
    statements: FkStatements,
}

impl ForeignKeyGuard {
    /// Look up the statement pair for a driver. Fails with
    /// [`SeederError::UnsupportedDriver`] when none is registered.
    pub fn for_driver(driver: &str) -> SeederResult<Self> {
        let statements = match driver {
            "postgres" | "postgresql" | "pgsql" => FkStatements {
                disable: "SET session_replication_role = 'replica';",
                enable: "SET session_replication_role = 'origin';",
            },
            "mysql" => FkStatements {
                disable: "SET FOREIGN_KEY_CHECKS=0;",
                enable: "SET FOREIGN_KEY_CHECKS=1;",
            },
            "sqlite" => FkStatements {
                disable: "PRAGMA foreign_keys = OFF;",
                enable: "PRAGMA foreign_keys = ON;",
            },
            other => return Err(SeederError::UnsupportedDriver(other.to_string())),
        };

        Ok(Self {
            driver: driver.to_string(),
            statements,
        })
    }

    /// The driver this guard was resolved for.
    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// Statement disabling referential-integrity checks.
    pub fn disable_statement(&self) -> &'static str {
        self.statements.disable
    }

    /// Statement re-enabling referential-integrity checks.
    pub fn enable_statement(&self) -> &'static str {
        self.statements.enable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_statements_are_registered() {
        let guard = ForeignKeyGuard::for_driver("postgres").unwrap();
        assert!(guard.disable_statement().contains("replica"));
        assert!(guard.enable_statement().contains("origin"));
    }

    #[test]
    fn mysql_and_sqlite_statements_are_registered() {
        let mysql = ForeignKeyGuard::for_driver("mysql").unwrap();
        assert_eq!(mysql.disable_statement(), "SET FOREIGN_KEY_CHECKS=0;");

        let sqlite = ForeignKeyGuard::for_driver("sqlite").unwrap();
        assert_eq!(sqlite.enable_statement(), "PRAGMA foreign_keys = ON;");
    }

    #[test]
    fn unknown_driver_is_rejected() {
        let err = ForeignKeyGuard::for_driver("mssql").unwrap_err();
        assert!(matches!(err, SeederError::UnsupportedDriver(ref d) if d == "mssql"));
    }
}
