//! Seed stub scaffolding
//!
//! Generates a new date-prefixed seed file from a fixed template. Generation
//! fails when a seed with the same name was already generated into the
//! target directory, whatever its date prefix.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::loader::seed_name;
use crate::error::{SeederError, SeederResult};

/// Creates new seed files from the stub template
pub struct SeedCreator;

impl SeedCreator {
    /// Create a new seed named `name` under `dir`, returning the path of
    /// the written file.
    pub fn create(name: &str, dir: &Path) -> SeederResult<PathBuf> {
        let name = name.trim().replace(' ', "_").to_lowercase();
        if name.is_empty() {
            return Err(SeederError::Configuration(
                "seed name must not be empty".to_string(),
            ));
        }

        Self::ensure_seed_does_not_exist(&name, dir)?;

        fs::create_dir_all(dir).map_err(|e| {
            SeederError::Path(format!(
                "failed to create seed directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let prefix = Utc::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("{}_{}.sql", prefix, name));
        fs::write(&path, Self::template(&name))?;

        tracing::info!(seed = %name, path = %path.display(), "created seed");
        Ok(path)
    }

    fn ensure_seed_does_not_exist(name: &str, dir: &Path) -> SeederResult<()> {
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "sql") {
                let stem = seed_name(&path);
                if strip_date_prefix(&stem) == name {
                    return Err(SeederError::AlreadyExists(name.to_string()));
                }
            }
        }

        Ok(())
    }

    fn template(name: &str) -> String {
        format!(
            "-- Seed: {}\n\
             -- Created: {}\n\n\
             -- up\n\
             -- Add your seed statements here\n\n\n\
             -- down\n\
             -- Add teardown statements here (optional)\n\n",
            name,
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

/// Drop a leading `YYYYMMDD_HHMMSS_` generated prefix, if present.
fn strip_date_prefix(stem: &str) -> &str {
    let bytes = stem.as_bytes();
    if bytes.len() > 16
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8] == b'_'
        && bytes[9..15].iter().all(u8::is_ascii_digit)
        && bytes[15] == b'_'
    {
        &stem[16..]
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_a_dated_stub() {
        let dir = tempfile::tempdir().unwrap();
        let path = SeedCreator::create("Demo Users", dir.path()).unwrap();

        let stem = seed_name(&path);
        assert!(stem.ends_with("_demo_users"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("-- up"));
        assert!(content.contains("-- down"));
    }

    #[test]
    fn rejects_duplicate_names_whatever_the_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("20230101_120000_demo_users.sql"), "").unwrap();

        let err = SeedCreator::create("demo_users", dir.path()).unwrap_err();
        assert!(matches!(err, SeederError::AlreadyExists(ref n) if n == "demo_users"));
    }

    #[test]
    fn creates_missing_target_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("all");
        let path = SeedCreator::create("orgs", &nested).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn strip_date_prefix_only_matches_generated_names() {
        assert_eq!(strip_date_prefix("20230101_120000_demo"), "demo");
        assert_eq!(strip_date_prefix("20230101_demo"), "20230101_demo");
        assert_eq!(strip_date_prefix("demo"), "demo");
    }
}
