//! Seed file discovery and parsing
//!
//! Seed scripts are `.sql` files. The whole file is the up script unless it
//! carries `-- up` / `-- down` section markers; everything under `-- down`
//! becomes the teardown run on rollback. Identifiers are file stems, and
//! lexical identifier order is application order - the conventional date
//! prefix makes that chronological. Non-conforming names are not flagged;
//! they simply sort where they sort.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

use super::definitions::SeedFile;
use crate::error::SeederResult;

/// Derive the seed identifier from a file path: base name, extension
/// stripped. Used uniformly for existence checks and log correlation.
pub fn seed_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Scan the given paths, in order, for seed files. Returns one entry per
/// identifier sorted ascending; when the same identifier appears under
/// several resolved paths the later path wins.
pub fn load_seed_files(paths: &[PathBuf]) -> SeederResult<Vec<SeedFile>> {
    let mut by_name: BTreeMap<String, SeedFile> = BTreeMap::new();

    for path in paths {
        if !path.is_dir() {
            // Resolved candidates are not verified to exist; missing
            // directories simply contribute no files.
            continue;
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().map_or(false, |ext| ext == "sql"))
            .collect();
        entries.sort();

        for entry in entries {
            let seed = parse_seed_file(&entry)?;
            by_name.insert(seed.name.clone(), seed);
        }
    }

    Ok(by_name.into_values().collect())
}

/// Parse one seed file into its up and down scripts.
pub fn parse_seed_file(path: &Path) -> SeederResult<SeedFile> {
    let content = fs::read_to_string(path)?;
    let (up_sql, down_sql) = parse_seed_content(&content);

    Ok(SeedFile {
        name: seed_name(path),
        path: path.to_path_buf(),
        up_sql,
        down_sql,
    })
}

fn parse_seed_content(content: &str) -> (String, String) {
    let mut up_sql = Vec::new();
    let mut down_sql = Vec::new();
    let mut current_section = "up";

    for line in content.lines() {
        let trimmed = line.trim().to_lowercase();

        if trimmed.starts_with("-- up") {
            current_section = "up";
            continue;
        } else if trimmed.starts_with("-- down") {
            current_section = "down";
            continue;
        }

        // Skip comment lines and empty lines
        if line.trim().is_empty() || line.trim().starts_with("--") {
            continue;
        }

        match current_section {
            "up" => up_sql.push(line),
            _ => down_sql.push(line),
        }
    }

    (
        up_sql.join("\n").trim().to_string(),
        down_sql.join("\n").trim().to_string(),
    )
}

/// Split a script into individual statements using proper SQL parsing.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let dialect = GenericDialect {};

    match Parser::parse_sql(&dialect, sql) {
        Ok(parsed) => parsed.into_iter().map(|stmt| format!("{};", stmt)).collect(),
        Err(e) => {
            // Fall back to naive semicolon splitting
            tracing::warn!("SQL parsing failed, using naive semicolon splitting: {}", e);
            sql.split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| format!("{};", s))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn seed_name_strips_path_and_extension() {
        assert_eq!(
            seed_name(Path::new("/seeders/all/20230101_users.sql")),
            "20230101_users"
        );
        assert_eq!(seed_name(Path::new("plain")), "plain");
    }

    #[test]
    fn file_without_markers_is_all_up() {
        let (up, down) = parse_seed_content("INSERT INTO t VALUES (1);\n");
        assert_eq!(up, "INSERT INTO t VALUES (1);");
        assert!(down.is_empty());
    }

    #[test]
    fn down_marker_starts_teardown_section() {
        let content = "-- up\nINSERT INTO t VALUES (1);\n\n-- down\nDELETE FROM t WHERE id = 1;\n";
        let (up, down) = parse_seed_content(content);
        assert_eq!(up, "INSERT INTO t VALUES (1);");
        assert_eq!(down, "DELETE FROM t WHERE id = 1;");
    }

    #[test]
    fn discovery_sorts_by_name_and_skips_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("20230103_c.sql"), "SELECT 3;").unwrap();
        fs::write(root.join("20230101_a.sql"), "SELECT 1;").unwrap();
        fs::write(root.join("20230102_b.sql"), "SELECT 2;").unwrap();
        fs::write(root.join("notes.txt"), "not a seed").unwrap();

        let paths = vec![root.to_path_buf(), root.join("does_not_exist")];
        let seeds = load_seed_files(&paths).unwrap();

        let names: Vec<&str> = seeds.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["20230101_a", "20230102_b", "20230103_c"]);
    }

    #[test]
    fn later_path_wins_on_duplicate_names() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("all");
        let second = dir.path().join("dev");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(first.join("20230101_a.sql"), "SELECT 'all';").unwrap();
        fs::write(second.join("20230101_a.sql"), "SELECT 'dev';").unwrap();

        let seeds = load_seed_files(&[first, second]).unwrap();
        assert_eq!(seeds.len(), 1);
        assert!(seeds[0].up_sql.contains("dev"));
    }

    #[test]
    fn statement_splitting_handles_multiple_statements() {
        let statements = split_sql_statements("INSERT INTO t VALUES (1); INSERT INTO t VALUES (2);");
        assert_eq!(statements.len(), 2);
        assert!(statements[0].ends_with(';'));
    }
}
