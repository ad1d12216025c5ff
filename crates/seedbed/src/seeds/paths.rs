//! Seed path resolution
//!
//! A root directory holds one subdirectory per environment plus a universal
//! `all/` subdirectory. For each directory reachable under a root the
//! resolver emits `<dir>/all` and `<dir>/<environment>` as scan candidates,
//! deduplicated preserving first-seen order. Candidates are not checked for
//! existence; missing directories yield zero files when scanned.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::repository::ALL_ENVIRONMENTS;

/// Expand root directories into the concrete locations to scan for the
/// given environment.
pub fn resolve_seed_paths(roots: &[PathBuf], environment: &str) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for root in roots {
        for dir in directories_under(root) {
            for candidate in [dir.join(ALL_ENVIRONMENTS), dir.join(environment)] {
                if seen.insert(candidate.clone()) {
                    resolved.push(candidate);
                }
            }
        }
    }

    resolved
}

/// The root itself plus every directory reachable beneath it.
fn directories_under(root: &Path) -> Vec<PathBuf> {
    let mut dirs = vec![root.to_path_buf()];
    let mut i = 0;

    while i < dirs.len() {
        let current = dirs[i].clone();
        if let Ok(entries) = fs::read_dir(&current) {
            let mut subdirs: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect();
            subdirs.sort();
            dirs.extend(subdirs);
        }
        i += 1;
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn root_expands_to_all_and_environment() {
        let roots = vec![PathBuf::from("/seeders")];
        let resolved = resolve_seed_paths(&roots, "dev");
        assert_eq!(
            resolved,
            vec![PathBuf::from("/seeders/all"), PathBuf::from("/seeders/dev")]
        );
    }

    #[test]
    fn duplicate_roots_collapse_preserving_order() {
        let roots = vec![PathBuf::from("/seeders"), PathBuf::from("/seeders")];
        let resolved = resolve_seed_paths(&roots, "dev");
        assert_eq!(
            resolved,
            vec![PathBuf::from("/seeders/all"), PathBuf::from("/seeders/dev")]
        );
    }

    #[test]
    fn nested_directories_contribute_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        fs::create_dir_all(root.join("extra")).unwrap();

        let resolved = resolve_seed_paths(&[root.clone()], "dev");

        assert_eq!(resolved[0], root.join("all"));
        assert_eq!(resolved[1], root.join("dev"));
        assert!(resolved.contains(&root.join("extra/all")));
        assert!(resolved.contains(&root.join("extra/dev")));
    }

    #[test]
    fn environment_matching_all_yields_one_candidate_per_dir() {
        let roots = vec![PathBuf::from("/seeders")];
        let resolved = resolve_seed_paths(&roots, "all");
        assert_eq!(resolved, vec![PathBuf::from("/seeders/all")]);
    }
}
