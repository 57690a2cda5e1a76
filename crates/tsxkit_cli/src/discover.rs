//! Expand command-line paths into `.tsx` files

use anyhow::{bail, Context};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn is_tsx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsx"))
}

/// Resolved path used to spot the same file reached two ways
fn identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Files are taken as given; directories are walked for `*.tsx` in name order.
/// Each file appears once, at its first position. A directory that cannot be
/// fully read is an error so that no tileset is silently left unchecked.
pub fn discover_tilesets(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();

    for path in paths {
        if path.is_file() {
            if seen.insert(identity(path)) {
                found.push(path.clone());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(true).sort_by_file_name() {
                let entry = entry.with_context(|| format!("Searching {}", path.display()))?;
                if entry.file_type().is_file() && is_tsx(entry.path()) {
                    let file = entry.into_path();
                    if seen.insert(identity(&file)) {
                        found.push(file);
                    }
                }
            }
        } else {
            bail!("{}: no such file or directory", path.display());
        }
    }

    tracing::debug!(count = found.len(), "discovered tilesets");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_walks_directories_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b/nested")).unwrap();
        fs::write(root.join("water.tsx"), "").unwrap();
        fs::write(root.join("b/nested/cliff.TSX"), "").unwrap();
        fs::write(root.join("b/level.tmx"), "").unwrap();
        fs::write(root.join("a.tsx"), "").unwrap();

        let found = discover_tilesets(&[root.to_path_buf()]).unwrap();
        assert_eq!(
            found,
            vec![
                root.join("a.tsx"),
                root.join("b/nested/cliff.TSX"),
                root.join("water.tsx"),
            ]
        );
    }

    #[test]
    fn test_explicit_files_kept_and_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let tsx = root.join("water.tsx");
        let other = root.join("tileset.xml");
        fs::write(&tsx, "").unwrap();
        fs::write(&other, "").unwrap();

        let found =
            discover_tilesets(&[other.clone(), tsx.clone(), root.to_path_buf()]).unwrap();
        assert_eq!(found, vec![other, tsx]);
    }

    #[test]
    fn test_same_file_through_different_paths() {
        let dir = tempfile::tempdir().unwrap();
        let tsx = dir.path().join("water.tsx");
        fs::write(&tsx, "").unwrap();
        let dotted = dir.path().join(".").join("water.tsx");

        let found = discover_tilesets(&[tsx.clone(), dotted]).unwrap();
        assert_eq!(found, vec![tsx]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("water.tsx"), "").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("broken"))
            .unwrap();

        let err = discover_tilesets(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(err.to_string().starts_with("Searching "));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = discover_tilesets(&[missing]).unwrap_err();
        assert!(err.to_string().ends_with("nope: no such file or directory"));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_tilesets(&[dir.path().to_path_buf()])
            .unwrap()
            .is_empty());
    }
}
