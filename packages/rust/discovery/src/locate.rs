//! Document location.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Preferred document names, checked in order before any other `*.faf` file.
pub const DOCUMENT_NAMES: &[&str] = &["project.faf", ".faf"];

/// How many ancestor directories [`find_nearest`] will climb.
const MAX_ASCENT: usize = 10;

/// Whether a path exists. Any error (permissions, broken link) counts as absent.
pub fn exists(path: &Path) -> bool {
    std::fs::metadata(path).is_ok()
}

/// Find the nearest document starting at `start` and walking up its ancestors.
///
/// `start` may be a file, in which case the search begins in its directory.
pub fn find_nearest(start: &Path) -> Option<PathBuf> {
    let first = if start.is_file() {
        start.parent()?
    } else {
        start
    };

    for dir in first.ancestors().take(MAX_ASCENT + 1) {
        if let Some(found) = find_in_dir(dir) {
            debug!(path = %found.display(), "document located");
            return Some(found);
        }
    }
    None
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    if let Some(named) = DOCUMENT_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
    {
        return Some(named);
    }

    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "faf"))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exists_fails_to_false() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(exists(dir.path()));
        assert!(!exists(&dir.path().join("missing.faf")));
    }

    #[test]
    fn prefers_project_faf() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("alpha.faf"), "").expect("write");
        std::fs::write(dir.path().join("project.faf"), "").expect("write");
        assert_eq!(
            find_nearest(dir.path()),
            Some(dir.path().join("project.faf"))
        );
    }

    #[test]
    fn falls_back_to_any_faf_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("zeta.faf"), "").expect("write");
        std::fs::write(dir.path().join("beta.faf"), "").expect("write");
        assert_eq!(find_nearest(dir.path()), Some(dir.path().join("beta.faf")));
    }

    #[test]
    fn walks_up_to_ancestor() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("project.faf"), "").expect("write");
        let nested = dir.path().join("src").join("bin");
        std::fs::create_dir_all(&nested).expect("mkdir");
        assert_eq!(find_nearest(&nested), Some(dir.path().join("project.faf")));
    }

    #[test]
    fn starting_from_a_file_searches_its_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let doc = dir.path().join(".faf");
        std::fs::write(&doc, "").expect("write");
        let other = dir.path().join("README.md");
        std::fs::write(&other, "").expect("write");
        assert_eq!(find_nearest(&other), Some(doc));
    }
}
