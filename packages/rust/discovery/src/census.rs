//! Bounded file-extension census for main-language inference.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "target",
    ".git",
    "dist",
    "build",
    "vendor",
    ".venv",
    "venv",
    "__pycache__",
];

const EXTENSIONS: &[(&str, &str)] = &[
    ("rs", "Rust"),
    ("py", "Python"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("mjs", "JavaScript"),
    ("go", "Go"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("java", "Java"),
    ("kt", "Kotlin"),
    ("swift", "Swift"),
    ("c", "C"),
    ("h", "C"),
    ("cpp", "C++"),
    ("cc", "C++"),
    ("hpp", "C++"),
    ("cs", "C#"),
    ("dart", "Dart"),
    ("ex", "Elixir"),
    ("sol", "Solidity"),
];

fn language_of(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    EXTENSIONS
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|(_, lang)| *lang)
}

/// Most common source language under `root`.
///
/// Visits at most `max_entries` entries no deeper than `max_depth`, in sorted
/// order so truncation is deterministic. Ties go to the alphabetically first
/// language. Unreadable directories are skipped.
pub(crate) fn dominant_language(
    root: &Path,
    max_depth: usize,
    max_entries: usize,
) -> Option<&'static str> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut stack: Vec<(PathBuf, usize)> = vec![(root.to_path_buf(), 0)];
    let mut visited = 0usize;

    'walk: while let Some((dir, depth)) = stack.pop() {
        let Ok(read) = std::fs::read_dir(&dir) else {
            continue;
        };
        let mut entries: Vec<PathBuf> = read.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        entries.sort();

        let mut subdirs = Vec::new();
        for path in entries {
            visited += 1;
            if visited > max_entries {
                debug!(max_entries, "census entry budget exhausted");
                break 'walk;
            }
            if path.is_dir() {
                let skip = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| SKIP_DIRS.contains(&n));
                if !skip && depth < max_depth {
                    subdirs.push(path);
                }
            } else if let Some(lang) = language_of(&path) {
                *counts.entry(lang).or_default() += 1;
            }
        }
        // Reverse so the stack pops subdirectories in sorted order.
        stack.extend(subdirs.into_iter().rev().map(|p| (p, depth + 1)));
    }

    let mut best: Option<(&'static str, usize)> = None;
    for (lang, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((lang, count));
        }
    }
    best.map(|(lang, _)| lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, "").expect("write");
    }

    #[test]
    fn picks_most_common_language() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "a.go");
        touch(dir.path(), "b.go");
        touch(dir.path(), "c.rs");
        assert_eq!(dominant_language(dir.path(), 2, 100), Some("Go"));
    }

    #[test]
    fn ties_break_alphabetically() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "x.rs");
        touch(dir.path(), "y.py");
        assert_eq!(dominant_language(dir.path(), 2, 100), Some("Python"));
    }

    #[test]
    fn skips_vendored_and_deep_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "main.rb");
        touch(dir.path(), "node_modules/a.js");
        touch(dir.path(), "node_modules/b.js");
        touch(dir.path(), "one/two/three/deep.js");
        touch(dir.path(), "one/two/three/deeper.js");
        assert_eq!(dominant_language(dir.path(), 2, 100), Some("Ruby"));
    }

    #[test]
    fn respects_entry_budget() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "a.py");
        touch(dir.path(), "b.rs");
        touch(dir.path(), "c.rs");
        assert_eq!(dominant_language(dir.path(), 2, 1), Some("Python"));
    }

    #[test]
    fn empty_directory_has_no_language() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(dominant_language(dir.path(), 2, 100), None);
    }
}
