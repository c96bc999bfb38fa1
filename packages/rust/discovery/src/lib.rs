//! Project discovery: the local-filesystem collaborators of the compiler.
//!
//! Before scoring, the compiler asks a [`ProjectInspector`] for best-effort
//! facts about the directory holding the document (name, language,
//! framework, ...). Those facts may fill slots the document leaves empty but
//! never override what it states. This crate also locates documents and
//! provides the browser-extension keyword matcher used by type detection.

mod census;
mod extension;
mod locate;
mod manifest;

use std::path::Path;

use faf_shared::{FafError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use extension::{Detection, ExtensionDetector};
pub use locate::{DOCUMENT_NAMES, exists, find_nearest};

/// Default census depth.
const DEFAULT_MAX_DEPTH: usize = 2;

/// Default census entry budget.
const DEFAULT_MAX_ENTRIES: usize = 512;

// ---------------------------------------------------------------------------
// PartialContext
// ---------------------------------------------------------------------------

/// Best-effort facts inferred from a project directory. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_tool: Option<String>,
}

impl PartialContext {
    /// `(fact key, slot path, value)` for every discovered fact, in slot order.
    pub fn facts(&self) -> Vec<(&'static str, &'static str, &str)> {
        [
            ("projectName", "project.name", &self.project_name),
            ("mainLanguage", "project.main_language", &self.main_language),
            ("framework", "stack.frontend", &self.framework),
            ("database", "stack.database", &self.database),
            ("backend", "stack.backend", &self.backend),
            ("hosting", "stack.hosting", &self.hosting),
            ("buildTool", "stack.build", &self.build_tool),
        ]
        .into_iter()
        .filter_map(|(key, slot, value)| value.as_deref().map(|v| (key, slot, v)))
        .collect()
    }

    /// Number of discovered facts.
    pub fn len(&self) -> usize {
        self.facts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Set `slot` to `value` only if nothing filled it yet.
pub(crate) fn fill(slot: &mut Option<String>, value: impl Into<String>) {
    if slot.is_none() {
        *slot = Some(value.into());
    }
}

// ---------------------------------------------------------------------------
// Inspector seam
// ---------------------------------------------------------------------------

/// Source of discovered project facts.
///
/// Implementations must return `Ok` with an empty context when a directory
/// simply carries no signals, and `Err` only for I/O failure.
pub trait ProjectInspector: Send + Sync {
    /// Inspect a project directory.
    fn inspect(&self, dir: &Path) -> Result<PartialContext>;

    /// Whether the directory looks like a static subsite (see [`is_subsite`]).
    fn is_subsite(&self, dir: &Path) -> bool {
        is_subsite(dir)
    }
}

/// Inspector that never finds anything. Used when discovery is disabled.
pub struct NoopInspector;

impl ProjectInspector for NoopInspector {
    fn inspect(&self, _dir: &Path) -> Result<PartialContext> {
        Ok(PartialContext::default())
    }

    fn is_subsite(&self, _dir: &Path) -> bool {
        false
    }
}

/// Bounds for the filesystem scan.
#[derive(Debug, Clone)]
pub struct InspectorOptions {
    /// Maximum directory depth of the file census.
    pub max_depth: usize,
    /// Maximum directory entries the census may visit.
    pub max_entries: usize,
}

impl Default for InspectorOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Filesystem-backed inspector: manifests, hosting markers, file census.
#[derive(Debug, Clone, Default)]
pub struct FsInspector {
    opts: InspectorOptions,
}

impl FsInspector {
    pub fn new(opts: InspectorOptions) -> Self {
        Self { opts }
    }
}

impl ProjectInspector for FsInspector {
    #[instrument(skip_all, fields(dir = %dir.display()))]
    fn inspect(&self, dir: &Path) -> Result<PartialContext> {
        if !dir.is_dir() {
            return Err(FafError::discovery(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        // Surface permission problems as a failure rather than "no signals".
        std::fs::read_dir(dir).map_err(|e| FafError::io(dir, e))?;

        let mut ctx = PartialContext::default();
        manifest::inspect_manifests(dir, &mut ctx);
        manifest::inspect_markers(dir, &mut ctx);

        if ctx.main_language.is_none() {
            if let Some(language) =
                census::dominant_language(dir, self.opts.max_depth, self.opts.max_entries)
            {
                ctx.main_language = Some(language.to_string());
            }
        }

        debug!(facts = ctx.len(), "project inspected");
        Ok(ctx)
    }
}

/// A directory with a browsable `index.html` but no `package.json` is a static subsite.
pub fn is_subsite(dir: &Path) -> bool {
    !exists(&dir.join("package.json")) && exists(&dir.join("index.html"))
}
