//! Project type detection.
//!
//! An explicit `project.type` always wins. Otherwise ordered heuristics run
//! over the goal and description text and the shape of the stack section;
//! the first match decides. CLI vocabulary is checked before the extension
//! matcher because phrases like "command line" otherwise trip it.
//!
//! Keyword checks are plain substring matches on the lowercased text, so
//! "clipboard" counts as CLI wording and "therapist" as API wording.

use faf_discovery::ExtensionDetector;
use faf_registry::{GENERIC_TYPE, resolve_type};
use serde_json::Value;

use crate::fill::FillClassifier;

const CLI_WORDS: &[&str] = &["cli", "command line"];

const API_WORDS: &[&str] = &["api", "backend"];

/// Framework value that marks an extension regardless of wording.
const EXTENSION_FRAMEWORK: &str = "Chrome Extension";

/// Outcome of type detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedType {
    /// Declared type string, trimmed, if the document states one.
    pub declared: Option<String>,
    /// Type id before alias resolution (declared or heuristic).
    pub detected: String,
    /// Canonical registry id used for slot selection.
    pub resolved: &'static str,
}

pub fn detect_type(tree: &Value, fill: &FillClassifier) -> DetectedType {
    let declared = tree
        .pointer("/project/type")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let detected = match &declared {
        Some(raw) => raw.clone(),
        None => infer_type(tree, fill).to_string(),
    };
    let resolved = resolve_type(&detected);

    DetectedType {
        declared,
        detected,
        resolved,
    }
}

fn text_at(tree: &Value, pointer: &str) -> String {
    tree.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase()
}

fn infer_type(tree: &Value, fill: &FillClassifier) -> &'static str {
    let goal = text_at(tree, "/project/goal");
    let what = text_at(tree, "/human_context/what");
    let language = text_at(tree, "/project/main_language");

    let stack = |key: &str| fill.is_present(tree.get("stack").and_then(|s| s.get(key)));

    let mentions = |words: &[&str]| {
        words
            .iter()
            .any(|w| goal.contains(*w) || what.contains(*w))
    };

    if mentions(CLI_WORDS) {
        return "cli-tool";
    }

    let framework = tree.pointer("/stack/framework").and_then(Value::as_str);
    if ExtensionDetector::detect(&goal).detected
        || ExtensionDetector::detect(&what).detected
        || framework == Some(EXTENSION_FRAMEWORK)
    {
        return "chrome-extension";
    }

    if goal.contains("library")
        || what.contains("library")
        || goal.contains("package")
        || what.contains("npm package")
    {
        return "library";
    }

    if mentions(API_WORDS) || (stack("backend") && !stack("frontend")) {
        return "backend-api";
    }

    if stack("frontend") || stack("css_framework") || stack("ui_library") {
        return if stack("backend") { "fullstack" } else { "frontend" };
    }

    if language == "python" {
        return "python-app";
    }

    GENERIC_TYPE
}
