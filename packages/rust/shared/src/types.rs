//! Core domain types produced by a compilation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version of the scoring engine. Part of every checksum, so bumping it
/// invalidates previously issued checksums.
pub const ENGINE_VERSION: &str = "3.0.0-compiler";

/// `round(100 * filled / total)`, or 0 when `total` is 0.
pub fn percentage(filled: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((filled as f64 / total as f64) * 100.0).round() as u8
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
            Self::Info => f.write_str("info"),
        }
    }
}

/// Where in the document a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    /// Dotted field path (e.g. `stack.hosting`).
    pub field: String,
}

/// A single accumulated finding. Diagnostics are collected, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            location: None,
            suggestion: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Attach a field location. Line/column are unknown after deserialization.
    pub fn at_field(mut self, field: impl Into<String>) -> Self {
        self.location = Some(Location {
            line: 0,
            column: 0,
            field: field.into(),
        });
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

/// One record per executed pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassRecord {
    pub name: String,
    pub duration_ms: u64,
    /// Truncated snapshot of the pass input.
    pub input: Value,
    /// Truncated snapshot of the pass output.
    pub output: Value,
    /// Human-readable change notes.
    pub changes: Vec<String>,
}

/// Provenance of a compilation: engine version, input fingerprint, passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationTrace {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// SHA-256 of the raw document bytes.
    pub input_hash: String,
    pub passes: Vec<PassRecord>,
}

impl CompilationTrace {
    pub fn new() -> Self {
        Self {
            version: ENGINE_VERSION.to_string(),
            timestamp: Utc::now(),
            input_hash: String::new(),
            passes: Vec::new(),
        }
    }

    /// Look up a pass record by name.
    pub fn pass(&self, name: &str) -> Option<&PassRecord> {
        self.passes.iter().find(|p| p.name == name)
    }
}

impl Default for CompilationTrace {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Intermediate representation
// ---------------------------------------------------------------------------

/// Where a slot's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotSource {
    /// Written in the document.
    Original,
    /// Supplied by discovery or a type-mandated default.
    Discovered,
}

/// Breakdown section a slot is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Project,
    Stack,
    Human,
    /// Slots whose only source was project discovery.
    Discovery,
}

impl Section {
    /// Natural section of a dotted slot path (`project.*`, `human.*`, else stack).
    ///
    /// Never `Discovery`: discovered slots keep their real path and are
    /// assigned that section explicitly.
    pub fn of_path(path: &str) -> Self {
        match path.split('.').next() {
            Some("project") => Self::Project,
            Some("human") => Self::Human,
            _ => Self::Stack,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Stack => "stack",
            Self::Human => "human",
            Self::Discovery => "discovery",
        }
    }
}

/// One scoreable entry of the IR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    /// Dotted path, the natural key (e.g. `stack.hosting`).
    pub path: String,
    pub value: Value,
    pub value_type: String,
    pub source: SlotSource,
    pub weight: u32,
    pub filled: bool,
    pub section: Section,
}

/// The de-duplicated slot list built by the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntermediateRepresentation {
    pub version: String,
    pub slots: Vec<Slot>,
    pub metadata: Map<String, Value>,
}

impl IntermediateRepresentation {
    pub fn new() -> Self {
        Self {
            version: ENGINE_VERSION.to_string(),
            slots: Vec::new(),
            metadata: Map::new(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.slots.iter().any(|s| s.path == path)
    }

    pub fn get(&self, path: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.path == path)
    }

    /// Append a slot. Returns `false` (and drops the slot) when its path is
    /// already present.
    pub fn insert(&mut self, slot: Slot) -> bool {
        if self.contains(&slot.path) {
            return false;
        }
        self.slots.push(slot);
        true
    }
}

impl Default for IntermediateRepresentation {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Per-slot view inside a breakdown section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotInfo {
    pub id: String,
    pub path: String,
    pub value: Value,
    pub filled: bool,
    pub source: SlotSource,
    pub points: u32,
}

/// Fill ratio of one section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotSection {
    pub filled: usize,
    pub total: usize,
    pub percentage: u8,
    pub slots: Vec<SlotInfo>,
}

/// Section-by-section fill ratios.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionBreakdown {
    pub project: SlotSection,
    pub stack: SlotSection,
    pub human: SlotSection,
    pub discovery: SlotSection,
}

impl SectionBreakdown {
    pub fn section(&self, section: Section) -> &SlotSection {
        match section {
            Section::Project => &self.project,
            Section::Stack => &self.stack,
            Section::Human => &self.human,
            Section::Discovery => &self.discovery,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut SlotSection {
        match section {
            Section::Project => &mut self.project,
            Section::Stack => &mut self.stack,
            Section::Human => &mut self.human,
            Section::Discovery => &mut self.discovery,
        }
    }

    /// Sections in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &SlotSection)> {
        [
            Section::Project,
            Section::Stack,
            Section::Human,
            Section::Discovery,
        ]
        .into_iter()
        .map(|s| (s, self.section(s)))
    }
}

/// The sole output of a compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationResult {
    /// `round(100 * filled / total)`, 0..=100.
    pub score: u8,
    pub filled: usize,
    pub total: usize,
    pub breakdown: SectionBreakdown,
    pub trace: CompilationTrace,
    pub diagnostics: Vec<Diagnostic>,
    pub ir: IntermediateRepresentation,
    /// Short hash over `{score, filled, total, engine version}`.
    pub checksum: String,
}

impl CompilationResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn diagnostics_of(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }
}
