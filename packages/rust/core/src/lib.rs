//! Deterministic scoring compiler for `.faf` project documents.
//!
//! A compilation runs four ordered passes over one document:
//! - **parse**: YAML text into an untyped tree, fingerprinted for the trace
//! - **analyze**: structural defaults and field type checks
//! - **optimize**: best-effort project discovery and default stripping
//! - **generate**: type detection, slot selection, IR, score and checksum
//!
//! Irregular input degrades to diagnostics; only an unreadable document (or
//! an unparsable one in strict mode) fails the compilation.

mod analyzer;
mod compiler;
mod defaults;
mod detect;
mod fill;
mod generator;
mod observer;
mod optimizer;
mod parser;
mod trace;

use std::path::Path;

use faf_shared::{CompilationResult, Result};

pub use compiler::Compiler;
pub use defaults::type_defaults;
pub use detect::{DetectedType, detect_type};
pub use fill::{EMPTY_MARKERS, FILLER_PHRASES, FillClassifier};
pub use generator::checksum;
pub use observer::{CompileObserver, SilentObserver, TracingObserver};
pub use optimizer::{DEFAULT_SENTINELS, DISCOVERED_KEY, strip_defaults};
pub use parser::fingerprint;

/// Compile the document at `path` with default options.
pub async fn compile(path: &Path) -> Result<CompilationResult> {
    Compiler::default().compile(path).await
}

/// Recompile `path` with default options and compare checksums.
pub async fn verify(path: &Path, checksum: &str) -> Result<bool> {
    Compiler::default().verify(path, checksum).await
}
