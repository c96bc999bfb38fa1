//! Shared types, error model, and configuration for the faf scoring engine.
//!
//! This crate is the foundation depended on by all other faf crates.
//! It provides:
//! - [`FafError`]: the unified error type
//! - Result types ([`CompilationResult`], [`IntermediateRepresentation`], [`Diagnostic`])
//! - Configuration ([`AppConfig`], [`CompileOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CompileOptions, CompilerConfig, DiscoveryConfig, ScoringConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{FafError, Result};
pub use types::{
    CompilationResult, CompilationTrace, Diagnostic, ENGINE_VERSION, IntermediateRepresentation,
    Location, PassRecord, Section, SectionBreakdown, Severity, Slot, SlotInfo, SlotSection,
    SlotSource, percentage,
};
