//! Application configuration for the faf scoring engine.
//!
//! User config lives at `~/.faf/faf.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FafError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "faf.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".faf";

// ---------------------------------------------------------------------------
// Config structs (matching faf.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Compiler behaviour.
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Project discovery bounds.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Scoring tweaks.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// `[compiler]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Abort with an error when the document cannot be parsed into a mapping.
    #[serde(default)]
    pub strict_parse: bool,

    /// Serialized size above which a pass snapshot is replaced by a stub.
    #[serde(default = "default_snapshot_limit")]
    pub trace_snapshot_limit: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            strict_parse: false,
            trace_snapshot_limit: default_snapshot_limit(),
        }
    }
}

fn default_snapshot_limit() -> usize {
    1000
}

/// `[discovery]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Whether to inspect the project directory at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum directory depth of the file census.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum directory entries visited by the file census.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_depth: default_max_depth(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_max_depth() -> usize {
    2
}
fn default_max_entries() -> usize {
    512
}

/// `[scoring]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Phrases treated as unfilled in addition to the built-in filler list.
    #[serde(default)]
    pub extra_filler_phrases: Vec<String>,
}

// ---------------------------------------------------------------------------
// Compile options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime compile options, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Abort on unparsable documents instead of scoring an empty tree.
    pub strict_parse: bool,
    /// Trace snapshot size limit.
    pub trace_snapshot_limit: usize,
    /// Run project discovery.
    pub discovery: bool,
    /// File census depth bound.
    pub max_depth: usize,
    /// File census entry bound.
    pub max_entries: usize,
    /// Additional filler phrases.
    pub extra_filler_phrases: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CompileOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            strict_parse: config.compiler.strict_parse,
            trace_snapshot_limit: config.compiler.trace_snapshot_limit,
            discovery: config.discovery.enabled,
            max_depth: config.discovery.max_depth,
            max_entries: config.discovery.max_entries,
            extra_filler_phrases: config.scoring.extra_filler_phrases.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.faf/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| FafError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.faf/faf.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FafError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| FafError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| FafError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content = toml::to_string_pretty(&config).map_err(|e| FafError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FafError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
