//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use faf_core::{CompileObserver, Compiler, TracingObserver};
use faf_shared::{
    AppConfig, CompilationResult, CompileOptions, PassRecord, Slot, init_config, load_config,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::render;

/// Environment variable that turns on the per-slot debug stream.
const DEBUG_ENV: &str = "FAF_DEBUG";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// faf: score how completely a `.faf` document describes its project.
#[derive(Parser)]
#[command(
    name = "faf",
    version,
    about = "Deterministic completeness scores for .faf project documents.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Fail instead of scoring an empty document when parsing fails.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Do not inspect the project directory.
    #[arg(long, global = true)]
    pub no_discovery: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Compile a document and print its score.
    Score {
        /// Document or directory to search from (defaults to the current directory).
        path: Option<PathBuf>,

        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Recompile a document and compare against a previously issued checksum.
    Verify {
        /// Document or directory.
        path: PathBuf,

        /// Expected checksum.
        checksum: String,
    },

    /// Show the pass-by-pass compilation trace.
    Trace {
        /// Document or directory (defaults to the current directory).
        path: Option<PathBuf>,

        /// Print the trace as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the intermediate representation as JSON.
    Ir {
        /// Document or directory (defaults to the current directory).
        path: Option<PathBuf>,
    },

    /// List the known project types and the slot categories they count.
    Types,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

fn debug_stream_requested(cli: &Cli) -> bool {
    cli.verbose > 0 || std::env::var_os(DEBUG_ENV).is_some()
}

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 if debug_stream_requested(cli) => "faf=debug",
        0 => "faf=warn",
        1 => "faf=debug",
        _ => "faf=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let debug = debug_stream_requested(&cli);
    let flags = Flags {
        strict: cli.strict,
        no_discovery: cli.no_discovery,
        debug,
    };

    match cli.command {
        Command::Score { path, json } => cmd_score(path.as_deref(), json, &flags).await,
        Command::Verify { path, checksum } => cmd_verify(&path, &checksum, &flags).await,
        Command::Trace { path, json } => cmd_trace(path.as_deref(), json, &flags).await,
        Command::Ir { path } => cmd_ir(path.as_deref(), &flags).await,
        Command::Types => cmd_types(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Global flags that shape compile options.
struct Flags {
    strict: bool,
    no_discovery: bool,
    debug: bool,
}

/// Config file values overridden by CLI flags.
fn compile_options(config: &AppConfig, flags: &Flags) -> CompileOptions {
    let mut options = CompileOptions::from(config);
    if flags.strict {
        options.strict_parse = true;
    }
    if flags.no_discovery {
        options.discovery = false;
    }
    options
}

/// Accept a document path or a directory to search upward from.
fn resolve_document(path: Option<&Path>) -> Result<PathBuf> {
    let start = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()
            .map_err(|e| eyre!("cannot determine working directory: {e}"))?,
    };

    if start.is_file() {
        return Ok(start);
    }
    if !faf_discovery::exists(&start) {
        return Err(eyre!("'{}' does not exist", start.display()));
    }
    faf_discovery::find_nearest(&start)
        .ok_or_else(|| eyre!("no .faf document found in '{}' or its parents", start.display()))
}

/// Compile with the spinner attached, printing diagnostics on fatal failure.
async fn compile(path: Option<&Path>, flags: &Flags) -> Result<(PathBuf, CompilationResult)> {
    let document = resolve_document(path)?;
    let config = load_config()?;
    let options = compile_options(&config, flags);

    info!(path = %document.display(), strict = options.strict_parse, discovery = options.discovery, "compiling");

    let progress = Arc::new(CliProgress::new(flags.debug));
    let compiler = Compiler::new(options).with_observer(progress.clone());
    let outcome = compiler.compile(&document).await;
    progress.clear();

    match outcome {
        Ok(result) => Ok((document, result)),
        Err(e) => {
            if !e.diagnostics().is_empty() {
                eprint!("{}", render::diagnostics(e.diagnostics()));
            }
            Err(e.into())
        }
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_score(path: Option<&Path>, json: bool, flags: &Flags) -> Result<()> {
    let (document, result) = compile(path, flags).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::report(&document, &result));
    }
    Ok(())
}

async fn cmd_verify(path: &Path, expected: &str, flags: &Flags) -> Result<()> {
    let (document, result) = compile(Some(path), flags).await?;
    let expected = expected.trim();

    if result.checksum == expected {
        println!(
            "  ✓ {} verified: {}% ({}/{}) checksum {}",
            document.display(),
            result.score,
            result.filled,
            result.total,
            result.checksum
        );
        Ok(())
    } else {
        Err(eyre!(
            "checksum mismatch for {}: expected {expected}, got {} (score {}%)",
            document.display(),
            result.checksum,
            result.score
        ))
    }
}

async fn cmd_trace(path: Option<&Path>, json: bool, flags: &Flags) -> Result<()> {
    let (_, result) = compile(path, flags).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result.trace)?);
    } else {
        print!("{}", render::trace(&result));
    }
    Ok(())
}

async fn cmd_ir(path: Option<&Path>, flags: &Flags) -> Result<()> {
    let (_, result) = compile(path, flags).await?;
    println!("{}", serde_json::to_string_pretty(&result.ir)?);
    Ok(())
}

fn cmd_types() -> Result<()> {
    print!("{}", render::types());
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress observer
// ---------------------------------------------------------------------------

/// Spinner driven by compiler events, optionally mirrored to the debug log.
struct CliProgress {
    spinner: ProgressBar,
    debug: Option<TracingObserver>,
}

impl CliProgress {
    fn new(debug: bool) -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self {
            spinner,
            debug: debug.then_some(TracingObserver),
        }
    }

    fn clear(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl CompileObserver for CliProgress {
    fn pass_completed(&self, pass: &PassRecord) {
        self.spinner.set_message(format!("Compiled pass: {}", pass.name));
        if let Some(debug) = &self.debug {
            debug.pass_completed(pass);
        }
    }

    fn type_detected(&self, detected: &str, resolved: &str) {
        self.spinner.set_message(format!("Scoring as {resolved}"));
        if let Some(debug) = &self.debug {
            debug.type_detected(detected, resolved);
        }
    }

    fn slot_added(&self, slot: &Slot) {
        if let Some(debug) = &self.debug {
            debug.slot_added(slot);
        }
    }

    fn duplicate_skipped(&self, path: &str) {
        if let Some(debug) = &self.debug {
            debug.duplicate_skipped(path);
        }
    }

    fn finished(&self, result: &CompilationResult) {
        self.spinner.finish_and_clear();
        if let Some(debug) = &self.debug {
            debug.finished(result);
        }
    }
}
