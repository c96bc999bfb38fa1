//! The compiler: read → parse → analyze → optimize → generate.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use faf_discovery::{FsInspector, InspectorOptions, NoopInspector, ProjectInspector};
use faf_shared::{
    CompilationResult, CompileOptions, Diagnostic, FafError, IntermediateRepresentation, Result,
};
use tracing::{info, instrument};

use crate::fill::FillClassifier;
use crate::observer::{CompileObserver, SilentObserver};
use crate::trace::Recorder;
use crate::{analyzer, generator, optimizer, parser};

/// Deterministic document compiler.
///
/// Holds no per-compilation state; every call builds its own trace,
/// diagnostics and IR, so one compiler may serve concurrent compilations.
#[derive(Clone)]
pub struct Compiler {
    options: CompileOptions,
    inspector: Arc<dyn ProjectInspector>,
    observer: Arc<dyn CompileObserver>,
    fill: FillClassifier,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

impl Compiler {
    /// Compiler with a filesystem inspector (or none when discovery is disabled).
    pub fn new(options: CompileOptions) -> Self {
        let inspector: Arc<dyn ProjectInspector> = if options.discovery {
            Arc::new(FsInspector::new(InspectorOptions {
                max_depth: options.max_depth,
                max_entries: options.max_entries,
            }))
        } else {
            Arc::new(NoopInspector)
        };
        let fill = FillClassifier::new(options.extra_filler_phrases.clone());
        Self {
            options,
            inspector,
            observer: Arc::new(SilentObserver),
            fill,
        }
    }

    /// Replace the project inspector.
    pub fn with_inspector(mut self, inspector: Arc<dyn ProjectInspector>) -> Self {
        self.inspector = inspector;
        self
    }

    /// Replace the progress observer.
    pub fn with_observer(mut self, observer: Arc<dyn CompileObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile the document at `path`. Discovery inspects its directory.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn compile(&self, path: &Path) -> Result<CompilationResult> {
        let mut rec = Recorder::new(self.options.trace_snapshot_limit, self.observer.as_ref());
        let started = Instant::now();

        let source = match tokio::fs::read_to_string(path).await {
            Ok(source) => source,
            Err(e) => {
                rec.diagnostic(
                    Diagnostic::error(format!("Cannot read file: {}", path.display()))
                        .with_suggestion(e.to_string()),
                );
                return Err(FafError::Compile {
                    message: format!("cannot read {}: {e}", path.display()),
                    diagnostics: rec.finish().1,
                });
            }
        };

        rec.record(
            "read",
            started,
            &path.display().to_string(),
            &source.len(),
            vec![format!("Read {} bytes from {}", source.len(), path.display())],
        );

        let base_dir = project_dir(path);
        self.run(&source, Some(&base_dir), rec).await
    }

    /// Compile in-memory text. Discovery runs against `base_dir` when given.
    #[instrument(skip_all, fields(bytes = source.len()))]
    pub async fn compile_source(
        &self,
        source: &str,
        base_dir: Option<&Path>,
    ) -> Result<CompilationResult> {
        let mut rec = Recorder::new(self.options.trace_snapshot_limit, self.observer.as_ref());
        rec.record(
            "read",
            Instant::now(),
            "<memory>",
            &source.len(),
            vec![format!("Received {} bytes in memory", source.len())],
        );
        self.run(source, base_dir, rec).await
    }

    /// Recompile `path` and compare against a previously issued checksum.
    pub async fn verify(&self, path: &Path, checksum: &str) -> Result<bool> {
        let result = self.compile(path).await?;
        Ok(result.checksum == checksum.trim())
    }

    /// Compile `path` and return only its intermediate representation.
    pub async fn get_ir(&self, path: &Path) -> Result<IntermediateRepresentation> {
        Ok(self.compile(path).await?.ir)
    }

    async fn run(
        &self,
        source: &str,
        base_dir: Option<&Path>,
        mut rec: Recorder<'_>,
    ) -> Result<CompilationResult> {
        rec.set_input_hash(parser::fingerprint(source));

        let tree = parser::parse(source, self.options.strict_parse, &mut rec)?;
        let tree = analyzer::analyze(tree, &mut rec);
        let tree = optimizer::optimize(tree, base_dir, self.inspector.clone(), &mut rec).await;
        let generated = generator::generate(&tree, &self.fill, &mut rec);

        let checksum = generator::checksum(generated.score, generated.filled, generated.total);
        let (trace, diagnostics) = rec.finish();

        let result = CompilationResult {
            score: generated.score,
            filled: generated.filled,
            total: generated.total,
            breakdown: generated.breakdown,
            trace,
            diagnostics,
            ir: generated.ir,
            checksum,
        };

        info!(
            score = result.score,
            filled = result.filled,
            total = result.total,
            checksum = %result.checksum,
            diagnostics = result.diagnostics.len(),
            "compiled"
        );
        self.observer.finished(&result);
        Ok(result)
    }
}

/// Directory discovery inspects for a document path.
fn project_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
