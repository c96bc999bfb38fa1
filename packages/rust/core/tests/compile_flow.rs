//! End-to-end compilation over the `.faf` fixtures.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use faf_core::{CompileObserver, Compiler, SilentObserver};
use faf_discovery::{PartialContext, ProjectInspector};
use faf_shared::{
    CompilationResult, CompileOptions, FafError, PassRecord, Section, Severity, Slot, SlotSource,
    percentage,
};
use serde_json::json;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures/faf")
        .join(name)
}

/// Copy a fixture into an otherwise empty directory so discovery sees nothing else.
fn staged(name: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("project.faf");
    std::fs::copy(fixture(name), &target).expect("copy fixture");
    (dir, target)
}

struct StubInspector(PartialContext);

impl ProjectInspector for StubInspector {
    fn inspect(&self, _dir: &Path) -> faf_shared::Result<PartialContext> {
        Ok(self.0.clone())
    }

    fn is_subsite(&self, _dir: &Path) -> bool {
        false
    }
}

fn offline() -> Compiler {
    Compiler::new(CompileOptions {
        discovery: false,
        ..Default::default()
    })
}

fn with_facts(ctx: PartialContext) -> Compiler {
    Compiler::default().with_inspector(Arc::new(StubInspector(ctx)))
}

fn slot<'a>(result: &'a CompilationResult, path: &str) -> &'a Slot {
    result
        .ir
        .get(path)
        .unwrap_or_else(|| panic!("missing slot {path}"))
}

#[tokio::test]
async fn complete_cli_document_scores_100() {
    let (_dir, path) = staged("cli-complete.faf");
    let result = offline().compile(&path).await.expect("compile");

    assert_eq!(result.total, 9);
    assert_eq!(result.filled, 9);
    assert_eq!(result.score, 100);
    assert_eq!(result.breakdown.project.percentage, 100);
    assert_eq!(result.breakdown.human.percentage, 100);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.ir.metadata["declared_type"], json!("cli-tool"));
}

#[tokio::test]
async fn command_line_wording_is_not_an_extension() {
    let (_dir, path) = staged("command-line.faf");
    let compiler = with_facts(PartialContext {
        framework: Some("Chrome Extension".into()),
        ..Default::default()
    });
    let result = compiler.compile(&path).await.expect("compile");

    assert_eq!(result.ir.metadata["project_type"], json!("cli-tool"));
    assert_eq!(result.total, 9);
    // name, goal and human.what
    assert_eq!(result.filled, 3);
    assert_eq!(result.score, 33);
}

#[tokio::test]
async fn sentinel_and_absence_classify_identically() {
    let (_a, none) = staged("hosting-none.faf");
    let (_b, absent) = staged("hosting-absent.faf");
    let compiler = offline();

    let with_none = compiler.compile(&none).await.expect("compile");
    let without = compiler.compile(&absent).await.expect("compile");

    assert!(!slot(&with_none, "stack.hosting").filled);
    assert!(!slot(&without, "stack.hosting").filled);
    assert_eq!(with_none.score, without.score);
    assert_eq!(with_none.checksum, without.checksum);
    assert_eq!(with_none.score, 25);

    let optimize = with_none.trace.pass("optimize").expect("optimize pass");
    assert!(
        optimize
            .changes
            .contains(&"Removed default value at stack.hosting".to_string())
    );
}

#[tokio::test]
async fn verify_detects_content_drift() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("project.faf");
    let compiler = offline();

    std::fs::write(&path, "project:\n  name: \"\"\n  goal: Track habits\n").expect("write");
    let stale = compiler.compile(&path).await.expect("compile").checksum;
    assert!(compiler.verify(&path, &stale).await.expect("verify"));

    std::fs::write(&path, "project:\n  name: habit\n  goal: Track habits\n").expect("write");
    assert!(!compiler.verify(&path, &stale).await.expect("verify"));

    let fresh = compiler.compile(&path).await.expect("compile").checksum;
    assert_ne!(fresh, stale);
    assert!(compiler.verify(&path, &fresh).await.expect("verify"));
}

#[tokio::test]
async fn compilation_is_deterministic() {
    let (_dir, path) = staged("legacy.faf");
    let compiler = offline();
    let first = compiler.compile(&path).await.expect("compile");
    let second = compiler.compile(&path).await.expect("compile");

    assert_eq!(
        (first.score, first.filled, first.total, &first.checksum),
        (second.score, second.filled, second.total, &second.checksum)
    );
    assert_eq!(first.trace.input_hash, second.trace.input_hash);
}

#[tokio::test]
async fn legacy_document_degrades_to_diagnostics() {
    let (_dir, path) = staged("legacy.faf");
    let result = offline().compile(&path).await.expect("compile");

    assert_eq!(result.ir.metadata["project_type"], json!("fullstack"));
    assert_eq!(result.total, 19);
    assert_eq!(result.filled, 5);
    assert_eq!(result.score, 26);
    assert!(!result.ir.contains("stack.cicd"));
    assert!(!result.ir.contains("human.when"));
    assert!(!slot(&result, "project.goal").filled);

    assert!(result.has_errors());
    assert_eq!(result.diagnostics_of(Severity::Error).count(), 2);
    assert_eq!(result.diagnostics_of(Severity::Warning).count(), 2);
    assert!(
        result
            .diagnostics
            .iter()
            .any(|d| d.message == "Embedded ai_score is deprecated and will be ignored")
    );
}

#[tokio::test]
async fn n8n_alias_gets_workflow_defaults() {
    let (_dir, path) = staged("n8n-workflow.faf");
    let result = offline().compile(&path).await.expect("compile");

    assert_eq!(result.ir.metadata["resolved_type"], json!("n8n-workflow"));
    assert_eq!(result.total, 14);
    assert_eq!(result.filled, 8);
    assert_eq!(result.score, 57);

    let runtime = slot(&result, "stack.runtime");
    assert_eq!(runtime.value, json!("n8n 1.x"));
    assert_eq!(runtime.source, SlotSource::Discovered);
    assert_eq!(slot(&result, "stack.database").value, json!("Pinecone"));
    assert!(!slot(&result, "stack.connection").filled);
}

#[tokio::test]
async fn discovery_fills_gaps_without_overriding() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("package.json"), r#"{ "name": "shop" }"#).expect("write");
    let path = dir.path().join("project.faf");
    std::fs::write(&path, "project:\n  goal: Online shop\n  main_language: Go\n").expect("write");

    let result = Compiler::default().compile(&path).await.expect("compile");

    let name = slot(&result, "project.name");
    assert_eq!(name.value, json!("shop"));
    assert_eq!(name.section, Section::Discovery);
    assert!(name.filled);

    let language = slot(&result, "project.main_language");
    assert_eq!(language.value, json!("Go"));
    assert_eq!(language.source, SlotSource::Original);

    assert_eq!(result.breakdown.discovery.total, 1);
    assert_eq!(result.breakdown.project.total, 2);
}

#[tokio::test]
async fn discovery_disabled_adds_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("package.json"), r#"{ "name": "shop" }"#).expect("write");
    let path = dir.path().join("project.faf");
    std::fs::write(&path, "project:\n  goal: Online shop\n").expect("write");

    let result = offline().compile(&path).await.expect("compile");
    assert!(!slot(&result, "project.name").filled);
    assert_eq!(result.breakdown.discovery.total, 0);
}

#[tokio::test]
async fn slot_ignore_applies_to_every_type() {
    let compiler = offline();
    for def in faf_registry::project_types() {
        let source = format!(
            "project:\n  type: {}\n  name: x\nslot_ignore: [name, hosting, frontend, database, who]\n",
            def.id
        );
        let result = compiler.compile_source(&source, None).await.expect("compile");
        for ignored in [
            "project.name",
            "stack.hosting",
            "stack.frontend",
            "stack.database",
            "human.who",
        ] {
            assert!(!result.ir.contains(ignored), "{} kept {ignored}", def.id);
        }
        assert!(result.score <= 100);
        assert_eq!(result.score, percentage(result.filled, result.total));
    }
}

#[tokio::test]
async fn ir_never_holds_duplicate_paths() {
    let compiler = with_facts(PartialContext {
        project_name: Some("discovered".into()),
        framework: Some("React".into()),
        ..Default::default()
    });
    let dir = tempfile::tempdir().expect("tempdir");
    let result = compiler
        .compile_source(
            "project:\n  type: static-html\n  name: site\nstack:\n  frontend: Astro\n",
            Some(dir.path()),
        )
        .await
        .expect("compile");

    let mut paths: Vec<_> = result.ir.slots.iter().map(|s| s.path.clone()).collect();
    let before = paths.len();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), before);
    assert_eq!(before, result.total);

    // Explicit values beat both the static-site default and discovery.
    let frontend = slot(&result, "stack.frontend");
    assert_eq!(frontend.value, json!("Astro"));
    assert_eq!(frontend.source, SlotSource::Original);
    assert_eq!(slot(&result, "project.name").value, json!("site"));
    assert_eq!(result.breakdown.discovery.total, 0);
}

#[tokio::test]
async fn strict_mode_fails_unparsable_documents() {
    let strict = Compiler::new(CompileOptions {
        strict_parse: true,
        discovery: false,
        ..Default::default()
    });
    let err = strict
        .compile_source("project: [unclosed", None)
        .await
        .expect_err("strict");
    assert!(matches!(err, FafError::Compile { .. }));
    assert_eq!(err.diagnostics()[0].severity, Severity::Error);

    let lenient = offline()
        .compile_source("project: [unclosed", None)
        .await
        .expect("lenient");
    assert!(lenient.has_errors());
    assert_eq!(lenient.filled, 0);
}

#[tokio::test]
async fn large_snapshots_are_truncated() {
    let compiler = Compiler::new(CompileOptions {
        discovery: false,
        trace_snapshot_limit: 40,
        ..Default::default()
    });
    let result = compiler
        .compile_source(
            "project:\n  name: a-name-long-enough-to-exceed-the-limit\n",
            None,
        )
        .await
        .expect("compile");
    let analyze = result.trace.pass("analyze").expect("analyze pass");
    assert_eq!(analyze.output["_truncated"], json!(true));
}

#[tokio::test]
async fn extra_filler_phrases_come_from_options() {
    let compiler = Compiler::new(CompileOptions {
        discovery: false,
        extra_filler_phrases: vec!["TBD".into()],
        ..Default::default()
    });
    let result = compiler
        .compile_source("project:\n  name: TBD\n", None)
        .await
        .expect("compile");
    assert!(!slot(&result, "project.name").filled);
}

#[derive(Default)]
struct Recording {
    events: Mutex<Vec<String>>,
}

impl CompileObserver for Recording {
    fn pass_completed(&self, pass: &PassRecord) {
        self.push(format!("pass:{}", pass.name));
    }
    fn type_detected(&self, _detected: &str, resolved: &str) {
        self.push(format!("type:{resolved}"));
    }
    fn slot_added(&self, slot: &Slot) {
        self.push(format!("slot:{}", slot.path));
    }
    fn duplicate_skipped(&self, path: &str) {
        self.push(format!("dup:{path}"));
    }
    fn finished(&self, _result: &CompilationResult) {
        self.push("finished".into());
    }
}

impl Recording {
    fn push(&self, event: String) {
        self.events.lock().expect("lock").push(event);
    }
}

#[tokio::test]
async fn observers_see_events_but_not_results() {
    let source = "project:\n  type: chrome-extension\n  name: tabs\n";
    let recording = Arc::new(Recording::default());
    let observed = offline()
        .with_observer(recording.clone())
        .compile_source(source, None)
        .await
        .expect("compile");
    let silent = offline()
        .with_observer(Arc::new(SilentObserver))
        .compile_source(source, None)
        .await
        .expect("compile");

    assert_eq!(observed.checksum, silent.checksum);

    let events = recording.events.lock().expect("lock").clone();
    assert_eq!(events.first().map(String::as_str), Some("pass:read"));
    assert_eq!(events.last().map(String::as_str), Some("finished"));
    assert!(events.contains(&"type:chrome-extension".to_string()));
    assert_eq!(events.iter().filter(|e| e.starts_with("slot:")).count(), 9);
}

#[tokio::test]
async fn keyword_detection_matches_inside_words() {
    let compiler = offline();

    let result = compiler
        .compile_source("project:\n  goal: A clipboard manager\n", None)
        .await
        .expect("compile");
    assert_eq!(result.ir.metadata["project_type"], json!("cli-tool"));
    assert_eq!(result.total, 9);

    for goal in ["Rapid prototyping kit", "Therapist booking app"] {
        let source = format!("project:\n  goal: {goal}\n");
        let result = compiler.compile_source(&source, None).await.expect("compile");
        assert_eq!(result.ir.metadata["project_type"], json!("backend-api"), "{goal}");
        assert_eq!(result.total, 17, "{goal}");
    }
}

#[tokio::test]
async fn declared_types_resolve_exactly() {
    let compiler = offline();

    for declared in ["React", "CLI"] {
        let source = format!("project:\n  type: {declared}\n  name: demo\n");
        let result = compiler.compile_source(&source, None).await.expect("compile");
        assert_eq!(result.ir.metadata["resolved_type"], json!("generic"), "{declared}");
        assert_eq!(result.total, 12, "{declared}");
    }

    let result = compiler
        .compile_source("project:\n  type: react\n  name: demo\n", None)
        .await
        .expect("compile");
    assert_eq!(result.ir.metadata["resolved_type"], json!("react"));
    assert_eq!(result.total, 16);
}
