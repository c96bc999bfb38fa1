//! Per-compilation accumulator for the trace and the diagnostics list.

use std::time::Instant;

use faf_shared::{CompilationTrace, Diagnostic, PassRecord};
use serde::Serialize;
use serde_json::{Value, json};

use crate::observer::CompileObserver;

/// Owns the trace and diagnostics of exactly one compilation.
pub(crate) struct Recorder<'a> {
    trace: CompilationTrace,
    diagnostics: Vec<Diagnostic>,
    snapshot_limit: usize,
    observer: &'a dyn CompileObserver,
}

impl<'a> Recorder<'a> {
    pub(crate) fn new(snapshot_limit: usize, observer: &'a dyn CompileObserver) -> Self {
        Self {
            trace: CompilationTrace::new(),
            diagnostics: Vec::new(),
            snapshot_limit,
            observer,
        }
    }

    pub(crate) fn observer(&self) -> &'a dyn CompileObserver {
        self.observer
    }

    pub(crate) fn set_input_hash(&mut self, hash: String) {
        self.trace.input_hash = hash;
    }

    pub(crate) fn diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Append a pass record with size-limited snapshots of its input and output.
    pub(crate) fn record<I, O>(
        &mut self,
        name: &str,
        started: Instant,
        input: &I,
        output: &O,
        changes: Vec<String>,
    ) where
        I: Serialize + ?Sized,
        O: Serialize + ?Sized,
    {
        let record = PassRecord {
            name: name.to_string(),
            duration_ms: started.elapsed().as_millis() as u64,
            input: snapshot(input, self.snapshot_limit),
            output: snapshot(output, self.snapshot_limit),
            changes,
        };
        self.observer.pass_completed(&record);
        self.trace.passes.push(record);
    }

    pub(crate) fn finish(self) -> (CompilationTrace, Vec<Diagnostic>) {
        (self.trace, self.diagnostics)
    }
}

/// Serialize `data`, replacing it with a size stub when the JSON text exceeds `limit`.
pub(crate) fn snapshot<T: Serialize + ?Sized>(data: &T, limit: usize) -> Value {
    let Ok(value) = serde_json::to_value(data) else {
        return Value::Null;
    };
    let size = value.to_string().len();
    if size > limit {
        json!({ "_truncated": true, "size": size })
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::SilentObserver;

    #[test]
    fn small_snapshots_are_kept() {
        assert_eq!(snapshot(&json!({"a": 1}), 100), json!({"a": 1}));
        assert_eq!(snapshot("text", 100), json!("text"));
    }

    #[test]
    fn large_snapshots_are_truncated() {
        let big = "x".repeat(2000);
        let snap = snapshot(&big, 1000);
        assert_eq!(snap["_truncated"], json!(true));
        assert_eq!(snap["size"], json!(2002));
    }

    #[test]
    fn records_passes_in_order() {
        let observer = SilentObserver;
        let mut rec = Recorder::new(1000, &observer);
        rec.record("read", Instant::now(), "a.faf", &3, vec!["Read 3 bytes".into()]);
        rec.record("parse", Instant::now(), &3, &json!({}), Vec::new());
        rec.diagnostic(Diagnostic::warning("w"));

        let (trace, diagnostics) = rec.finish();
        let names: Vec<_> = trace.passes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["read", "parse"]);
        assert_eq!(trace.pass("read").map(|p| p.changes.len()), Some(1));
        assert_eq!(diagnostics.len(), 1);
    }
}
