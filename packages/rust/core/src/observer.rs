//! Compile observers: the verbose per-slot stream as an injectable hook.

use faf_shared::{CompilationResult, PassRecord, Slot};
use tracing::debug;

/// Callback for reporting compilation progress.
///
/// Observers only ever see shared references and cannot change the result.
pub trait CompileObserver: Send + Sync {
    /// Called after each pass is recorded.
    fn pass_completed(&self, pass: &PassRecord);
    /// Called once the project type is known.
    fn type_detected(&self, detected: &str, resolved: &str);
    /// Called for every slot accepted into the IR.
    fn slot_added(&self, slot: &Slot);
    /// Called when a slot is rejected because its path is already present.
    fn duplicate_skipped(&self, path: &str);
    /// Called when the compilation completes.
    fn finished(&self, result: &CompilationResult);
}

/// No-op observer for headless/test usage.
pub struct SilentObserver;

impl CompileObserver for SilentObserver {
    fn pass_completed(&self, _pass: &PassRecord) {}
    fn type_detected(&self, _detected: &str, _resolved: &str) {}
    fn slot_added(&self, _slot: &Slot) {}
    fn duplicate_skipped(&self, _path: &str) {}
    fn finished(&self, _result: &CompilationResult) {}
}

/// Emits the per-slot trace as `debug` events.
pub struct TracingObserver;

impl CompileObserver for TracingObserver {
    fn pass_completed(&self, pass: &PassRecord) {
        debug!(
            pass = %pass.name,
            duration_ms = pass.duration_ms,
            changes = pass.changes.len(),
            "pass completed"
        );
    }

    fn type_detected(&self, detected: &str, resolved: &str) {
        debug!(detected, resolved, "project type detected");
    }

    fn slot_added(&self, slot: &Slot) {
        let mut value = slot.value.to_string();
        if value.len() > 50 {
            let mut cut = 50;
            while !value.is_char_boundary(cut) {
                cut -= 1;
            }
            value.truncate(cut);
        }
        debug!(
            path = %slot.path,
            filled = slot.filled,
            source = ?slot.source,
            %value,
            "slot added"
        );
    }

    fn duplicate_skipped(&self, path: &str) {
        debug!(path, "skipped duplicate slot");
    }

    fn finished(&self, result: &CompilationResult) {
        debug!(
            score = result.score,
            filled = result.filled,
            total = result.total,
            checksum = %result.checksum,
            "compilation finished"
        );
    }
}
