//! Plain-text reports printed by the CLI commands.

use std::fmt::Write;
use std::path::Path;

use faf_shared::{CompilationResult, Diagnostic, Severity};
use serde_json::Value;

/// Longest value shown in a slot listing.
const VALUE_WIDTH: usize = 40;

/// Score summary, per-section table, slot listing and diagnostics.
pub(crate) fn report(document: &Path, result: &CompilationResult) -> String {
    let mut out = String::new();
    let meta = &result.ir.metadata;
    let resolved = meta.get("resolved_type").and_then(Value::as_str).unwrap_or("generic");
    let detected = meta.get("project_type").and_then(Value::as_str).unwrap_or(resolved);

    let _ = writeln!(out);
    let _ = writeln!(out, "  Document: {}", document.display());
    let _ = writeln!(
        out,
        "  Score:    {}% ({}/{} slots)",
        result.score, result.filled, result.total
    );
    if detected == resolved {
        let _ = writeln!(out, "  Type:     {resolved}");
    } else {
        let _ = writeln!(out, "  Type:     {resolved} (detected as {detected})");
    }
    let _ = writeln!(out, "  Checksum: {}", result.checksum);
    let _ = writeln!(out);

    let _ = writeln!(out, "  {:<10} {:>6} {:>5}", "Section", "Filled", "%");
    for (section, stats) in result.breakdown.iter() {
        if stats.total == 0 {
            continue;
        }
        let _ = writeln!(
            out,
            "  {:<10} {:>6} {:>4}%",
            section.as_str(),
            format!("{}/{}", stats.filled, stats.total),
            stats.percentage
        );
    }
    let _ = writeln!(out);

    for slot in &result.ir.slots {
        let mark = if slot.filled { "✓" } else { "✗" };
        let value = if slot.filled {
            truncate(&display_value(&slot.value), VALUE_WIDTH)
        } else {
            String::new()
        };
        let origin = match (slot.filled, slot.source) {
            (true, faf_shared::SlotSource::Discovered) => " (discovered)",
            _ => "",
        };
        let _ = writeln!(out, "  {mark} {:<28} {value}{origin}", slot.path);
    }

    if !result.diagnostics.is_empty() {
        let _ = writeln!(out);
        out.push_str(&diagnostics(&result.diagnostics));
    }
    out
}

/// Diagnostics grouped by severity, errors first.
pub(crate) fn diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for severity in [Severity::Error, Severity::Warning, Severity::Info] {
        let group: Vec<&Diagnostic> = diagnostics.iter().filter(|d| d.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  {} ({}):", heading(severity), group.len());
        for d in group {
            match &d.location {
                Some(loc) => {
                    let _ = writeln!(out, "    - {} [{}]", d.message, loc.field);
                }
                None => {
                    let _ = writeln!(out, "    - {}", d.message);
                }
            }
            if let Some(suggestion) = &d.suggestion {
                let _ = writeln!(out, "      hint: {suggestion}");
            }
        }
    }
    out
}

/// Pass-by-pass trace with durations and change notes.
pub(crate) fn trace(result: &CompilationResult) -> String {
    let mut out = String::new();
    let trace = &result.trace;
    let _ = writeln!(out);
    let _ = writeln!(out, "  Engine:     {}", trace.version);
    let _ = writeln!(out, "  Started:    {}", trace.timestamp.to_rfc3339());
    let _ = writeln!(out, "  Input hash: {}", trace.input_hash);
    let _ = writeln!(out);

    for (i, pass) in trace.passes.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} ({} ms)", i + 1, pass.name, pass.duration_ms);
        for change in &pass.changes {
            let _ = writeln!(out, "       {change}");
        }
    }
    let total: u64 = trace.passes.iter().map(|p| p.duration_ms).sum();
    let _ = writeln!(out);
    let _ = writeln!(out, "  Total: {total} ms, score {}%", result.score);
    out
}

/// Known project types with the categories they count.
pub(crate) fn types() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {:<22} {:<40} {}", "Type", "Categories", "Aliases");
    for def in faf_registry::project_types() {
        let categories: Vec<&str> = def.categories.iter().map(|c| c.as_str()).collect();
        let slots = faf_registry::active_slots_for(def.id).len();
        let _ = writeln!(
            out,
            "  {:<22} {:<40} {}",
            def.id,
            format!("{} ({slots})", categories.join(", ")),
            def.aliases.join(", ")
        );
    }
    out
}

fn heading(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "Errors",
        Severity::Warning => "Warnings",
        Severity::Info => "Info",
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Cut to `max` chars on a char boundary, marking the cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use faf_core::Compiler;
    use faf_shared::CompileOptions;

    async fn compiled(source: &str) -> CompilationResult {
        Compiler::new(CompileOptions {
            discovery: false,
            ..Default::default()
        })
        .compile_source(source, None)
        .await
        .expect("compile")
    }

    #[tokio::test]
    async fn report_shows_score_and_slot_marks() {
        let result = compiled(
            "project:\n  name: demo\n  goal: a command line tool\n  main_language: Rust\n",
        )
        .await;
        let text = report(Path::new("project.faf"), &result);

        assert!(text.contains(&format!("Score:    {}%", result.score)));
        assert!(text.contains(&result.checksum));
        assert!(text.contains("✓ project.name"));
        assert!(text.contains("✗ human.who"));
        assert!(text.contains("Type:     cli (detected as cli-tool)"));
    }

    #[tokio::test]
    async fn report_lists_diagnostics_by_severity() {
        let result = compiled("ai_score: 90\nproject:\n  name: 12\n").await;
        let text = report(Path::new("project.faf"), &result);

        let errors = text.find("Errors (1):").expect("errors heading");
        let warnings = text.find("Warnings (1):").expect("warnings heading");
        assert!(errors < warnings);
        assert!(text.contains("[project.name]"));
        assert!(text.contains("hint:"));
    }

    #[tokio::test]
    async fn trace_lists_passes_in_order() {
        let result = compiled("project:\n  name: demo\n").await;
        let text = trace(&result);

        let positions: Vec<usize> = ["read", "parse", "analyze", "optimize", "generate"]
            .iter()
            .map(|name| text.find(&format!(". {name} (")).expect("pass listed"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains(&result.trace.input_hash));
    }

    #[test]
    fn types_table_includes_generic() {
        let text = types();
        assert!(text.contains("generic"));
        assert!(text.contains("cli-tool"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn grouped_diagnostics_skip_empty_groups() {
        let text = diagnostics(&[Diagnostic::info("Added missing stack section")]);
        assert!(text.starts_with("  Info (1):"));
        assert!(!text.contains("Errors"));
    }
}
