//! Analyze pass: structural defaults and field type checks.

use std::time::Instant;

use faf_shared::Diagnostic;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::trace::Recorder;

/// Top-level sections every tree must carry.
const SECTIONS: &[&str] = &["project", "stack", "human_context"];

/// Stack fields that must be strings when present.
const STACK_STRING_FIELDS: &[&str] = &["frontend", "backend", "database", "hosting"];

/// Human-context fields that should be strings or structured values.
const HUMAN_FIELDS: &[&str] = &["who", "what", "why", "where", "when", "how"];

/// Legacy embedded score, no longer honoured.
const DEPRECATED_SCORE_KEY: &str = "ai_score";

#[instrument(skip_all)]
pub(crate) fn analyze(tree: Value, rec: &mut Recorder<'_>) -> Value {
    let started = Instant::now();
    let mut map = match &tree {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    let mut changes = Vec::new();

    for section in SECTIONS {
        match map.get(*section) {
            None | Some(Value::Null) => {
                map.insert((*section).to_string(), Value::Object(Map::new()));
                changes.push(format!("Added missing {section} section"));
            }
            Some(Value::Object(_)) => {}
            Some(_) => {
                rec.diagnostic(
                    Diagnostic::warning(format!("{section} should be a mapping"))
                        .at_field(*section),
                );
                map.insert((*section).to_string(), Value::Object(Map::new()));
                changes.push(format!("Replaced non-mapping {section} section"));
            }
        }
    }

    validate_types(&map, rec);

    if map.remove(DEPRECATED_SCORE_KEY).is_some() {
        rec.diagnostic(
            Diagnostic::warning("Embedded ai_score is deprecated and will be ignored")
                .with_suggestion("Remove ai_score; scores are always recomputed"),
        );
        changes.push("Removed deprecated ai_score".to_string());
    }

    let analyzed = Value::Object(map);
    rec.record("analyze", started, &tree, &analyzed, changes);
    analyzed
}

fn field<'a>(map: &'a Map<String, Value>, section: &str, key: &str) -> Option<&'a Value> {
    map.get(section)
        .and_then(|s| s.get(key))
        .filter(|v| !v.is_null())
}

fn validate_types(map: &Map<String, Value>, rec: &mut Recorder<'_>) {
    if field(map, "project", "name").is_some_and(|v| !v.is_string()) {
        rec.diagnostic(
            Diagnostic::error("project.name must be a string").at_field("project.name"),
        );
    }

    for key in STACK_STRING_FIELDS {
        if field(map, "stack", key).is_some_and(|v| !v.is_string()) {
            let path = format!("stack.{key}");
            rec.diagnostic(Diagnostic::error(format!("{path} must be a string")).at_field(path));
        }
    }

    for key in HUMAN_FIELDS {
        if field(map, "human_context", key)
            .is_some_and(|v| !(v.is_string() || v.is_object() || v.is_array()))
        {
            let path = format!("human_context.{key}");
            rec.diagnostic(
                Diagnostic::warning(format!("{path} should be a string or object")).at_field(path),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::SilentObserver;
    use faf_shared::Severity;
    use serde_json::json;

    fn run(tree: Value) -> (Value, Vec<Diagnostic>, Vec<String>) {
        let observer = SilentObserver;
        let mut rec = Recorder::new(10_000, &observer);
        let out = analyze(tree, &mut rec);
        let (trace, diagnostics) = rec.finish();
        let changes = trace.pass("analyze").map(|p| p.changes.clone()).unwrap_or_default();
        (out, diagnostics, changes)
    }

    #[test]
    fn inserts_missing_sections() {
        let (out, diagnostics, changes) = run(json!({ "project": { "name": "x" } }));
        assert_eq!(out["stack"], json!({}));
        assert_eq!(out["human_context"], json!({}));
        assert_eq!(out["project"]["name"], json!("x"));
        assert!(diagnostics.is_empty());
        assert_eq!(
            changes,
            vec![
                "Added missing stack section".to_string(),
                "Added missing human_context section".to_string(),
            ]
        );
    }

    #[test]
    fn flags_wrong_typed_fields() {
        let (_, diagnostics, _) = run(json!({
            "project": { "name": 42 },
            "stack": { "frontend": ["react"], "hosting": "Vercel" },
            "human_context": { "who": 7, "what": { "summary": "x" } },
        }));

        let errors: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(
            errors,
            ["project.name must be a string", "stack.frontend must be a string"]
        );

        let warnings: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].location.as_ref().map(|l| l.field.as_str()),
            Some("human_context.who")
        );
    }

    #[test]
    fn strips_deprecated_score() {
        let (out, diagnostics, changes) = run(json!({ "ai_score": 87, "project": {} }));
        assert!(out.get("ai_score").is_none());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("deprecated"));
        assert!(changes.contains(&"Removed deprecated ai_score".to_string()));
    }

    #[test]
    fn replaces_scalar_sections() {
        let (out, diagnostics, _) = run(json!({ "stack": "React", "project": {}, "human_context": {} }));
        assert_eq!(out["stack"], json!({}));
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }
}
