//! Parse pass: raw document text into an untyped JSON tree.
//!
//! Documents are YAML. The tree is converted to `serde_json::Value` right
//! away so every later pass works on one representation. Non-string mapping
//! keys are stringified.

use std::time::Instant;

use faf_shared::{Diagnostic, FafError, Result};
use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::trace::Recorder;

/// SHA-256 of the raw document text, lowercase hex.
pub fn fingerprint(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Parse `source` into a mapping.
///
/// Unparsable text and non-mapping roots yield an error diagnostic and an
/// empty tree. With `strict` set they abort the compilation instead.
#[instrument(skip_all, fields(bytes = source.len(), strict = strict))]
pub(crate) fn parse(source: &str, strict: bool, rec: &mut Recorder<'_>) -> Result<Value> {
    let started = Instant::now();

    let outcome = match serde_yaml::from_str::<serde_yaml::Value>(source) {
        Ok(doc) => match yaml_to_json(doc) {
            Value::Object(map) => Ok(map),
            other => Err(format!(
                "Invalid document: root must be a mapping, found {}",
                type_name(&other)
            )),
        },
        Err(e) => Err(format!("Parse error: {e}")),
    };

    match outcome {
        Ok(map) => {
            let note = format!("Parsed document into tree with {} top-level keys", map.len());
            debug!(keys = map.len(), "document parsed");
            let tree = Value::Object(map);
            rec.record("parse", started, &source.len(), &tree, vec![note]);
            Ok(tree)
        }
        Err(message) => {
            rec.diagnostic(Diagnostic::error(message.clone()));
            if strict {
                return Err(FafError::Compile {
                    message,
                    diagnostics: rec.diagnostics().to_vec(),
                });
            }
            let tree = Value::Object(Map::new());
            rec.record(
                "parse",
                started,
                &source.len(),
                &tree,
                vec!["Continuing with an empty tree".to_string()],
            );
            Ok(tree)
        }
    }
}

/// Convert a YAML value into the equivalent JSON value.
pub(crate) fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                // NaN and infinities have no JSON form and score as unfilled anyway.
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(key_string(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn key_string(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Null => "null".to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Tagged(tagged) => key_string(tagged.value),
        other => yaml_to_json(other).to_string(),
    }
}

/// JSON type name of a value.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::SilentObserver;
    use faf_shared::Severity;
    use serde_json::json;

    #[test]
    fn fingerprint_is_stable_sha256() {
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fingerprint("a"), fingerprint("a"));
        assert_ne!(fingerprint("a"), fingerprint("b"));
    }

    #[test]
    fn parses_nested_mapping() {
        let observer = SilentObserver;
        let mut rec = Recorder::new(1000, &observer);
        let tree = parse(
            "project:\n  name: demo\n  version: 2\nstack:\n  frontend: React\n",
            false,
            &mut rec,
        )
        .expect("parse");
        assert_eq!(tree["project"]["name"], json!("demo"));
        assert_eq!(tree["project"]["version"], json!(2));
        assert_eq!(tree["stack"]["frontend"], json!("React"));
        assert!(rec.diagnostics().is_empty());
    }

    #[test]
    fn non_string_keys_are_stringified() {
        let doc: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\n").expect("yaml");
        let json = yaml_to_json(doc);
        assert_eq!(json["1"], json!("one"));
        assert_eq!(json["true"], json!("yes"));
    }

    #[test]
    fn invalid_yaml_degrades_to_empty_tree() {
        let observer = SilentObserver;
        let mut rec = Recorder::new(1000, &observer);
        let tree = parse("project: [unclosed", false, &mut rec).expect("lenient parse");
        assert_eq!(tree, json!({}));
        assert_eq!(rec.diagnostics().len(), 1);
        assert_eq!(rec.diagnostics()[0].severity, Severity::Error);
        assert!(rec.diagnostics()[0].message.starts_with("Parse error"));
    }

    #[test]
    fn scalar_root_is_rejected() {
        let observer = SilentObserver;
        let mut rec = Recorder::new(1000, &observer);
        let tree = parse("just a string", false, &mut rec).expect("lenient parse");
        assert_eq!(tree, json!({}));
        assert!(rec.diagnostics()[0].message.contains("root must be a mapping"));
    }

    #[test]
    fn strict_mode_aborts_with_diagnostics() {
        let observer = SilentObserver;
        let mut rec = Recorder::new(1000, &observer);
        let err = parse("- a\n- b\n", true, &mut rec).expect_err("strict parse");
        assert!(matches!(err, FafError::Compile { .. }));
        assert_eq!(err.diagnostics().len(), 1);
    }
}
