//! Type-mandated technical defaults.
//!
//! Some project types imply their stack: a browser extension always runs in
//! the browser and ships through the store. For those types the generator
//! fills the implied slots even when the document is silent.

use serde_json::Value;

const CHROME_EXTENSION: &[(&str, &str)] = &[
    ("stack.runtime", "Chrome/Browser"),
    ("stack.hosting", "Chrome Web Store"),
    ("stack.api_type", "Chrome Extension APIs"),
    ("stack.backend", "Service Worker"),
    ("stack.database", "chrome.storage API"),
];

const STATIC_SITE: &[(&str, &str)] = &[
    ("stack.frontend", "HTML/CSS/JavaScript"),
    ("stack.runtime", "Browser"),
    ("stack.hosting", "Static Hosting"),
    ("stack.build", "Direct HTML (no build step)"),
];

/// Default slot values for a canonical type, in declaration order.
///
/// Values may depend on auxiliary document fields (e.g. `tech_stack`).
pub fn type_defaults(type_id: &str, tree: &Value) -> Vec<(&'static str, Value)> {
    match type_id {
        "chrome-extension" => fixed(CHROME_EXTENSION),
        "static-html" | "landing-page" => fixed(STATIC_SITE),
        "n8n-workflow" => n8n_defaults(tree),
        _ => Vec::new(),
    }
}

fn fixed(table: &[(&'static str, &str)]) -> Vec<(&'static str, Value)> {
    table
        .iter()
        .map(|(slot, value)| (*slot, Value::from(*value)))
        .collect()
}

/// String at `pointer`, or `fallback` when absent or blank.
fn aux(tree: &Value, pointer: &str, fallback: &str) -> Value {
    let value = tree
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback);
    Value::from(value)
}

fn n8n_defaults(tree: &Value) -> Vec<(&'static str, Value)> {
    vec![
        (
            "project.main_language",
            aux(tree, "/tech_stack/primary_language", "JSON (workflow definition)"),
        ),
        ("stack.runtime", aux(tree, "/tech_stack/workflow_engine", "n8n")),
        ("stack.backend", Value::from("Node.js (n8n server)")),
        ("stack.api_type", Value::from("Webhooks + HTTP")),
        (
            "stack.database",
            aux(tree, "/tech_stack/infrastructure/vector_db", "Workflow State"),
        ),
        ("stack.hosting", Value::from("n8n Cloud")),
        ("stack.build", Value::from("n8n Visual Editor")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slots(defaults: &[(&'static str, Value)]) -> Vec<&'static str> {
        defaults.iter().map(|(s, _)| *s).collect()
    }

    #[test]
    fn extension_defaults() {
        let d = type_defaults("chrome-extension", &json!({}));
        assert_eq!(
            slots(&d),
            [
                "stack.runtime",
                "stack.hosting",
                "stack.api_type",
                "stack.backend",
                "stack.database"
            ]
        );
        assert_eq!(d[1].1, json!("Chrome Web Store"));
    }

    #[test]
    fn landing_page_shares_static_defaults() {
        assert_eq!(
            type_defaults("landing-page", &json!({})),
            type_defaults("static-html", &json!({}))
        );
    }

    #[test]
    fn n8n_reads_tech_stack() {
        let tree = json!({
            "tech_stack": {
                "primary_language": "TypeScript",
                "infrastructure": { "vector_db": "Qdrant" }
            }
        });
        let d = type_defaults("n8n-workflow", &tree);
        assert_eq!(d[0], ("project.main_language", json!("TypeScript")));
        assert_eq!(d[1], ("stack.runtime", json!("n8n")));
        assert_eq!(d[4], ("stack.database", json!("Qdrant")));
    }

    #[test]
    fn other_types_have_no_defaults() {
        assert!(type_defaults("generic", &json!({})).is_empty());
        assert!(type_defaults("cli", &json!({})).is_empty());
    }
}
