//! Fill classification: does a value carry real information?

use serde_json::Value;

/// Strings that mean "nothing here".
pub const EMPTY_MARKERS: &[&str] = &[
    "",
    "None",
    "Unknown",
    "Not specified",
    "N/A",
    "null",
    "undefined",
    "~",
];

/// Generic filler that reads like content but says nothing about the project.
pub const FILLER_PHRASES: &[&str] = &[
    "Development teams",
    "Software development solution",
    "Improve development efficiency",
    "Cloud platform",
    "Ongoing development",
    "Modern development practices",
    "Development teams building next-generation software",
    "AI-powered development infrastructure with trust-driven workflows",
];

/// Decides whether a slot value counts as filled.
///
/// The built-in filler list can be extended through configuration.
#[derive(Debug, Clone, Default)]
pub struct FillClassifier {
    extra_fillers: Vec<String>,
}

impl FillClassifier {
    pub fn new(extra_fillers: Vec<String>) -> Self {
        let extra_fillers = extra_fillers
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Self { extra_fillers }
    }

    /// `null` and `false` are unfilled. Strings are unfilled when, trimmed,
    /// they are an empty marker or a filler phrase. Numbers must be finite.
    /// Arrays and objects must be non-empty.
    pub fn is_filled(&self, value: &Value) -> bool {
        match value {
            Value::Null | Value::Bool(false) => false,
            Value::Bool(true) => true,
            Value::String(s) => {
                let trimmed = s.trim();
                !EMPTY_MARKERS.contains(&trimmed)
                    && !FILLER_PHRASES.contains(&trimmed)
                    && !self.extra_fillers.iter().any(|p| p == trimmed)
            }
            Value::Number(n) => n.as_f64().is_some_and(f64::is_finite),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        }
    }

    /// Like [`is_filled`](Self::is_filled) for an optional value; absent is unfilled.
    pub fn is_present(&self, value: Option<&Value>) -> bool {
        value.is_some_and(|v| self.is_filled(v))
    }
}
