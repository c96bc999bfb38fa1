//! Browser-extension keyword matcher with typo tolerance.
//!
//! Free-text goals are written by hand and often misspelled ("chrome
//! extention"). Detection accepts an exact phrase, or a browser token
//! immediately followed by an extension token where each may be off by a
//! small edit distance.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Phrases that identify an extension outright.
static PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:chrome|browser|firefox|edge|safari|web)[\s-]*(?:extension|add-?on)s?|manifest[\s-]*v[23]|content[\s-]scripts?|chrome\.runtime|webextensions?)\b",
    )
    .expect("extension phrase regex")
});

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("token regex"));

/// Browser tokens and the edit distance each tolerates.
const BROWSER_TOKENS: &[(&str, usize)] = &[
    ("chrome", 1),
    ("browser", 1),
    ("firefox", 1),
];

/// Extension tokens and the edit distance each tolerates.
const EXTENSION_TOKENS: &[(&str, usize)] = &[("extension", 2), ("extensions", 2), ("addon", 1)];

/// Outcome of a detection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub detected: bool,
    /// 1.0 for an exact phrase, lower for fuzzy matches.
    pub confidence: f32,
    /// The text that triggered detection.
    pub matched: Option<String>,
}

impl Detection {
    fn none() -> Self {
        Self {
            detected: false,
            confidence: 0.0,
            matched: None,
        }
    }
}

/// Keyword/fuzzy matcher for browser-extension projects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionDetector;

impl ExtensionDetector {
    /// Detect browser-extension vocabulary in free text.
    pub fn detect(text: &str) -> Detection {
        if text.trim().is_empty() {
            return Detection::none();
        }

        if let Some(m) = PHRASE_RE.find(text) {
            return Detection {
                detected: true,
                confidence: 1.0,
                matched: Some(m.as_str().to_string()),
            };
        }

        let lower = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN_RE.find_iter(&lower).map(|m| m.as_str()).collect();

        let mut best: Option<(usize, String)> = None;
        for pair in tokens.windows(2) {
            let (Some(d1), Some(d2)) = (
                closest(pair[0], BROWSER_TOKENS),
                closest(pair[1], EXTENSION_TOKENS),
            ) else {
                continue;
            };
            let distance = d1 + d2;
            if best.as_ref().is_none_or(|(d, _)| distance < *d) {
                best = Some((distance, format!("{} {}", pair[0], pair[1])));
            }
        }

        match best {
            Some((distance, matched)) => Detection {
                detected: true,
                confidence: (0.9 - 0.1 * distance as f32).max(0.5),
                matched: Some(matched),
            },
            None => Detection::none(),
        }
    }
}

/// Smallest tolerated distance from `token` to any target, if within tolerance.
fn closest(token: &str, targets: &[(&str, usize)]) -> Option<usize> {
    // Short tokens produce too many accidental near-matches.
    if token.len() < 4 {
        return None;
    }
    targets
        .iter()
        .map(|(target, max)| (levenshtein(token, target), *max))
        .filter(|(d, max)| d <= max)
        .map(|(d, _)| d)
        .min()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
