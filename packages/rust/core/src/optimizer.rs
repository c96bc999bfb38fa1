//! Optimize pass: project discovery and default stripping.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use faf_discovery::{PartialContext, ProjectInspector};
use faf_shared::{Diagnostic, FafError, Result};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::trace::Recorder;

/// Key under which discovered facts are attached to the working tree.
pub const DISCOVERED_KEY: &str = "_discovered";

/// Flag inside [`DISCOVERED_KEY`] marking a static subsite.
pub const SUBSITE_KEY: &str = "isSubsite";

/// Placeholder strings removed from the tree before scoring.
pub const DEFAULT_SENTINELS: &[&str] = &["", "None", "Unknown", "Not specified", "N/A"];

/// Nesting depth below which stripping stops descending.
const MAX_STRIP_DEPTH: usize = 64;

#[instrument(skip_all, fields(dir = ?base_dir))]
pub(crate) async fn optimize(
    tree: Value,
    base_dir: Option<&Path>,
    inspector: Arc<dyn ProjectInspector>,
    rec: &mut Recorder<'_>,
) -> Value {
    let started = Instant::now();
    let mut optimized = tree.clone();
    let mut changes = Vec::new();

    if let Some(dir) = base_dir {
        match discover(dir.to_path_buf(), inspector).await {
            Ok(discovered) => {
                changes.push(format!("Discovered {} items", discovered.len()));
                if let Value::Object(map) = &mut optimized {
                    map.insert(DISCOVERED_KEY.to_string(), Value::Object(discovered));
                }
            }
            Err(e) => {
                warn!(error = %e, "discovery failed");
                rec.diagnostic(Diagnostic::warning(format!("Discovery failed: {e}")));
            }
        }
    }

    strip_defaults(&mut optimized, &mut changes);

    rec.record("optimize", started, &tree, &optimized, changes);
    optimized
}

/// Run the inspector off the async runtime and flatten its facts to a map.
async fn discover(dir: PathBuf, inspector: Arc<dyn ProjectInspector>) -> Result<Map<String, Value>> {
    let (ctx, subsite) = tokio::task::spawn_blocking(move || {
        let ctx = inspector.inspect(&dir)?;
        let subsite = inspector.is_subsite(&dir);
        Ok::<(PartialContext, bool), FafError>((ctx, subsite))
    })
    .await
    .map_err(|e| FafError::discovery(format!("inspector task failed: {e}")))??;

    let mut map = Map::new();
    for (key, _, value) in ctx.facts() {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    if subsite {
        debug!("subsite detected: index.html without package.json");
        map.insert(SUBSITE_KEY.to_string(), Value::Bool(true));
    }
    Ok(map)
}

/// Remove every field whose value is exactly a sentinel string, recursively.
///
/// One change note per removal. Running it again on its own output is a no-op.
pub fn strip_defaults(tree: &mut Value, changes: &mut Vec<String>) {
    strip_at(tree, "", 0, changes);
}

fn is_sentinel(value: &Value) -> bool {
    value.as_str().is_some_and(|s| DEFAULT_SENTINELS.contains(&s))
}

fn strip_at(value: &mut Value, path: &str, depth: usize, changes: &mut Vec<String>) {
    if depth >= MAX_STRIP_DEPTH {
        return;
    }
    match value {
        Value::Object(map) => {
            let doomed: Vec<String> = map
                .iter()
                .filter(|(_, v)| is_sentinel(v))
                .map(|(k, _)| k.clone())
                .collect();
            for key in doomed {
                map.remove(&key);
                changes.push(format!("Removed default value at {}", join(path, &key)));
            }
            for (key, child) in map.iter_mut() {
                strip_at(child, &join(path, key), depth + 1, changes);
            }
        }
        Value::Array(items) => {
            let mut index = 0;
            items.retain(|item| {
                let keep = !is_sentinel(item);
                if !keep {
                    changes.push(format!("Removed default value at {path}[{index}]"));
                }
                index += 1;
                keep
            });
            for (i, child) in items.iter_mut().enumerate() {
                strip_at(child, &format!("{path}[{i}]"), depth + 1, changes);
            }
        }
        _ => {}
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
