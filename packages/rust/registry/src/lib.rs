//! Slot & project-type registry.
//!
//! Static catalog of the 21 canonical slots and of the project types that
//! decide which of them count toward a score. Everything here is read-only
//! data behind pure lookup functions:
//! - [`resolve_type`]: alias/canonical/fallback resolution
//! - [`active_slots_for`]: ordered slot set for a canonical type
//! - [`parse_slot_ignore`]: per-document slot ignore list

pub mod slots;
pub mod types;

use serde_json::Value;

pub use slots::{Category, all_slots, document_path};
pub use types::{GENERIC_TYPE, PROJECT_TYPES, ProjectTypeDef};

/// Document keys accepted for the slot ignore list, in lookup order.
pub const SLOT_IGNORE_KEYS: &[&str] = &["slot_ignore", "slotIgnore", "ignore_slots"];

/// Resolve a raw type string to a canonical type id.
///
/// Alias lists are scanned first (in catalog order); a raw value that is
/// itself a canonical id is used directly; anything else is `generic`.
/// Matching is exact: `"React"` is not `"react"`.
pub fn resolve_type(raw: &str) -> &'static str {
    if let Some(owner) = PROJECT_TYPES
        .iter()
        .find(|t| t.aliases.iter().any(|a| *a == raw))
    {
        return owner.id;
    }

    match types::lookup(raw) {
        Some(def) => def.id,
        None => {
            tracing::debug!(raw, "unknown project type, falling back to generic");
            GENERIC_TYPE
        }
    }
}

/// Definition for a raw type string, after resolution.
pub fn type_definition(raw: &str) -> &'static ProjectTypeDef {
    types::lookup(resolve_type(raw)).unwrap_or_else(types::generic)
}

/// The ordered slot paths that count for a type.
///
/// Union of the owned categories' slot lists, in category declaration order.
/// Unknown ids are resolved first, so this never returns an empty set.
pub fn active_slots_for(type_id: &str) -> Vec<&'static str> {
    let def = type_definition(type_id);
    Category::ALL
        .into_iter()
        .filter(|c| def.categories.contains(c))
        .flat_map(|c| c.slots().iter().copied())
        .collect()
}

/// Expand a short slot name to its dotted path (`"hosting"` → `"stack.hosting"`).
///
/// Dotted names pass through (with `human_context.` rewritten to `human.`).
/// Names that match no slot are returned unchanged; they never match anything.
pub fn normalize_slot_name(name: &str) -> String {
    let name = name.trim();
    if let Some(rest) = name.strip_prefix("human_context.") {
        return format!("human.{rest}");
    }
    if name.contains('.') {
        return name.to_string();
    }

    let suffix = format!(".{name}");
    all_slots()
        .find(|slot| slot.ends_with(&suffix))
        .map(str::to_string)
        .unwrap_or_else(|| name.to_string())
}

/// Parse a raw ignore list: either a sequence or a comma-separated string.
pub fn parse_slot_ignore(raw: &Value) -> Vec<String> {
    let names: Vec<&str> = match raw {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(s) => s.split(',').collect(),
        _ => Vec::new(),
    };

    names
        .into_iter()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(normalize_slot_name)
        .collect()
}

/// Read the ignore list from a document tree (first matching key wins).
pub fn slot_ignore_from(tree: &Value) -> Vec<String> {
    SLOT_IGNORE_KEYS
        .iter()
        .find_map(|key| tree.get(*key))
        .map(parse_slot_ignore)
        .unwrap_or_default()
}

/// Enumerate all canonical types in declaration order.
pub fn project_types() -> impl Iterator<Item = &'static ProjectTypeDef> {
    PROJECT_TYPES.iter()
}
