//! Generate pass: type detection, IR construction, scoring and checksum.
//!
//! The IR is built in stages so precedence is explicit:
//! 1. explicit document values that are filled,
//! 2. type-mandated defaults,
//! 3. discovered facts,
//! 4. every remaining active slot, unfilled.
//!
//! A stage can never replace an entry from an earlier one because the IR
//! rejects duplicate paths. The final list is ordered like the active set.

use std::time::Instant;

use chrono::Utc;
use faf_discovery::PartialContext;
use faf_registry::{active_slots_for, document_path, slot_ignore_from};
use faf_shared::{
    ENGINE_VERSION, IntermediateRepresentation, Section, SectionBreakdown, Slot, SlotInfo,
    SlotSource, percentage,
};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::defaults::type_defaults;
use crate::detect::{DetectedType, detect_type};
use crate::fill::FillClassifier;
use crate::observer::CompileObserver;
use crate::optimizer::{DISCOVERED_KEY, SUBSITE_KEY};
use crate::parser::type_name;
use crate::trace::Recorder;

/// Every slot currently weighs the same.
const SLOT_WEIGHT: u32 = 1;

/// Scored output of the generate pass.
#[derive(Debug)]
pub(crate) struct Generated {
    pub score: u8,
    pub filled: usize,
    pub total: usize,
    pub breakdown: SectionBreakdown,
    pub ir: IntermediateRepresentation,
}

#[instrument(skip_all)]
pub(crate) fn generate(tree: &Value, fill: &FillClassifier, rec: &mut Recorder<'_>) -> Generated {
    let started = Instant::now();
    let observer = rec.observer();

    let detected = detect_type(tree, fill);
    observer.type_detected(&detected.detected, detected.resolved);

    let ignored = slot_ignore_from(tree);
    let active: Vec<&'static str> = active_slots_for(detected.resolved)
        .into_iter()
        .filter(|slot| !ignored.iter().any(|i| i == slot))
        .collect();
    debug!(
        project_type = detected.resolved,
        active = active.len(),
        ignored = ignored.len(),
        "active slot set resolved"
    );

    let mut ir = build_ir(tree, &active, &detected, fill, observer);
    ir.metadata = metadata(tree, &detected, &ignored);

    let breakdown = breakdown(&ir);
    let filled: usize = breakdown.iter().map(|(_, s)| s.filled).sum();
    let total: usize = breakdown.iter().map(|(_, s)| s.total).sum();
    let score = percentage(filled, total);

    let mut changes = vec![format!(
        "Detected project type {} ({})",
        detected.detected, detected.resolved
    )];
    if !ignored.is_empty() {
        changes.push(format!("Ignored slots: {}", ignored.join(", ")));
    }
    changes.push(format!("Generated score: {score}% ({filled}/{total} slots)"));

    rec.record(
        "generate",
        started,
        tree,
        &json!({ "score": score, "filled": filled, "total": total }),
        changes,
    );

    Generated {
        score,
        filled,
        total,
        breakdown,
        ir,
    }
}

/// Value stored in the tree for a slot, if any.
fn value_at<'a>(tree: &'a Value, slot: &str) -> Option<&'a Value> {
    document_path(slot)
        .into_iter()
        .try_fold(tree, |node, key| node.get(key))
}

fn new_slot(path: &str, value: Value, source: SlotSource, section: Section, filled: bool) -> Slot {
    Slot {
        id: String::new(),
        path: path.to_string(),
        value_type: type_name(&value).to_string(),
        value,
        source,
        weight: SLOT_WEIGHT,
        filled,
        section,
    }
}

fn add(ir: &mut IntermediateRepresentation, slot: Slot, observer: &dyn CompileObserver) {
    let path = slot.path.clone();
    if !ir.insert(slot) {
        observer.duplicate_skipped(&path);
    }
}

fn build_ir(
    tree: &Value,
    active: &[&'static str],
    detected: &DetectedType,
    fill: &FillClassifier,
    observer: &dyn CompileObserver,
) -> IntermediateRepresentation {
    let mut ir = IntermediateRepresentation::new();
    let is_active = |path: &str| active.iter().any(|p| *p == path);

    // Explicit values.
    for path in active {
        if let Some(value) = value_at(tree, path).filter(|v| fill.is_filled(v)) {
            let slot = new_slot(
                path,
                value.clone(),
                SlotSource::Original,
                Section::of_path(path),
                true,
            );
            add(&mut ir, slot, observer);
        }
    }

    // Type-mandated defaults.
    for (path, value) in type_defaults(detected.resolved, tree) {
        if !is_active(path) {
            continue;
        }
        let filled = fill.is_filled(&value);
        let slot = new_slot(
            path,
            value,
            SlotSource::Discovered,
            Section::of_path(path),
            filled,
        );
        add(&mut ir, slot, observer);
    }

    // Discovered facts. Only for active slots the document leaves empty.
    let discovered: PartialContext = tree
        .get(DISCOVERED_KEY)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();
    for (_, path, value) in discovered.facts() {
        if !is_active(path) || fill.is_present(value_at(tree, path)) {
            continue;
        }
        let value = Value::from(value);
        let filled = fill.is_filled(&value);
        let slot = new_slot(path, value, SlotSource::Discovered, Section::Discovery, filled);
        add(&mut ir, slot, observer);
    }

    // Whatever is left counts against the score.
    for path in active {
        if ir.contains(path) {
            continue;
        }
        let value = value_at(tree, path).cloned().unwrap_or(Value::Null);
        let filled = fill.is_filled(&value);
        let slot = new_slot(
            path,
            value,
            SlotSource::Original,
            Section::of_path(path),
            filled,
        );
        add(&mut ir, slot, observer);
    }

    ir.slots
        .sort_by_key(|s| active.iter().position(|p| *p == s.path));
    for (i, slot) in ir.slots.iter_mut().enumerate() {
        slot.id = format!("slot_{}", i + 1);
        observer.slot_added(slot);
    }
    ir
}

fn metadata(
    tree: &Value,
    detected: &DetectedType,
    ignored: &[String],
) -> serde_json::Map<String, Value> {
    let is_subsite = tree
        .get(DISCOVERED_KEY)
        .and_then(|d| d.get(SUBSITE_KEY))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut meta = serde_json::Map::new();
    meta.insert("compiled".into(), Value::from(Utc::now().to_rfc3339()));
    meta.insert("project_type".into(), Value::from(detected.detected.clone()));
    meta.insert("resolved_type".into(), Value::from(detected.resolved));
    meta.insert(
        "declared_type".into(),
        detected.declared.clone().map_or(Value::Null, Value::from),
    );
    meta.insert("ignored_slots".into(), json!(ignored));
    meta.insert("is_subsite".into(), Value::Bool(is_subsite));
    meta
}

fn breakdown(ir: &IntermediateRepresentation) -> SectionBreakdown {
    let mut breakdown = SectionBreakdown::default();
    for slot in &ir.slots {
        let section = breakdown.section_mut(slot.section);
        section.total += 1;
        if slot.filled {
            section.filled += 1;
        }
        section.slots.push(SlotInfo {
            id: slot.id.clone(),
            path: slot.path.clone(),
            value: slot.value.clone(),
            filled: slot.filled,
            source: slot.source,
            points: if slot.filled { slot.weight } else { 0 },
        });
    }
    for section in [
        Section::Project,
        Section::Stack,
        Section::Human,
        Section::Discovery,
    ] {
        let s = breakdown.section_mut(section);
        s.percentage = percentage(s.filled, s.total);
    }
    breakdown
}

/// Short hash over the scored fields and the engine version.
///
/// Depends only on the result, so it changes with the content's fill state
/// and with the engine version, never with timestamps.
pub fn checksum(score: u8, filled: usize, total: usize) -> String {
    let payload = json!({
        "score": score,
        "filled": filled,
        "total": total,
        "version": ENGINE_VERSION,
    });
    let mut hasher = Sha256::new();
    hasher.update(payload.to_string().as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..8].to_string()
}
