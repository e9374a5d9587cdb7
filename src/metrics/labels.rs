//! Label naming rules.
//!
//! Resource labels have arbitrary keys (`app.kubernetes.io/name`), metric
//! label names do not. Every resource label is projected to exactly one
//! metric label named `label_<sanitized key>`, which also keeps it clear of
//! reserved names such as `namespace`.

use std::collections::{BTreeMap, BTreeSet};

use super::Sample;

/// Prefix applied to every projected resource label.
pub const LABEL_PREFIX: &str = "label_";

/// Replaces every character outside `[a-zA-Z0-9_]` with `_`.
pub fn sanitize_label_name(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Metric label name for a resource label key.
pub fn resource_label_name(key: &str) -> String {
    format!("{LABEL_PREFIX}{}", sanitize_label_name(key))
}

/// One sample of value `1` per resource label, in key order.
///
/// Keys that sanitize to the same name with the same value would produce
/// the same series; only the first is kept.
pub fn label_samples(labels: &BTreeMap<String, String>) -> Vec<Sample> {
    let mut seen = BTreeSet::new();
    labels
        .iter()
        .filter_map(|(key, value)| {
            let name = resource_label_name(key);
            if !seen.insert((name.clone(), value.as_str())) {
                return None;
            }
            Some(Sample::with_label(name, value.as_str(), 1.0))
        })
        .collect()
}

/// Checks a metric name against `[a-zA-Z_:][a-zA-Z0-9_:]*`.
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// Checks a label name against `[a-zA-Z_][a-zA-Z0-9_]*`.
pub fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
