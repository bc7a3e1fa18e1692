//! Exposition text rendering.
//!
//! One line per registry entry:
//! `name{key="value",...} 1.0` — unlabeled entries omit the braces, and
//! measurements always carry at least one fractional digit (integer `0`
//! renders as `0.0`) for collector compatibility.

use std::fmt::Write;

use crate::registry::RegistryEntry;

/// Escape a label value for the text format.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Render a measurement with at least one fractional digit.
fn format_measurement(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Serialize one registry snapshot.
///
/// Never fails on a well-formed registry; the write-time label check keeps
/// key/value counts in agreement before entries get here. Deterministic for
/// a fixed snapshot since the registry hands entries over in sorted order.
pub fn render(entries: &[RegistryEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        if entry.identity.label_values.is_empty() {
            let _ = writeln!(
                out,
                "{} {}",
                entry.identity.name,
                format_measurement(entry.value)
            );
        } else {
            let labels = entry
                .label_keys
                .iter()
                .zip(&entry.identity.label_values)
                .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(
                out,
                "{}{{{}}} {}",
                entry.identity.name,
                labels,
                format_measurement(entry.value)
            );
        }
    }
    out
}
