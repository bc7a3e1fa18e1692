//! Concurrent metric registry.
//!
//! Producers publish whole `ValueSet`s. A write carrying a `WriteKey`
//! replaces only the entries that key wrote previously; a write without one
//! replaces the entire registry. Readers take a point-in-time snapshot and
//! never observe a partially applied write.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{LinkMeterError, Result};
use crate::value::{MetricIdentity, ValueSet};

/// Opaque producer token for keyed partial writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WriteKey(String);

impl WriteKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// One registered metric at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub identity: MetricIdentity,
    pub value: f64,
    pub label_keys: Vec<String>,
    pub owner: Option<WriteKey>,
}

/// Many-writer, many-reader metric store.
///
/// Writes serialize on the lock's exclusive side; `read` copies the current
/// entries out under the shared side, so rendering never holds the write
/// lock. Lock poisoning is recovered with `into_inner`: the critical
/// sections below perform no fallible work, so a poisoned guard still holds
/// consistent state.
#[derive(Default)]
pub struct MetricRegistry {
    entries: RwLock<HashMap<MetricIdentity, RegistryEntry>>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `sets` under `key`.
    ///
    /// `None` replaces every existing entry; `Some(key)` first removes the
    /// entries previously owned by `key`, then installs the new ones. If the
    /// same identity appears twice within one call the later value wins. A
    /// label-count mismatch anywhere in `sets` rejects the whole call and
    /// leaves the registry unchanged.
    pub fn write(&self, sets: &[ValueSet], key: Option<&WriteKey>) -> Result<()> {
        // Validate everything before taking the lock so a malformed write is
        // an atomic no-op.
        for set in sets {
            for value in &set.values {
                if value.label_values.len() != set.label_keys.len() {
                    return Err(LinkMeterError::LabelMismatch {
                        name: value.name.clone(),
                        expected: set.label_keys.len(),
                        got: value.label_values.len(),
                    });
                }
            }
        }

        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match key {
            None => {
                entries.clear();
                install(&mut entries, sets, None);
            }
            Some(key) => {
                entries.retain(|_, entry| entry.owner.as_ref() != Some(key));
                install(&mut entries, sets, Some(key));
            }
        }
        Ok(())
    }

    /// Remove every entry, regardless of ownership.
    pub fn clear(&self) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }

    /// Point-in-time snapshot, sorted by metric identity.
    pub fn read(&self) -> Vec<RegistryEntry> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut snapshot: Vec<RegistryEntry> = entries.values().cloned().collect();
        drop(entries);
        snapshot.sort_by(|a, b| a.identity.cmp(&b.identity));
        snapshot
    }
}

/// Flatten `sets` into the entry map as an ordered upsert.
fn install(
    entries: &mut HashMap<MetricIdentity, RegistryEntry>,
    sets: &[ValueSet],
    owner: Option<&WriteKey>,
) {
    for set in sets {
        for value in &set.values {
            let identity = MetricIdentity::of(value);
            entries.insert(
                identity.clone(),
                RegistryEntry {
                    identity,
                    value: value.measurement,
                    label_keys: set.label_keys.clone(),
                    owner: owner.cloned(),
                },
            );
        }
    }
}
