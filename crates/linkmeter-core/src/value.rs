//! Metric value model.
//!
//! A `ValueSet` groups values sharing one set of declared label keys. Every
//! value in a set must carry exactly as many label values as the set declares
//! keys (both empty for unlabeled sets). `ValueSet::add` enforces the count
//! up front; the registry re-checks it at the write boundary so a hand-built
//! set can never corrupt registry state.

use crate::error::{LinkMeterError, Result};

/// A single named measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub name: String,
    pub measurement: f64,
    /// Label values, positionally matching the owning set's label keys.
    pub label_values: Vec<String>,
}

impl Value {
    /// Value without labels.
    pub fn new(name: impl Into<String>, measurement: f64) -> Self {
        Self {
            name: name.into(),
            measurement,
            label_values: Vec::new(),
        }
    }

    /// Value with label values (must match the owning set's label keys).
    pub fn with_labels(
        name: impl Into<String>,
        measurement: f64,
        label_values: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            measurement,
            label_values,
        }
    }
}

/// An ordered group of values sharing one set of label keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSet {
    pub label_keys: Vec<String>,
    pub values: Vec<Value>,
}

impl ValueSet {
    /// Unlabeled set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whose values carry one label value per key, in key order.
    pub fn with_label_keys(label_keys: Vec<String>) -> Self {
        Self {
            label_keys,
            values: Vec::new(),
        }
    }

    /// Attach a value, rejecting a label-count mismatch.
    pub fn add(&mut self, value: Value) -> Result<()> {
        if value.label_values.len() != self.label_keys.len() {
            return Err(LinkMeterError::LabelMismatch {
                expected: self.label_keys.len(),
                got: value.label_values.len(),
                name: value.name,
            });
        }
        self.values.push(value);
        Ok(())
    }
}

/// Unique key for one metric within the registry: name plus label values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricIdentity {
    pub name: String,
    pub label_values: Vec<String>,
}

impl MetricIdentity {
    pub fn of(value: &Value) -> Self {
        Self {
            name: value.name.clone(),
            label_values: value.label_values.clone(),
        }
    }
}
