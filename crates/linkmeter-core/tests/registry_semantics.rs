//! Registry write/read semantics.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use linkmeter_core::registry::{MetricRegistry, WriteKey};
use linkmeter_core::value::{MetricIdentity, Value, ValueSet};
use linkmeter_core::LinkMeterError;

fn unlabeled(name: &str, v: f64) -> ValueSet {
    let mut set = ValueSet::new();
    set.add(Value::new(name, v)).unwrap();
    set
}

fn names(registry: &MetricRegistry) -> Vec<String> {
    registry
        .read()
        .into_iter()
        .map(|e| e.identity.name)
        .collect()
}

#[test]
fn unkeyed_write_is_full_replace() {
    let registry = MetricRegistry::new();
    registry
        .write(&[unlabeled("alpha", 1.0), unlabeled("beta", 2.0)], None)
        .unwrap();
    registry.write(&[unlabeled("gamma", 3.0)], None).unwrap();

    assert_eq!(names(&registry), vec!["gamma"]);
    assert_eq!(registry.read()[0].value, 3.0);
}

#[test]
fn keyed_writes_keep_other_owners() {
    let registry = MetricRegistry::new();
    let k1 = WriteKey::new("one");
    let k2 = WriteKey::new("two");

    registry.write(&[unlabeled("alpha", 1.0)], Some(&k1)).unwrap();
    registry.write(&[unlabeled("beta", 2.0)], Some(&k2)).unwrap();

    assert_eq!(names(&registry), vec!["alpha", "beta"]);
}

#[test]
fn empty_keyed_write_removes_only_that_key() {
    let registry = MetricRegistry::new();
    let k1 = WriteKey::new("one");
    let k2 = WriteKey::new("two");

    registry.write(&[unlabeled("alpha", 1.0)], Some(&k1)).unwrap();
    registry.write(&[unlabeled("beta", 2.0)], Some(&k2)).unwrap();
    registry.write(&[], Some(&k1)).unwrap();

    assert_eq!(names(&registry), vec!["beta"]);
}

#[test]
fn duplicate_identity_last_wins_within_one_write() {
    let registry = MetricRegistry::new();
    registry
        .write(&[unlabeled("alpha", 1.0), unlabeled("alpha", 9.0)], None)
        .unwrap();

    let snapshot = registry.read();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].value, 9.0);
}

#[test]
fn labeled_values_keep_distinct_identities() {
    let registry = MetricRegistry::new();
    let mut set = ValueSet::with_label_keys(vec!["iface".into()]);
    set.add(Value::with_labels("octets", 1.0, vec!["wan".into()]))
        .unwrap();
    set.add(Value::with_labels("octets", 2.0, vec!["lan".into()]))
        .unwrap();
    registry.write(&[set], None).unwrap();

    let snapshot = registry.read();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(
        snapshot[0].identity,
        MetricIdentity {
            name: "octets".into(),
            label_values: vec!["lan".into()],
        }
    );
}

#[test]
fn label_mismatch_rejected_as_atomic_noop() {
    let registry = MetricRegistry::new();
    registry.write(&[unlabeled("alpha", 1.0)], None).unwrap();

    // Bypass ValueSet::add to build a set violating the label invariant.
    let bad = ValueSet {
        label_keys: vec!["iface".into()],
        values: vec![Value::new("octets", 2.0)],
    };
    let err = registry
        .write(&[unlabeled("beta", 3.0), bad], None)
        .expect_err("must reject");
    assert!(matches!(err, LinkMeterError::LabelMismatch { .. }));

    // Nothing from the rejected call landed, the old state survives intact.
    assert_eq!(names(&registry), vec!["alpha"]);
}

#[test]
fn value_set_add_rejects_mismatched_value() {
    let mut set = ValueSet::with_label_keys(vec!["iface".into()]);
    let err = set.add(Value::new("octets", 1.0)).expect_err("must reject");
    assert!(matches!(
        err,
        LinkMeterError::LabelMismatch {
            expected: 1,
            got: 0,
            ..
        }
    ));
    assert!(set.values.is_empty());
}

#[test]
fn clear_removes_everything_regardless_of_owner() {
    let registry = MetricRegistry::new();
    registry
        .write(&[unlabeled("alpha", 1.0)], Some(&WriteKey::new("one")))
        .unwrap();
    registry.write(&[unlabeled("beta", 2.0)], None).unwrap();

    registry.clear();
    assert!(registry.read().is_empty());
}

#[test]
fn snapshot_is_a_value_not_a_live_view() {
    let registry = MetricRegistry::new();
    registry.write(&[unlabeled("alpha", 1.0)], None).unwrap();

    let snapshot = registry.read();
    registry.write(&[unlabeled("beta", 2.0)], None).unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].identity.name, "alpha");
}

#[test]
fn concurrent_readers_never_see_torn_writes() {
    let registry = Arc::new(MetricRegistry::new());
    registry
        .write(&[unlabeled("a1", 0.0), unlabeled("a2", 0.0)], None)
        .unwrap();

    let writer = {
        let registry = Arc::clone(&registry);
        std::thread::spawn(move || {
            for i in 0..500 {
                let batch = if i % 2 == 0 {
                    [unlabeled("a1", i as f64), unlabeled("a2", i as f64)]
                } else {
                    [unlabeled("b1", i as f64), unlabeled("b2", i as f64)]
                };
                registry.write(&batch, None).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = registry.read();
                    assert_eq!(snapshot.len(), 2, "partial write observed");
                    let prefix = &snapshot[0].identity.name[..1];
                    assert!(
                        snapshot.iter().all(|e| e.identity.name.starts_with(prefix)),
                        "entries from different writes observed"
                    );
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
