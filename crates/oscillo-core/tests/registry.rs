#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use oscillo_core::registry::Batch;
use oscillo_core::{ErrorKind, Registry};

#[test]
fn set_then_snapshot_is_last_write_wins() {
    let reg = Registry::new();
    let h = reg.register("demo_value", "demo", &["kind"]).unwrap();

    reg.set(&h, &["a"], 1.0).unwrap();
    reg.set(&h, &["a"], 2.5).unwrap();
    reg.set(&h, &["b"], 7.0).unwrap();

    let snap = reg.snapshot();
    let series: Vec<_> = snap.samples().filter(|s| s.labels == vec![("kind", "a")]).collect();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].value, 2.5);
    assert_eq!(series[0].help, "demo");
    assert_eq!(snap.get("demo_value", &["b"]), Some(7.0));
}

#[test]
fn samples_are_ordered_by_name_then_labels() {
    let reg = Registry::new();
    let z = reg.register("zeta", "", &["k"]).unwrap();
    let a = reg.register("alpha", "", &[]).unwrap();
    reg.set(&z, &["y"], 1.0).unwrap();
    reg.set(&z, &["x"], 2.0).unwrap();
    reg.set(&a, &[], 3.0).unwrap();

    let snap = reg.snapshot();
    let order: Vec<_> = snap
        .samples()
        .map(|s| (s.name, s.labels.first().map(|l| l.1)))
        .collect();
    assert_eq!(order, vec![("alpha", None), ("zeta", Some("x")), ("zeta", Some("y"))]);
    assert_eq!(reg.families(), vec!["alpha".to_string(), "zeta".to_string()]);
}

#[test]
fn same_schema_registration_is_idempotent() {
    let reg = Registry::new();
    let h1 = reg.register("demo_value", "demo", &["kind"]).unwrap();
    reg.set(&h1, &["a"], 4.0).unwrap();
    let h2 = reg.register("demo_value", "demo", &["kind"]).unwrap();

    assert_eq!(h1, h2);
    assert_eq!(reg.snapshot().get("demo_value", &["a"]), Some(4.0));
}

#[test]
fn conflicting_registration_keeps_original_family() {
    let reg = Registry::new();
    let h = reg.register("demo_value", "demo", &["kind"]).unwrap();
    reg.set(&h, &["a"], 4.0).unwrap();

    let err = reg.register("demo_value", "demo", &["kind", "zone"]).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "DUPLICATE_REGISTRATION");
    assert!(err.is_fatal());

    let err = reg.register("demo_value", "other help", &["kind"]).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::DuplicateRegistration);

    let snap = reg.snapshot();
    assert_eq!(snap.families()[0].label_names, vec!["kind".to_string()]);
    assert_eq!(snap.families()[0].help, "demo");
    assert_eq!(snap.get("demo_value", &["a"]), Some(4.0));
    reg.set(&h, &["b"], 5.0).unwrap();
}

#[test]
fn arity_mismatch_is_rejected() {
    let reg = Registry::new();
    let h = reg.register("demo_value", "", &["kind"]).unwrap();

    let err = reg.set(&h, &["a", "b"], 1.0).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::LabelArityMismatch);
    assert!(err.to_string().contains("expects 1 label values, got 2"));
    assert!(reg.snapshot().get("demo_value", &["a", "b"]).is_none());
}

#[test]
fn invalid_names_are_rejected() {
    let reg = Registry::new();
    for bad in ["", "9lives", "with-dash", "sp ace"] {
        let err = reg.register(bad, "", &[]).expect_err(bad);
        assert_eq!(err.kind(), ErrorKind::InvalidName);
    }
    for bad in ["__reserved", "a:b", "1x", ""] {
        let err = reg.register("ok_name", "", &[bad]).expect_err(bad);
        assert_eq!(err.kind(), ErrorKind::InvalidName);
    }
    let err = reg.register("ok_name", "", &["k", "k"]).expect_err("dup label");
    assert_eq!(err.kind(), ErrorKind::InvalidName);
    assert!(reg.families().is_empty());

    reg.register("ns:sub_total", "", &["_k1"]).unwrap();
}

#[test]
fn handles_do_not_cross_registries() {
    let a = Registry::new();
    let b = Registry::new();
    let ha = a.register("demo_value", "", &[]).unwrap();
    b.register("demo_value", "", &[]).unwrap();

    let err = b.set(&ha, &[], 1.0).expect_err("foreign handle");
    assert_eq!(err.kind(), ErrorKind::UnknownFamily);
    assert!(b.snapshot().samples().next().is_none());
}

#[test]
fn failing_batch_applies_nothing() {
    let reg = Registry::new();
    let one = reg.register("one", "", &["k"]).unwrap();
    let two = reg.register("two", "", &["k", "j"]).unwrap();

    let mut batch = Batch::new();
    batch.set(&one, &["a"], 1.0).set(&two, &["only-one"], 2.0);
    assert_eq!(batch.len(), 2);

    let err = reg.apply(batch).expect_err("second write is malformed");
    assert_eq!(err.kind(), ErrorKind::LabelArityMismatch);
    assert!(reg.snapshot().get("one", &["a"]).is_none());
}

#[test]
fn concurrent_snapshots_never_see_torn_batches() {
    let reg = Registry::new();
    let h = reg.register("pair", "", &["kind"]).unwrap();
    reg.set(&h, &["left"], 0.0).unwrap();
    reg.set(&h, &["right"], 0.0).unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let reg = reg.clone();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut seen = 0u64;
                loop {
                    let snap = reg.snapshot();
                    let l = snap.get("pair", &["left"]).unwrap();
                    let r = snap.get("pair", &["right"]).unwrap();
                    assert_eq!(l, r, "torn read: left={l} right={r}");
                    assert_eq!(l.fract(), 0.0, "value was never written: {l}");
                    seen += 1;
                    if stop.load(Ordering::Relaxed) {
                        break;
                    }
                }
                seen
            })
        })
        .collect();

    for i in 1..=2_000 {
        let v = i as f64;
        let mut batch = Batch::new();
        batch.set(&h, &["left"], v).set(&h, &["right"], v);
        reg.apply(batch).unwrap();
    }
    stop.store(true, Ordering::Relaxed);

    for r in readers {
        assert!(r.join().unwrap() > 0);
    }
    assert_eq!(reg.snapshot().get("pair", &["left"]), Some(2_000.0));
}
