use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::foundation::error::ErrorKind;

#[test]
fn open_gate_admits_and_then_refuses_to_close() {
    let gate = PublishGate::new();
    assert!(!gate.is_closed());
    assert_eq!(gate.admit(|| Ok(7)).unwrap(), 7);
    assert!(!gate.close());
    assert!(!gate.is_closed());
}

#[test]
fn closed_gate_never_runs_the_commit() {
    let gate = PublishGate::new();
    assert!(gate.close());
    assert!(gate.is_closed());

    let mut ran = false;
    let err = gate
        .admit(|| {
            ran = true;
            Ok(())
        })
        .unwrap_err();
    assert!(!ran);
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[test]
fn failed_commit_leaves_the_gate_closable() {
    let gate = PublishGate::new();
    let err = gate
        .admit(|| -> BadgeResult<()> { Err(BadgeError::persist("disk full")) })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persist);
    assert!(gate.close());
}

#[test]
fn close_waits_for_a_commit_in_flight() {
    let gate = Arc::new(PublishGate::new());
    let (started_tx, started_rx) = std::sync::mpsc::channel();

    let worker = {
        let gate = Arc::clone(&gate);
        std::thread::spawn(move || {
            gate.admit(|| {
                started_tx.send(()).unwrap();
                std::thread::sleep(Duration::from_millis(100));
                Ok(())
            })
        })
    };

    started_rx.recv().unwrap();
    assert!(!gate.close(), "commit in flight must win over close");
    worker.join().unwrap().unwrap();
}
