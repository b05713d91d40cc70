use std::collections::HashSet;

use super::*;
use crate::foundation::error::{BadgeError, ErrorKind};
use crate::output::store::InMemoryOutputStore;

#[derive(Debug)]
struct RefusingStore;

impl OutputStore for RefusingStore {
    fn write_gated(&self, _key: &str, _bytes: &[u8], _gate: &PublishGate) -> BadgeResult<String> {
        Err(BadgeError::persist("disk full"))
    }
}

#[test]
fn persist_names_artifact_after_identifier() {
    let store = InMemoryOutputStore::new();
    let writer = OutputWriter::new(Arc::new(store.clone()));
    let a = writer.persist(b"png").unwrap();

    assert_eq!(a.identifier.len(), 32);
    assert!(a.identifier.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(a.locator, format!("mem://badge-{}.png", a.identifier));
    assert_eq!(store.get_locator(&a.locator).unwrap(), b"png");
}

#[test]
fn identifiers_do_not_collide_across_threads() {
    let store = InMemoryOutputStore::new();
    let writer = OutputWriter::new(Arc::new(store.clone()));

    let ids: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let w = writer.clone();
                s.spawn(move || {
                    (0..32)
                        .map(|_| w.persist(b"x").unwrap().identifier)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 8 * 32);
    assert_eq!(store.len(), 8 * 32);
}

#[test]
fn store_errors_surface_unchanged() {
    let writer = OutputWriter::new(Arc::new(RefusingStore));
    let err = writer.persist(b"x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persist);
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn closed_gate_persists_nothing() {
    let store = InMemoryOutputStore::new();
    let writer = OutputWriter::new(Arc::new(store.clone()));
    let gate = PublishGate::new();
    assert!(gate.close());

    let err = writer.persist_gated(b"png", &gate).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(store.is_empty());
}
