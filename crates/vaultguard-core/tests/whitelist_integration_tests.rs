//! Integration tests for the whitelist store and config loading.
//!
//! These tests cover scenarios that need file I/O or shared access from
//! several threads.

use alloy::primitives::{address, Address, Selector};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use vaultguard_core::config::{ConfigError, GuardConfig};
use vaultguard_core::{ProtocolFamily, WhitelistStore};

const OWNER: Address = address!("00000000000000000000000000000000000000a1");
const MANAGER: Address = address!("00000000000000000000000000000000000000b2");

fn token(n: u8) -> Address {
    Address::repeat_byte(n)
}

// ========== Property Tests ==========

#[test]
fn test_repeated_adds_leave_membership_unchanged() {
    let store = WhitelistStore::new(OWNER);
    for _ in 0..5 {
        store.add_token(OWNER, token(1)).unwrap();
        store.add_router(OWNER, token(2), ProtocolFamily::Lending).unwrap();
        store
            .add_target_selector(OWNER, token(3), Selector::repeat_byte(7))
            .unwrap();
    }
    let snapshot = store.snapshot();
    assert_eq!(snapshot.tokens, vec![token(1)]);
    assert_eq!(snapshot.routers, vec![(token(2), ProtocolFamily::Lending)]);
    assert_eq!(snapshot.target_selectors, vec![(token(3), Selector::repeat_byte(7))]);
}

#[test]
fn test_snapshot_is_sorted() {
    let store = WhitelistStore::new(OWNER);
    for n in [9u8, 3, 7, 1] {
        store.add_token(OWNER, token(n)).unwrap();
    }
    assert_eq!(
        store.snapshot().tokens,
        vec![token(1), token(3), token(7), token(9)]
    );
}

#[test]
fn test_manager_cannot_mutate_any_list() {
    let store = WhitelistStore::new(OWNER);
    store.add_token(OWNER, token(1)).unwrap();

    assert!(store.add_token(MANAGER, token(2)).is_err());
    assert!(store.remove_token(MANAGER, token(1)).is_err());
    assert!(store
        .add_router(MANAGER, token(3), ProtocolFamily::PairSwap)
        .is_err());
    assert!(store
        .add_target_selector(MANAGER, token(4), Selector::ZERO)
        .is_err());
    assert!(store.set_owner(MANAGER, MANAGER).is_err());

    assert_eq!(store.snapshot().tokens, vec![token(1)]);
    assert_eq!(store.owner(), OWNER);
}

// ========== Concurrent Access Tests ==========

#[test]
fn test_concurrent_readers_see_owner_writes() {
    let store = Arc::new(WhitelistStore::new(OWNER));
    for n in 1..=20u8 {
        store.add_token(OWNER, token(n)).unwrap();
    }

    let mut handles = vec![];
    for n in 1..=20u8 {
        let reader = Arc::clone(&store);
        handles.push(thread::spawn(move || reader.is_token_allowed(token(n))));
    }
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn test_concurrent_idempotent_adds() {
    let store = WhitelistStore::new(OWNER);
    let mut handles = vec![];
    for _ in 0..10 {
        let writer = store.clone();
        handles.push(thread::spawn(move || {
            writer.add_token(OWNER, token(5)).unwrap().changed()
        }));
    }
    let changed = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|c| *c)
        .count();

    // Exactly one add inserts; the rest are no-ops
    assert_eq!(changed, 1);
    assert_eq!(store.snapshot().tokens, vec![token(5)]);
}

// ========== File I/O Tests ==========

#[test]
fn test_config_from_file_success() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("guard.yaml");
    fs::write(
        &path,
        r#"
owner: "0x00000000000000000000000000000000000000a1"
account: "0x00000000000000000000000000000000000000c3"
tokens:
  - "0x0101010101010101010101010101010101010101"
routers:
  - address: "0x0202020202020202020202020202020202020202"
    family: pair_swap
"#,
    )
    .unwrap();

    let config = GuardConfig::from_file(&path).unwrap().resolve().unwrap();
    let store = config.build_store().unwrap();
    assert!(store.is_token_allowed(token(1)));
    assert_eq!(store.router_family(token(2)), Some(ProtocolFamily::PairSwap));
}

#[test]
fn test_config_from_file_not_found() {
    let result = GuardConfig::from_file(&PathBuf::from("/nonexistent/guard.yaml"));
    match result.unwrap_err() {
        ConfigError::IoError(_) => (),
        e => panic!("Expected IoError, got {:?}", e),
    }
}

#[test]
fn test_config_from_file_invalid_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("guard.yaml");
    fs::write(&path, "owner: [unclosed").unwrap();

    match GuardConfig::from_file(&path).unwrap_err() {
        ConfigError::ParseError(_) => (),
        e => panic!("Expected ParseError, got {:?}", e),
    }
}

#[test]
fn test_config_unknown_field_rejected() {
    let yaml = r#"
owner: "0x00000000000000000000000000000000000000a1"
account: "0x00000000000000000000000000000000000000c3"
allow_everything: true
"#;
    assert!(GuardConfig::from_yaml(yaml).is_err());
}
