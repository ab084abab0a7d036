// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{OWNER_ID, reference_now, store_bid};
use crate::Persistence;

#[test]
fn test_persistence_initialization() {
    let result = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_keys_enforced() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    let org1 = db1
        .create_organization("One", OWNER_ID, reference_now())
        .unwrap();
    let org2 = db2
        .create_organization("Two", OWNER_ID, reference_now())
        .unwrap();
    store_bid(&mut db1, org1, OWNER_ID, "Only in db1", reference_now());

    assert_eq!(db1.find_bids_by_organization(org1, None).unwrap().len(), 1);
    assert!(db2.find_bids_by_organization(org2, None).unwrap().is_empty());
}

#[test]
fn test_file_database_persists_across_connections() {
    let path = std::env::temp_dir().join(format!(
        "bidline_persistence_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let bid_id = {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        let org = persistence
            .create_organization("Durable", OWNER_ID, reference_now())
            .unwrap();
        store_bid(&mut persistence, org, OWNER_ID, "Survives reopen", reference_now())
            .bid_id
            .unwrap()
    };

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    let bid = reopened.find_bid(bid_id).unwrap().unwrap();
    assert_eq!(bid.title, "Survives reopen");

    drop(reopened);
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}
