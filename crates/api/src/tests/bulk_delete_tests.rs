// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    MANAGER, MEMBER, OUTSIDER, OWNER, advance, create, days_ago, reference_now, setup, to_status,
};
use crate::{ApiError, BulkDeleteRequest, BulkDeleteResponse, bulk_delete_bids, get_bid};

#[test]
fn test_missing_id_is_reported_without_rollback() {
    let (mut persistence, config, org) = setup();
    let a = create(&mut persistence, &MEMBER, org, "A", days_ago(3));
    let c = create(&mut persistence, &MEMBER, org, "C", days_ago(1));
    let missing: i64 = c.id + 100;

    let request = BulkDeleteRequest {
        ids: vec![a.id, missing, c.id],
        organization_id: Some(org),
    };
    let response =
        bulk_delete_bids(&mut persistence, &config, &MEMBER, &request, reference_now()).unwrap();

    assert_eq!(
        response,
        BulkDeleteResponse {
            deleted: 2,
            failed: vec![missing],
        }
    );
    assert!(get_bid(&mut persistence, &config, &MEMBER, a.id).is_err());
    assert!(get_bid(&mut persistence, &config, &MEMBER, c.id).is_err());

    // Re-running reports everything as failed.
    let again =
        bulk_delete_bids(&mut persistence, &config, &MEMBER, &request, reference_now()).unwrap();
    assert_eq!(again.deleted, 0);
    assert_eq!(again.failed, vec![a.id, missing, c.id]);
}

#[test]
fn test_per_bid_checks() {
    let (mut persistence, config, org) = setup();
    let mine = create(&mut persistence, &MEMBER, org, "Mine", days_ago(3));
    let theirs = create(&mut persistence, &OWNER, org, "Theirs", days_ago(3));
    let closed = create(&mut persistence, &MEMBER, org, "Closed", days_ago(3));
    advance(
        &mut persistence,
        &config,
        &MEMBER,
        closed.id,
        &[to_status("SUBMITTED"), to_status("GHOSTED")],
    );
    let other_org = persistence
        .create_organization("Globex", OUTSIDER.user_id, days_ago(30))
        .unwrap();
    let elsewhere = create(&mut persistence, &OUTSIDER, other_org, "Elsewhere", days_ago(3));

    let request = BulkDeleteRequest {
        ids: vec![mine.id, theirs.id, closed.id, elsewhere.id],
        organization_id: Some(org),
    };
    let response =
        bulk_delete_bids(&mut persistence, &config, &MEMBER, &request, reference_now()).unwrap();

    assert_eq!(response.deleted, 1);
    assert_eq!(response.failed, vec![theirs.id, closed.id, elsewhere.id]);
    get_bid(&mut persistence, &config, &MANAGER, theirs.id).unwrap();
}

#[test]
fn test_non_member_organization_is_forbidden() {
    let (mut persistence, config, org) = setup();
    let bid = create(&mut persistence, &MEMBER, org, "Protected", days_ago(1));

    let request = BulkDeleteRequest {
        ids: vec![bid.id],
        organization_id: Some(org),
    };
    assert!(matches!(
        bulk_delete_bids(&mut persistence, &config, &OUTSIDER, &request, reference_now()),
        Err(ApiError::Forbidden { .. })
    ));
    get_bid(&mut persistence, &config, &MEMBER, bid.id).unwrap();
}
