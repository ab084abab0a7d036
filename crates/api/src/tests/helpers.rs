// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use bidline_domain::MemberRole;
use bidline_persistence::Persistence;
use time::{Duration, OffsetDateTime, macros::datetime};

use crate::{
    AuthenticatedUser, BidInfo, CreateBidRequest, PipelineConfig, TransitionBidRequest,
    create_bid, transition_bid,
};

/// Owns the test organization.
pub const OWNER: AuthenticatedUser = AuthenticatedUser::new(1);
/// A plain member; sees only their own bids.
pub const MEMBER: AuthenticatedUser = AuthenticatedUser::new(2);
/// A pipeline manager; sees every bid in the organization.
pub const MANAGER: AuthenticatedUser = AuthenticatedUser::new(3);
/// Not a member of the test organization.
pub const OUTSIDER: AuthenticatedUser = AuthenticatedUser::new(4);

pub fn reference_now() -> OffsetDateTime {
    datetime!(2026-03-15 12:00:00 UTC)
}

pub fn days_ago(days: i64) -> OffsetDateTime {
    reference_now() - Duration::days(days)
}

/// A fresh database with one organization holding `OWNER`, `MEMBER`,
/// and `MANAGER`.
pub fn setup() -> (Persistence, PipelineConfig, i64) {
    let mut persistence = Persistence::new_in_memory().expect("in-memory database");
    let org = persistence
        .create_organization("Acme Consulting", OWNER.user_id, days_ago(60))
        .unwrap();
    persistence
        .add_member(org, MEMBER.user_id, MemberRole::Member, days_ago(60))
        .unwrap();
    persistence
        .add_member(org, MANAGER.user_id, MemberRole::PipelineManager, days_ago(60))
        .unwrap();
    (persistence, PipelineConfig::default(), org)
}

pub fn create_request(org: i64, title: &str) -> CreateBidRequest {
    CreateBidRequest {
        organization_id: Some(org),
        platform: String::from("UPWORK"),
        title: title.to_string(),
        client_name: Some(String::from("Northwind")),
        proposed_price: Some(1200.0),
        skills: vec![String::from("rust")],
        ..CreateBidRequest::default()
    }
}

pub fn create(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    org: i64,
    title: &str,
    at: OffsetDateTime,
) -> BidInfo {
    create_bid(persistence, user, &create_request(org, title), at).unwrap()
}

pub fn to_status(status: &str) -> TransitionBidRequest {
    TransitionBidRequest {
        status: status.to_string(),
        ..TransitionBidRequest::default()
    }
}

pub fn to_interview() -> TransitionBidRequest {
    TransitionBidRequest {
        interview_date: Some(String::from("2026-02-01")),
        ..to_status("INTERVIEW")
    }
}

/// Moves a bid along the given path, one transition per day ending at
/// `reference_now`.
pub fn advance(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    user: &AuthenticatedUser,
    bid_id: i64,
    path: &[TransitionBidRequest],
) -> BidInfo {
    let mut latest = None;
    for (i, request) in path.iter().enumerate() {
        let offset = i64::try_from(path.len() - i - 1).unwrap();
        latest = Some(
            transition_bid(persistence, config, user, bid_id, request, days_ago(offset)).unwrap(),
        );
    }
    latest.expect("path must not be empty")
}
