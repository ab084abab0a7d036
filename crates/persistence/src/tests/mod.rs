// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;

use crate::Persistence;
use bidline::{Command, apply, apply_create};
use bidline_audit::Actor;
use bidline_domain::{Bid, BidDraft, MemberRole, PipelineStatus, Platform, TransitionContext};
use time::{Duration, OffsetDateTime};

pub const OWNER_ID: i64 = 1;
pub const MEMBER_ID: i64 = 2;

/// A fixed reference instant for deterministic tests.
pub fn reference_now() -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + Duration::days(20_000)
}

pub fn days_ago(days: i64) -> OffsetDateTime {
    reference_now() - Duration::days(days)
}

/// A fresh database with one organization owned by `OWNER_ID` and
/// `MEMBER_ID` as a plain member.
pub fn setup() -> (Persistence, i64) {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let organization_id = persistence
        .create_organization("Acme Consulting", OWNER_ID, days_ago(365))
        .unwrap();
    persistence
        .add_member(organization_id, MEMBER_ID, MemberRole::Member, days_ago(365))
        .unwrap();
    (persistence, organization_id)
}

/// Builds an unsaved bid created at `at`.
pub fn draft_bid(organization_id: i64, owner_id: i64, title: &str, at: OffsetDateTime) -> Bid {
    let mut draft = BidDraft::new(Platform::Upwork, title);
    draft.client_name = Some(format!("{title} client"));
    draft.skills = vec![String::from("rust"), String::from("sqlite")];
    apply_create(draft, Some(organization_id), Actor::new(owner_id), at).unwrap()
}

/// Creates and stores a bid.
pub fn store_bid(
    persistence: &mut Persistence,
    organization_id: i64,
    owner_id: i64,
    title: &str,
    at: OffsetDateTime,
) -> Bid {
    persistence
        .create_bid(&draft_bid(organization_id, owner_id, title, at))
        .unwrap()
}

/// Applies a transition as the bid's owner.
pub fn transition(
    bid: &Bid,
    target: PipelineStatus,
    context: TransitionContext,
    at: OffsetDateTime,
) -> Bid {
    apply(
        bid,
        Command::Transition { target, context },
        Actor::new(bid.owner_id),
        at,
    )
    .unwrap()
    .new_bid
}

/// Transitions a stored bid and saves it.
pub fn transition_and_save(
    persistence: &mut Persistence,
    bid: &Bid,
    target: PipelineStatus,
    context: TransitionContext,
    at: OffsetDateTime,
) -> Bid {
    persistence
        .save_bid(&transition(bid, target, context, at))
        .unwrap()
}

pub fn interview_context() -> TransitionContext {
    TransitionContext {
        interview_date: bidline_domain::parse_date("2026-02-01").ok(),
        ..TransitionContext::default()
    }
}
