// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, TransitionResult, apply, apply_create};
use bidline_audit::Actor;
use bidline_domain::{Bid, BidDraft, PipelineStatus, Platform, TransitionContext};
use time::{Duration, OffsetDateTime};

pub fn create_test_actor() -> Actor {
    Actor::new(101)
}

pub fn test_time(minutes: i64) -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + Duration::days(20_000) + Duration::minutes(minutes)
}

pub fn create_test_bid() -> Bid {
    let mut draft = BidDraft::new(Platform::Upwork, "Mobile app MVP");
    draft.client_name = Some(String::from("Acme Corp"));
    draft.proposed_price = Some(4_500.0);
    apply_create(draft, Some(1), create_test_actor(), test_time(0)).unwrap()
}

/// Creates a bid and walks it to `status` through the happy path.
pub fn create_bid_in(status: PipelineStatus) -> Bid {
    let mut bid = create_test_bid();
    let path: &[PipelineStatus] = match status {
        PipelineStatus::Draft => &[],
        PipelineStatus::Submitted => &[PipelineStatus::Submitted],
        PipelineStatus::Viewed => &[PipelineStatus::Submitted, PipelineStatus::Viewed],
        PipelineStatus::Interview => &[PipelineStatus::Submitted, PipelineStatus::Interview],
        other => panic!("use a transition test for {other}"),
    };
    for (step, target) in path.iter().enumerate() {
        let context = TransitionContext {
            interview_date: bidline_domain::parse_date("2026-02-01").ok(),
            ..TransitionContext::default()
        };
        let minutes = i64::try_from(step).unwrap() + 1;
        let result: TransitionResult = apply(
            &bid,
            Command::Transition {
                target: *target,
                context,
            },
            create_test_actor(),
            test_time(minutes),
        )
        .unwrap();
        bid = result.new_bid;
    }
    bid
}
