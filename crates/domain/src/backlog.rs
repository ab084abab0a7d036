// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operational backlog classification.
//!
//! These predicates are the reference definitions of each backlog. The
//! storage layer implements the same filters as queries and must return
//! the same bids in the same order.

use crate::dates::cutoff;
use crate::status::PipelineStatus;
use crate::thresholds::EffectiveThresholds;
use crate::types::{Bid, LossReason};
use crate::validation::normalize_text;
use time::OffsetDateTime;

/// The five operational backlogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BacklogKind {
    /// Drafts older than the draft aging threshold.
    DraftAging,
    /// Submitted or interviewing bids overdue for a follow-up.
    FollowUp,
    /// Every bid currently in interview.
    Interview,
    /// Terminal bids missing their outcome details.
    Review,
    /// Open bids silent long enough to consider marking ghosted.
    GhostedSuggestion,
}

impl BacklogKind {
    /// Every backlog.
    pub const ALL: [Self; 5] = [
        Self::DraftAging,
        Self::FollowUp,
        Self::Interview,
        Self::Review,
        Self::GhostedSuggestion,
    ];

    /// Returns a stable name for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DraftAging => "draft",
            Self::FollowUp => "follow-up",
            Self::Interview => "interview",
            Self::Review => "review",
            Self::GhostedSuggestion => "ghosted-suggestions",
        }
    }

    /// The statuses a bid must be in to appear in this backlog.
    #[must_use]
    pub const fn statuses(&self) -> &'static [PipelineStatus] {
        match self {
            Self::DraftAging => &[PipelineStatus::Draft],
            Self::FollowUp => &[PipelineStatus::Submitted, PipelineStatus::Interview],
            Self::Interview => &[PipelineStatus::Interview],
            Self::Review => &[
                PipelineStatus::Won,
                PipelineStatus::Lost,
                PipelineStatus::Withdrawn,
            ],
            Self::GhostedSuggestion => &[
                PipelineStatus::Submitted,
                PipelineStatus::Viewed,
                PipelineStatus::Interview,
            ],
        }
    }

    /// The threshold governing this backlog, if it is time-based.
    #[must_use]
    pub const fn threshold_days(&self, thresholds: &EffectiveThresholds) -> Option<u32> {
        match self {
            Self::DraftAging => Some(thresholds.draft_aging_days),
            Self::FollowUp => Some(thresholds.follow_up_sla_days),
            Self::GhostedSuggestion => Some(thresholds.ghosted_suggest_days),
            Self::Interview | Self::Review => None,
        }
    }

    /// The cutoff timestamp for this backlog at `now`, if it is time-based.
    #[must_use]
    pub fn cutoff(
        &self,
        now: OffsetDateTime,
        thresholds: &EffectiveThresholds,
    ) -> Option<OffsetDateTime> {
        self.threshold_days(thresholds).map(|days| cutoff(now, days))
    }

    /// Returns true if `bid` belongs in this backlog.
    ///
    /// `cutoff` is ignored for backlogs without a threshold.
    #[must_use]
    pub fn matches(&self, bid: &Bid, cutoff: Option<OffsetDateTime>) -> bool {
        if !self.statuses().contains(&bid.current_status) {
            return false;
        }

        match self {
            Self::DraftAging => cutoff.is_some_and(|c| bid.created_at <= c),
            Self::FollowUp | Self::GhostedSuggestion => {
                cutoff.is_some_and(|c| bid.activity_at() <= c)
            }
            Self::Interview => true,
            Self::Review => needs_review(bid),
        }
    }

    /// Filters and orders `bids` into this backlog.
    ///
    /// Ties on the sort timestamp are broken by bid id.
    #[must_use]
    pub fn classify<'a>(&self, bids: &'a [Bid], cutoff: Option<OffsetDateTime>) -> Vec<&'a Bid> {
        let mut matched: Vec<&Bid> = bids.iter().filter(|b| self.matches(b, cutoff)).collect();

        match self {
            Self::DraftAging => matched.sort_by_key(|b| (b.created_at, b.bid_id)),
            Self::FollowUp | Self::Interview | Self::GhostedSuggestion => {
                matched.sort_by_key(|b| (b.activity_at(), b.bid_id));
            }
            Self::Review => matched.sort_by_key(|b| b.bid_id),
        }

        matched
    }
}

impl std::fmt::Display for BacklogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns true if a terminal bid is missing its outcome details.
#[must_use]
pub fn needs_review(bid: &Bid) -> bool {
    match bid.current_status {
        PipelineStatus::Lost => match bid.loss_reason {
            None => true,
            Some(LossReason::Other) => {
                normalize_text(bid.loss_reason_other.as_deref()).is_none()
            }
            Some(_) => false,
        },
        PipelineStatus::Withdrawn => bid.withdrawal_reason.is_none(),
        PipelineStatus::Won => {
            bid.final_agreed_price.is_none() || bid.expected_start_date.is_none()
        }
        _ => false,
    }
}
