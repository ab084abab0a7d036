// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Status history recording.
//!
//! Every change to a bid's status goes through [`record_status_change`],
//! which updates the status and appends the matching history entry
//! together so the two can never disagree.

use bidline_domain::{
    Bid, LossReason, PipelineStatus, StatusHistoryEntry, WithdrawalReason, normalize_text,
};
use time::OffsetDateTime;

#[cfg(test)]
mod tests;

/// The user performing a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The acting user's identifier.
    pub user_id: i64,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}

/// Picks the single reason recorded on a history entry.
///
/// Precedence: free-text loss reason, then the enumerated loss reason,
/// then the withdrawal reason. At most one is ever recorded.
#[must_use]
pub fn select_reason(
    loss_reason_other: Option<&str>,
    loss_reason: Option<LossReason>,
    withdrawal_reason: Option<WithdrawalReason>,
) -> Option<String> {
    normalize_text(loss_reason_other)
        .or_else(|| loss_reason.map(|r| r.as_str().to_string()))
        .or_else(|| withdrawal_reason.map(|r| r.as_str().to_string()))
}

/// Moves `bid` into `status` and appends the corresponding history entry.
///
/// This does not validate the transition; callers are expected to have
/// done so already.
pub fn record_status_change(
    bid: &mut Bid,
    status: PipelineStatus,
    actor: Actor,
    reason: Option<String>,
    at: OffsetDateTime,
) {
    bid.current_status = status;
    bid.status_history.append(StatusHistoryEntry {
        status,
        timestamp: at,
        user_id: actor.user_id,
        reason,
    });
}

/// A bid whose status disagrees with its recorded history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryInconsistency {
    /// The bid's current status.
    pub current_status: PipelineStatus,
    /// The status of the last history entry, if there is one.
    pub last_recorded: Option<PipelineStatus>,
}

impl std::fmt::Display for HistoryInconsistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.last_recorded {
            Some(last) => write!(
                f,
                "Bid status {} does not match last history entry {last}",
                self.current_status
            ),
            None => write!(
                f,
                "Bid status {} has no history entries",
                self.current_status
            ),
        }
    }
}

impl std::error::Error for HistoryInconsistency {}

/// Verifies that the last history entry matches the bid's current status.
///
/// # Errors
///
/// Returns `HistoryInconsistency` if the history is empty or its last
/// entry records a different status.
pub fn verify_history(bid: &Bid) -> Result<(), HistoryInconsistency> {
    let last_recorded = bid.status_history.last().map(|entry| entry.status);
    if last_recorded == Some(bid.current_status) {
        Ok(())
    } else {
        Err(HistoryInconsistency {
            current_status: bid.current_status,
            last_recorded,
        })
    }
}
