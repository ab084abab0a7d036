// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod metrics;
mod validation;

use crate::{Bid, Platform, PipelineStatus, StatusHistory, StatusHistoryEntry};
use time::{Duration, OffsetDateTime};

/// A fixed reference instant for deterministic tests.
pub fn reference_now() -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + Duration::days(20_000)
}

/// Builds a persisted-looking bid in `status`, created `age_days` before
/// `reference_now()`, with no status change since creation.
pub fn create_test_bid(bid_id: i64, status: PipelineStatus, age_days: i64) -> Bid {
    let created_at = reference_now() - Duration::days(age_days);
    let mut history = StatusHistory::new();
    history.append(StatusHistoryEntry {
        status,
        timestamp: created_at,
        user_id: 1,
        reason: None,
    });

    Bid {
        bid_id: Some(bid_id),
        organization_id: Some(1),
        owner_id: 1,
        platform: Platform::Upwork,
        job_reference: None,
        client_name: Some(String::from("Acme")),
        title: format!("Bid {bid_id}"),
        client_budget: None,
        proposed_price: Some(1_000.0),
        currency: String::from("USD"),
        estimated_hours: None,
        skills: Vec::new(),
        submission_date: None,
        current_status: status,
        status_history: history,
        last_status_at: None,
        final_outcome_at: None,
        probability: None,
        competitor_notes: None,
        risk_flags: Vec::new(),
        internal_comments: None,
        interview_date: None,
        interview_outcome: None,
        loss_reason: None,
        loss_reason_other: None,
        withdrawal_reason: None,
        final_agreed_price: None,
        expected_start_date: None,
        final_scope_notes: None,
        version: 1,
        created_at,
        updated_at: created_at,
    }
}
