// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! JSON bodies use camelCase keys. Enumerations travel as their
//! SCREAMING_SNAKE strings and dates as `YYYY-MM-DD`; both are parsed in
//! the handlers so that a bad value names the offending field.

use bidline_domain::{Bid, StatusHistoryEntry, format_date};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// API request to create a bid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBidRequest {
    /// The organization to create the bid in. Defaults to the caller's
    /// personal organization.
    pub organization_id: Option<i64>,
    pub platform: String,
    pub job_reference: Option<String>,
    pub client_name: Option<String>,
    pub title: String,
    pub client_budget: Option<String>,
    pub proposed_price: Option<f64>,
    pub currency: Option<String>,
    pub estimated_hours: Option<f64>,
    pub skills: Vec<String>,
    pub submission_date: Option<String>,
    pub probability: Option<f64>,
    pub competitor_notes: Option<String>,
    pub risk_flags: Vec<String>,
    pub internal_comments: Option<String>,
    /// A non-terminal initial status. Defaults to `DRAFT`.
    pub status: Option<String>,
}

/// API request to edit a bid's non-status fields.
///
/// Absent fields are left unchanged. Blank text clears a field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateBidRequest {
    pub platform: Option<String>,
    pub job_reference: Option<String>,
    pub client_name: Option<String>,
    pub title: Option<String>,
    pub client_budget: Option<String>,
    pub proposed_price: Option<f64>,
    pub currency: Option<String>,
    pub estimated_hours: Option<f64>,
    pub skills: Option<Vec<String>>,
    pub submission_date: Option<String>,
    pub probability: Option<f64>,
    pub competitor_notes: Option<String>,
    pub risk_flags: Option<Vec<String>>,
    pub internal_comments: Option<String>,
    pub interview_date: Option<String>,
    pub interview_outcome: Option<String>,
    /// Accepted only when equal to the bid's current status.
    pub current_status: Option<String>,
}

/// API request to move a bid to a new status.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionBidRequest {
    pub status: String,
    pub interview_date: Option<String>,
    pub interview_outcome: Option<String>,
    pub loss_reason: Option<String>,
    pub loss_reason_other: Option<String>,
    pub withdrawal_reason: Option<String>,
    pub final_agreed_price: Option<f64>,
    pub expected_start_date: Option<String>,
    pub final_scope_notes: Option<String>,
}

/// API request to delete several bids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i64>,
    pub organization_id: Option<i64>,
}

/// Outcome of a bulk delete. Deletions are not rolled back when a later
/// id fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    /// Number of bids deleted.
    pub deleted: u64,
    /// Ids that could not be deleted, in request order.
    pub failed: Vec<i64>,
}

/// API response for a single deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBidResponse {
    pub bid_id: i64,
    pub message: String,
}

/// Query parameters for listing bids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListBidsQuery {
    pub organization_id: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub status: Option<String>,
}

/// Query parameters for a backlog view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklogQuery {
    pub organization_id: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for pipeline metrics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsQuery {
    pub organization_id: Option<i64>,
}

/// One status history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryInfo {
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub user_id: i64,
    pub reason: Option<String>,
}

impl From<&StatusHistoryEntry> for StatusHistoryInfo {
    fn from(entry: &StatusHistoryEntry) -> Self {
        Self {
            status: entry.status.as_str().to_string(),
            timestamp: entry.timestamp,
            user_id: entry.user_id,
            reason: entry.reason.clone(),
        }
    }
}

/// A bid as returned by every bid endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidInfo {
    pub id: i64,
    pub organization_id: Option<i64>,
    pub owner_id: i64,
    pub platform: String,
    pub job_reference: Option<String>,
    pub client_name: Option<String>,
    pub title: String,
    pub client_budget: Option<String>,
    pub proposed_price: Option<f64>,
    pub currency: String,
    pub estimated_hours: Option<f64>,
    pub skills: Vec<String>,
    pub submission_date: Option<String>,
    pub current_status: String,
    pub status_history: Vec<StatusHistoryInfo>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_status_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub final_outcome_timestamp: Option<OffsetDateTime>,
    pub probability: Option<f64>,
    pub competitor_notes: Option<String>,
    pub risk_flags: Vec<String>,
    pub internal_comments: Option<String>,
    pub interview_date: Option<String>,
    pub interview_outcome: Option<String>,
    pub loss_reason: Option<String>,
    pub loss_reason_other: Option<String>,
    pub withdrawal_reason: Option<String>,
    pub final_agreed_price: Option<f64>,
    pub expected_start_date: Option<String>,
    pub final_scope_notes: Option<String>,
    pub version: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl BidInfo {
    /// Builds the response for a stored bid.
    ///
    /// Unsaved bids have no id and are reported with id 0.
    #[must_use]
    pub fn from_bid(bid: &Bid) -> Self {
        Self {
            id: bid.bid_id.unwrap_or_default(),
            organization_id: bid.organization_id,
            owner_id: bid.owner_id,
            platform: bid.platform.as_str().to_string(),
            job_reference: bid.job_reference.clone(),
            client_name: bid.client_name.clone(),
            title: bid.title.clone(),
            client_budget: bid.client_budget.clone(),
            proposed_price: bid.proposed_price,
            currency: bid.currency.clone(),
            estimated_hours: bid.estimated_hours,
            skills: bid.skills.clone(),
            submission_date: bid.submission_date.map(format_date),
            current_status: bid.current_status.as_str().to_string(),
            status_history: bid
                .status_history
                .entries()
                .iter()
                .map(StatusHistoryInfo::from)
                .collect(),
            last_status_at: bid.last_status_at,
            final_outcome_timestamp: bid.final_outcome_at,
            probability: bid.probability,
            competitor_notes: bid.competitor_notes.clone(),
            risk_flags: bid.risk_flags.clone(),
            internal_comments: bid.internal_comments.clone(),
            interview_date: bid.interview_date.map(format_date),
            interview_outcome: bid.interview_outcome.map(|o| o.as_str().to_string()),
            loss_reason: bid.loss_reason.map(|r| r.as_str().to_string()),
            loss_reason_other: bid.loss_reason_other.clone(),
            withdrawal_reason: bid.withdrawal_reason.map(|r| r.as_str().to_string()),
            final_agreed_price: bid.final_agreed_price,
            expected_start_date: bid.expected_start_date.map(format_date),
            final_scope_notes: bid.final_scope_notes.clone(),
            version: bid.version,
            created_at: bid.created_at,
            updated_at: bid.updated_at,
        }
    }
}
