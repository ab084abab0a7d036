// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to and from domain values.

use bidline_domain::{
    Bid, DomainError, InterviewOutcome, LossReason, PipelineStatus, Platform, StatusHistory,
    StatusHistoryEntry, WithdrawalReason, format_date, from_unix_millis, parse_date,
    to_unix_millis,
};
use diesel::prelude::*;
use std::str::FromStr;
use time::Date;

use crate::diesel_schema::{bid_status_history, bids};
use crate::error::PersistenceError;

/// A stored bid row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bids)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BidRow {
    pub bid_id: i64,
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
    pub skills: String,
    pub submission_date: Option<String>,
    pub current_status: String,
    pub last_status_at: Option<i64>,
    pub final_outcome_at: Option<i64>,
    pub probability: Option<f64>,
    pub competitor_notes: Option<String>,
    pub risk_flags: String,
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
    pub created_at: i64,
    pub updated_at: i64,
}

/// The mutable columns of a bid.
///
/// Used both to insert a new row and to overwrite an existing one, so
/// `None` must clear a column rather than skip it.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = bids)]
#[diesel(treat_none_as_null = true)]
pub struct BidValues {
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
    pub skills: String,
    pub submission_date: Option<String>,
    pub current_status: String,
    pub last_status_at: Option<i64>,
    pub final_outcome_at: Option<i64>,
    pub probability: Option<f64>,
    pub competitor_notes: Option<String>,
    pub risk_flags: String,
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
    pub created_at: i64,
    pub updated_at: i64,
}

impl BidValues {
    /// Captures the storable columns of `bid` at `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if a list field cannot be serialized.
    pub fn from_bid(bid: &Bid, version: i64) -> Result<Self, PersistenceError> {
        Ok(Self {
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
            skills: serde_json::to_string(&bid.skills)?,
            submission_date: bid.submission_date.map(format_date),
            current_status: bid.current_status.as_str().to_string(),
            last_status_at: bid.last_status_at.map(to_unix_millis),
            final_outcome_at: bid.final_outcome_at.map(to_unix_millis),
            probability: bid.probability,
            competitor_notes: bid.competitor_notes.clone(),
            risk_flags: serde_json::to_string(&bid.risk_flags)?,
            internal_comments: bid.internal_comments.clone(),
            interview_date: bid.interview_date.map(format_date),
            interview_outcome: bid.interview_outcome.map(|o| o.as_str().to_string()),
            loss_reason: bid.loss_reason.map(|r| r.as_str().to_string()),
            loss_reason_other: bid.loss_reason_other.clone(),
            withdrawal_reason: bid.withdrawal_reason.map(|r| r.as_str().to_string()),
            final_agreed_price: bid.final_agreed_price,
            expected_start_date: bid.expected_start_date.map(format_date),
            final_scope_notes: bid.final_scope_notes.clone(),
            version,
            created_at: to_unix_millis(bid.created_at),
            updated_at: to_unix_millis(bid.updated_at),
        })
    }
}

/// A stored status history row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bid_status_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HistoryRow {
    pub history_id: i64,
    pub bid_id: i64,
    pub sequence: i64,
    pub status: String,
    pub recorded_at: i64,
    pub user_id: i64,
    pub reason: Option<String>,
}

/// A status history row to insert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bid_status_history)]
pub struct NewHistoryRow {
    pub bid_id: i64,
    pub sequence: i64,
    pub status: String,
    pub recorded_at: i64,
    pub user_id: i64,
    pub reason: Option<String>,
}

impl NewHistoryRow {
    /// Builds the row for the entry at position `sequence` of a bid's history.
    #[must_use]
    pub fn from_entry(bid_id: i64, sequence: i64, entry: &StatusHistoryEntry) -> Self {
        Self {
            bid_id,
            sequence,
            status: entry.status.as_str().to_string(),
            recorded_at: to_unix_millis(entry.timestamp),
            user_id: entry.user_id,
            reason: entry.reason.clone(),
        }
    }
}

fn corrupt(bid_id: i64, err: &DomainError) -> PersistenceError {
    PersistenceError::CorruptRecord(format!("bid {bid_id}: {err}"))
}

fn parse_enum<T: FromStr<Err = DomainError>>(
    bid_id: i64,
    value: &str,
) -> Result<T, PersistenceError> {
    T::from_str(value).map_err(|e| corrupt(bid_id, &e))
}

fn parse_optional_enum<T: FromStr<Err = DomainError>>(
    bid_id: i64,
    value: Option<&str>,
) -> Result<Option<T>, PersistenceError> {
    value.map(|v| parse_enum(bid_id, v)).transpose()
}

fn parse_optional_date(bid_id: i64, value: Option<&str>) -> Result<Option<Date>, PersistenceError> {
    value
        .map(|v| parse_date(v).map_err(|e| corrupt(bid_id, &e)))
        .transpose()
}

fn parse_optional_millis(
    bid_id: i64,
    value: Option<i64>,
) -> Result<Option<time::OffsetDateTime>, PersistenceError> {
    value
        .map(|v| from_unix_millis(v).map_err(|e| corrupt(bid_id, &e)))
        .transpose()
}

/// Converts stored history rows, already ordered by sequence.
///
/// # Errors
///
/// Returns `CorruptRecord` if a row holds an unknown status or timestamp.
pub fn history_from_rows(rows: Vec<HistoryRow>) -> Result<StatusHistory, PersistenceError> {
    let entries = rows
        .into_iter()
        .map(|row| {
            Ok(StatusHistoryEntry {
                status: parse_enum::<PipelineStatus>(row.bid_id, &row.status)?,
                timestamp: from_unix_millis(row.recorded_at).map_err(|e| corrupt(row.bid_id, &e))?,
                user_id: row.user_id,
                reason: row.reason,
            })
        })
        .collect::<Result<Vec<_>, PersistenceError>>()?;
    Ok(StatusHistory::from_entries(entries))
}

/// Rebuilds a domain bid from its row and history.
///
/// # Errors
///
/// Returns `CorruptRecord` if any stored value cannot be parsed.
pub fn bid_from_row(row: BidRow, status_history: StatusHistory) -> Result<Bid, PersistenceError> {
    let id = row.bid_id;
    let skills: Vec<String> = serde_json::from_str(&row.skills)?;
    let risk_flags: Vec<String> = serde_json::from_str(&row.risk_flags)?;

    Ok(Bid {
        bid_id: Some(id),
        organization_id: row.organization_id,
        owner_id: row.owner_id,
        platform: parse_enum::<Platform>(id, &row.platform)?,
        job_reference: row.job_reference,
        client_name: row.client_name,
        title: row.title,
        client_budget: row.client_budget,
        proposed_price: row.proposed_price,
        currency: row.currency,
        estimated_hours: row.estimated_hours,
        skills,
        submission_date: parse_optional_date(id, row.submission_date.as_deref())?,
        current_status: parse_enum::<PipelineStatus>(id, &row.current_status)?,
        status_history,
        last_status_at: parse_optional_millis(id, row.last_status_at)?,
        final_outcome_at: parse_optional_millis(id, row.final_outcome_at)?,
        probability: row.probability,
        competitor_notes: row.competitor_notes,
        risk_flags,
        internal_comments: row.internal_comments,
        interview_date: parse_optional_date(id, row.interview_date.as_deref())?,
        interview_outcome: parse_optional_enum::<InterviewOutcome>(
            id,
            row.interview_outcome.as_deref(),
        )?,
        loss_reason: parse_optional_enum::<LossReason>(id, row.loss_reason.as_deref())?,
        loss_reason_other: row.loss_reason_other,
        withdrawal_reason: parse_optional_enum::<WithdrawalReason>(
            id,
            row.withdrawal_reason.as_deref(),
        )?,
        final_agreed_price: row.final_agreed_price,
        expected_start_date: parse_optional_date(id, row.expected_start_date.as_deref())?,
        final_scope_notes: row.final_scope_notes,
        version: row.version,
        created_at: from_unix_millis(row.created_at).map_err(|e| corrupt(id, &e))?,
        updated_at: from_unix_millis(row.updated_at).map_err(|e| corrupt(id, &e))?,
    })
}
