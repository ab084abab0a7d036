// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers receive the request time from the caller. Nothing here reads
//! the wall clock.

use std::str::FromStr;

use bidline::{Command, TransitionResult, apply, apply_create};
use bidline_audit::Actor;
use bidline_domain::{
    BacklogKind, Bid, BidDraft, BidEdit, DomainError, EffectiveThresholds, InterviewOutcome,
    LossReason, OrganizationThresholds, Page, PageRequest, PipelineMetrics, PipelineStatus,
    Platform, SortField, SortOrder, TransitionContext, WithdrawalReason, compute_metrics,
    parse_date,
};
use bidline_persistence::{BidListQuery, Persistence};
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::access::{ResolvedScope, assert_can_edit_or_view, resolve_organization, resolve_scope};
use crate::auth::AuthenticatedUser;
use crate::config::PipelineConfig;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    BacklogQuery, BidInfo, BulkDeleteRequest, BulkDeleteResponse, CreateBidRequest,
    DeleteBidResponse, ListBidsQuery, MetricsQuery, TransitionBidRequest, UpdateBidRequest,
};

// ============================================================================
// Input parsing
// ============================================================================

fn parse_enum<T>(value: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    T::from_str(value.trim()).map_err(translate_domain_error)
}

fn parse_optional_enum<T>(value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    value
        .filter(|v| !v.trim().is_empty())
        .map(parse_enum)
        .transpose()
}

/// Parses an optional `YYYY-MM-DD` date. Blank values count as absent.
fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<Date>, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            parse_date(v).map_err(|err| ApiError::InvalidInput {
                field: field.to_string(),
                message: err.to_string(),
            })
        })
        .transpose()
}

fn load_bid(persistence: &mut Persistence, bid_id: i64) -> Result<Bid, ApiError> {
    persistence
        .find_bid(bid_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Bid"),
            message: format!("Bid {bid_id} does not exist"),
        })
}

fn terminal_error(bid: &Bid) -> ApiError {
    translate_domain_error(DomainError::TerminalStateImmutable {
        status: bid.current_status,
    })
}

/// Resolves the thresholds in force for an organization.
fn effective_thresholds(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    organization_id: i64,
) -> Result<EffectiveThresholds, ApiError> {
    let stored: OrganizationThresholds = persistence
        .thresholds_of(organization_id)
        .map_err(translate_persistence_error)?;
    Ok(config.default_thresholds.resolve(&stored))
}

// ============================================================================
// Bid lifecycle
// ============================================================================

/// Creates a bid in the requested organization, or the caller's default
/// organization.
///
/// The caller becomes the bid's owner and the first history entry is
/// recorded in the bid's initial status.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `user` - The authenticated caller
/// * `request` - The bid fields
/// * `now` - The request timestamp
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a member of the requested organization
/// - A field is invalid or the initial status is terminal
/// - The bid cannot be stored
pub fn create_bid(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    request: &CreateBidRequest,
    now: OffsetDateTime,
) -> Result<BidInfo, ApiError> {
    let organization_id: i64 =
        resolve_organization(persistence, user, request.organization_id, now)?;

    let platform: Platform = parse_enum(&request.platform)?;
    let draft = BidDraft {
        platform,
        job_reference: request.job_reference.clone(),
        client_name: request.client_name.clone(),
        title: request.title.clone(),
        client_budget: request.client_budget.clone(),
        proposed_price: request.proposed_price,
        currency: request.currency.clone(),
        estimated_hours: request.estimated_hours,
        skills: request.skills.clone(),
        submission_date: parse_optional_date(
            "submissionDate",
            request.submission_date.as_deref(),
        )?,
        probability: request.probability,
        competitor_notes: request.competitor_notes.clone(),
        risk_flags: request.risk_flags.clone(),
        internal_comments: request.internal_comments.clone(),
        initial_status: parse_optional_enum(request.status.as_deref())?,
    };

    let actor: Actor = user.to_actor();
    let bid: Bid =
        apply_create(draft, Some(organization_id), actor, now).map_err(translate_core_error)?;
    let stored: Bid = persistence
        .create_bid(&bid)
        .map_err(translate_persistence_error)?;

    info!(
        bid_id = stored.bid_id,
        user_id = user.user_id,
        organization_id,
        status = %stored.current_status,
        "Created bid"
    );

    Ok(BidInfo::from_bid(&stored))
}

/// Retrieves a single bid the caller may see.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the bid does not exist, or `Forbidden`
/// if the caller may not see it.
pub fn get_bid(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    user: &AuthenticatedUser,
    bid_id: i64,
) -> Result<BidInfo, ApiError> {
    let bid: Bid = load_bid(persistence, bid_id)?;
    assert_can_edit_or_view(persistence, &config.visibility, &bid, user)?;
    Ok(BidInfo::from_bid(&bid))
}

/// Edits a bid's non-status fields.
///
/// A supplied `currentStatus` is accepted only when it equals the bid's
/// current status; status changes go through [`transition_bid`].
///
/// # Errors
///
/// Returns an error if:
/// - The bid does not exist or the caller may not edit it
/// - The bid is terminal
/// - The edit tries to change the status or a field is invalid
/// - Another request saved the bid first
pub fn update_bid(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    user: &AuthenticatedUser,
    bid_id: i64,
    request: &UpdateBidRequest,
    now: OffsetDateTime,
) -> Result<BidInfo, ApiError> {
    let bid: Bid = load_bid(persistence, bid_id)?;
    assert_can_edit_or_view(persistence, &config.visibility, &bid, user)?;

    let edit = BidEdit {
        platform: parse_optional_enum(request.platform.as_deref())?,
        job_reference: request.job_reference.clone(),
        client_name: request.client_name.clone(),
        title: request.title.clone(),
        client_budget: request.client_budget.clone(),
        proposed_price: request.proposed_price,
        currency: request.currency.clone(),
        estimated_hours: request.estimated_hours,
        skills: request.skills.clone(),
        submission_date: parse_optional_date(
            "submissionDate",
            request.submission_date.as_deref(),
        )?,
        probability: request.probability,
        competitor_notes: request.competitor_notes.clone(),
        risk_flags: request.risk_flags.clone(),
        internal_comments: request.internal_comments.clone(),
        interview_date: parse_optional_date("interviewDate", request.interview_date.as_deref())?,
        interview_outcome: parse_optional_enum(request.interview_outcome.as_deref())?,
        current_status: parse_optional_enum(request.current_status.as_deref())?,
    };

    let result: TransitionResult = apply(&bid, Command::Update { edit }, user.to_actor(), now)
        .map_err(translate_core_error)?;
    let saved: Bid = persistence
        .save_bid(&result.new_bid)
        .map_err(translate_persistence_error)?;

    info!(
        bid_id,
        user_id = user.user_id,
        version = saved.version,
        "Updated bid"
    );

    Ok(BidInfo::from_bid(&saved))
}

/// Moves a bid along the pipeline.
///
/// A terminal bid is refused before access is checked, so the caller
/// learns the bid is closed even when it is not theirs to change.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `config` - The pipeline configuration
/// * `user` - The authenticated caller
/// * `bid_id` - The bid to transition
/// * `request` - The target status and the fields it requires
/// * `now` - The request timestamp
///
/// # Errors
///
/// Returns an error if:
/// - The bid does not exist
/// - The bid is terminal
/// - The caller may not edit the bid
/// - The target is not reachable or a required field is missing
/// - Another request saved the bid first
pub fn transition_bid(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    user: &AuthenticatedUser,
    bid_id: i64,
    request: &TransitionBidRequest,
    now: OffsetDateTime,
) -> Result<BidInfo, ApiError> {
    let bid: Bid = load_bid(persistence, bid_id)?;
    if bid.is_terminal() {
        return Err(terminal_error(&bid));
    }
    assert_can_edit_or_view(persistence, &config.visibility, &bid, user)?;

    let target: PipelineStatus = parse_enum(&request.status)?;
    let context = TransitionContext {
        interview_date: parse_optional_date("interviewDate", request.interview_date.as_deref())?,
        interview_outcome: parse_optional_enum::<InterviewOutcome>(
            request.interview_outcome.as_deref(),
        )?,
        loss_reason: parse_optional_enum::<LossReason>(request.loss_reason.as_deref())?,
        loss_reason_other: request.loss_reason_other.clone(),
        withdrawal_reason: parse_optional_enum::<WithdrawalReason>(
            request.withdrawal_reason.as_deref(),
        )?,
        final_agreed_price: request.final_agreed_price,
        expected_start_date: parse_optional_date(
            "expectedStartDate",
            request.expected_start_date.as_deref(),
        )?,
        final_scope_notes: request.final_scope_notes.clone(),
    };

    let command = Command::Transition { target, context };
    let result: TransitionResult =
        apply(&bid, command, user.to_actor(), now).map_err(translate_core_error)?;
    let saved: Bid = persistence
        .save_bid(&result.new_bid)
        .map_err(translate_persistence_error)?;

    info!(
        bid_id,
        user_id = user.user_id,
        from = %result.from,
        to = %result.to,
        "Transitioned bid"
    );

    Ok(BidInfo::from_bid(&saved))
}

/// Deletes a bid.
///
/// # Errors
///
/// Returns an error if the bid does not exist, the caller may not edit
/// it, or it is terminal.
pub fn delete_bid(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    user: &AuthenticatedUser,
    bid_id: i64,
) -> Result<DeleteBidResponse, ApiError> {
    let bid: Bid = load_bid(persistence, bid_id)?;
    assert_can_edit_or_view(persistence, &config.visibility, &bid, user)?;
    if bid.is_terminal() {
        return Err(terminal_error(&bid));
    }

    persistence
        .remove_bid(bid_id)
        .map_err(translate_persistence_error)?;

    info!(bid_id, user_id = user.user_id, "Deleted bid");

    Ok(DeleteBidResponse {
        bid_id,
        message: format!("Bid {bid_id} deleted"),
    })
}

/// Deletes several bids of one organization.
///
/// Each id is checked and deleted on its own; a failure is recorded and
/// the loop moves on. Earlier deletions are kept.
///
/// # Errors
///
/// Returns `Forbidden` if the caller is not a member of the requested
/// organization. Per-bid failures are reported in the response instead.
pub fn bulk_delete_bids(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    user: &AuthenticatedUser,
    request: &BulkDeleteRequest,
    now: OffsetDateTime,
) -> Result<BulkDeleteResponse, ApiError> {
    let organization_id: i64 =
        resolve_organization(persistence, user, request.organization_id, now)?;

    let mut deleted: u64 = 0;
    let mut failed: Vec<i64> = Vec::new();

    for &bid_id in &request.ids {
        match delete_in_organization(persistence, config, user, organization_id, bid_id) {
            Ok(()) => deleted += 1,
            Err(err) => {
                debug!(bid_id, error = %err, "Bulk delete skipped bid");
                failed.push(bid_id);
            }
        }
    }

    info!(
        user_id = user.user_id,
        organization_id,
        deleted,
        failed = failed.len(),
        "Bulk deleted bids"
    );

    Ok(BulkDeleteResponse { deleted, failed })
}

fn delete_in_organization(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    user: &AuthenticatedUser,
    organization_id: i64,
    bid_id: i64,
) -> Result<(), ApiError> {
    let bid: Bid = load_bid(persistence, bid_id)?;
    if bid.organization_id != Some(organization_id) {
        return Err(ApiError::Forbidden {
            message: format!("Bid {bid_id} is not in organization {organization_id}"),
        });
    }
    assert_can_edit_or_view(persistence, &config.visibility, &bid, user)?;
    if bid.is_terminal() {
        return Err(terminal_error(&bid));
    }
    persistence
        .remove_bid(bid_id)
        .map_err(translate_persistence_error)
}

// ============================================================================
// Read models
// ============================================================================

/// Lists one page of the bids the caller may see.
///
/// Unknown sort fields fall back to `createdAt`; an unknown sort order or
/// status filter is rejected.
///
/// # Errors
///
/// Returns an error if the caller is not a member of the requested
/// organization or a query parameter is invalid.
pub fn list_bids(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    user: &AuthenticatedUser,
    query: &ListBidsQuery,
    now: OffsetDateTime,
) -> Result<Page<BidInfo>, ApiError> {
    let scope: ResolvedScope = resolve_scope(
        persistence,
        &config.visibility,
        user,
        query.organization_id,
        now,
    )?;

    let sort_order: SortOrder =
        parse_optional_enum(query.sort_order.as_deref())?.unwrap_or_default();
    let status: Option<PipelineStatus> = parse_optional_enum(query.status.as_deref())?;
    let page_request = PageRequest::new(query.page, query.limit);

    let list_query = BidListQuery {
        organization_id: scope.organization_id,
        owner_id: scope.owner_filter,
        status,
        sort_field: SortField::parse_or_default(query.sort_by.as_deref()),
        sort_order,
        skip: page_request.skip(),
        take: page_request.limit(),
    };
    let (bids, total) = persistence
        .find_bids_page(&list_query)
        .map_err(translate_persistence_error)?;

    Ok(Page::new(bids, total, page_request).map(|bid| BidInfo::from_bid(&bid)))
}

/// Returns one page of a backlog for the caller's visibility scope.
///
/// # Errors
///
/// Returns an error if the caller is not a member of the requested
/// organization or the query fails.
pub fn get_backlog(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    user: &AuthenticatedUser,
    kind: BacklogKind,
    query: &BacklogQuery,
    now: OffsetDateTime,
) -> Result<Page<BidInfo>, ApiError> {
    let scope: ResolvedScope = resolve_scope(
        persistence,
        &config.visibility,
        user,
        query.organization_id,
        now,
    )?;
    let thresholds: EffectiveThresholds =
        effective_thresholds(persistence, config, scope.organization_id)?;
    let cutoff: Option<OffsetDateTime> = kind.cutoff(now, &thresholds);
    let page_request = PageRequest::new(query.page, query.limit);

    debug!(
        backlog = %kind,
        organization_id = scope.organization_id,
        owner_only = scope.owner_filter.is_some(),
        "Resolved backlog scope"
    );

    let (bids, total) = persistence
        .find_backlog_page(
            kind,
            scope.organization_id,
            scope.owner_filter,
            cutoff,
            page_request.skip(),
            page_request.limit(),
        )
        .map_err(translate_persistence_error)?;

    Ok(Page::new(bids, total, page_request).map(|bid| BidInfo::from_bid(&bid)))
}

/// Computes pipeline metrics for the caller's visibility scope.
///
/// Never fails: any error is logged and reported as all-zero metrics.
#[must_use]
pub fn get_metrics(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    user: &AuthenticatedUser,
    query: &MetricsQuery,
    now: OffsetDateTime,
) -> PipelineMetrics {
    match compute_scoped_metrics(persistence, config, user, query, now) {
        Ok(metrics) => metrics,
        Err(err) => {
            warn!(user_id = user.user_id, error = %err, "Metrics unavailable; reporting zeros");
            PipelineMetrics::default()
        }
    }
}

fn compute_scoped_metrics(
    persistence: &mut Persistence,
    config: &PipelineConfig,
    user: &AuthenticatedUser,
    query: &MetricsQuery,
    now: OffsetDateTime,
) -> Result<PipelineMetrics, ApiError> {
    let scope: ResolvedScope = resolve_scope(
        persistence,
        &config.visibility,
        user,
        query.organization_id,
        now,
    )?;
    let thresholds: EffectiveThresholds =
        effective_thresholds(persistence, config, scope.organization_id)?;
    let bids: Vec<Bid> = persistence
        .find_bids_by_organization(scope.organization_id, scope.owner_filter)
        .map_err(translate_persistence_error)?;
    compute_metrics(&bids, now, &thresholds).map_err(translate_domain_error)
}
