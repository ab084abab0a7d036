// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::TransitionResult;
use bidline_audit::{Actor, record_status_change, select_reason};
use bidline_domain::{
    Bid, BidDraft, BidEdit, DEFAULT_CURRENCY, PipelineStatus, StatusHistory, TransitionContext,
    normalize_text, validate_draft, validate_edit, validate_title, validate_transition,
};
use time::OffsetDateTime;

/// Builds a new bid from a draft.
///
/// The bid starts in the draft's initial status (`DRAFT` when absent) with
/// a single history entry recording the creating user. It has no id until
/// it is persisted.
///
/// # Arguments
///
/// * `draft` - The descriptive fields of the new bid
/// * `organization_id` - The owning organization, if any
/// * `actor` - The creating user, who becomes the bid's owner
/// * `now` - The creation timestamp
///
/// # Errors
///
/// Returns an error if:
/// - Any field fails validation
/// - The initial status is terminal
pub fn apply_create(
    draft: BidDraft,
    organization_id: Option<i64>,
    actor: Actor,
    now: OffsetDateTime,
) -> Result<Bid, CoreError> {
    validate_draft(&draft)?;

    let title: String = validate_title(&draft.title)?;
    let status: PipelineStatus = draft.initial_status.unwrap_or(PipelineStatus::Draft);

    let mut bid = Bid {
        bid_id: None,
        organization_id,
        owner_id: actor.user_id,
        platform: draft.platform,
        job_reference: normalize_text(draft.job_reference.as_deref()),
        client_name: normalize_text(draft.client_name.as_deref()),
        title,
        client_budget: normalize_text(draft.client_budget.as_deref()),
        proposed_price: draft.proposed_price,
        currency: normalize_currency(draft.currency.as_deref()),
        estimated_hours: draft.estimated_hours,
        skills: clean_tags(draft.skills),
        submission_date: draft.submission_date,
        current_status: status,
        status_history: StatusHistory::new(),
        last_status_at: None,
        final_outcome_at: None,
        probability: draft.probability,
        competitor_notes: normalize_text(draft.competitor_notes.as_deref()),
        risk_flags: clean_tags(draft.risk_flags),
        internal_comments: normalize_text(draft.internal_comments.as_deref()),
        interview_date: None,
        interview_outcome: None,
        loss_reason: None,
        loss_reason_other: None,
        withdrawal_reason: None,
        final_agreed_price: None,
        expected_start_date: None,
        final_scope_notes: None,
        version: 1,
        created_at: now,
        updated_at: now,
    };

    record_status_change(&mut bid, status, actor, None, now);

    Ok(bid)
}

/// Applies a command to a bid, producing a new bid.
///
/// The input bid is never modified. Access checks are the caller's
/// responsibility; this function enforces only the pipeline rules.
///
/// # Arguments
///
/// * `bid` - The current bid
/// * `command` - The command to apply
/// * `actor` - The user issuing the command
/// * `now` - The timestamp to record
///
/// # Errors
///
/// Returns an error if:
/// - The bid is terminal
/// - A field edit tries to change the status
/// - The transition is not an edge of the pipeline graph
/// - A field required by the target status is missing
pub fn apply(
    bid: &Bid,
    command: Command,
    actor: Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::Update { edit } => {
            validate_edit(bid, &edit)?;
            let new_bid: Bid = apply_edit(bid, edit, now)?;
            Ok(TransitionResult {
                new_bid,
                from: bid.current_status,
                to: bid.current_status,
            })
        }
        Command::Transition { target, context } => {
            validate_transition(bid, target, &context)?;
            let new_bid: Bid = apply_transition(bid, target, &context, actor, now);
            Ok(TransitionResult {
                new_bid,
                from: bid.current_status,
                to: target,
            })
        }
    }
}

fn apply_edit(bid: &Bid, edit: BidEdit, now: OffsetDateTime) -> Result<Bid, CoreError> {
    let mut new_bid: Bid = bid.clone();

    if let Some(platform) = edit.platform {
        new_bid.platform = platform;
    }
    if let Some(title) = edit.title {
        new_bid.title = validate_title(&title)?;
    }
    if let Some(value) = edit.job_reference {
        new_bid.job_reference = normalize_text(Some(&value));
    }
    if let Some(value) = edit.client_name {
        new_bid.client_name = normalize_text(Some(&value));
    }
    if let Some(value) = edit.client_budget {
        new_bid.client_budget = normalize_text(Some(&value));
    }
    if let Some(value) = edit.proposed_price {
        new_bid.proposed_price = Some(value);
    }
    if let Some(value) = edit.currency {
        new_bid.currency = normalize_currency(Some(&value));
    }
    if let Some(value) = edit.estimated_hours {
        new_bid.estimated_hours = Some(value);
    }
    if let Some(skills) = edit.skills {
        new_bid.skills = clean_tags(skills);
    }
    if let Some(value) = edit.submission_date {
        new_bid.submission_date = Some(value);
    }
    if let Some(value) = edit.probability {
        new_bid.probability = Some(value);
    }
    if let Some(value) = edit.competitor_notes {
        new_bid.competitor_notes = normalize_text(Some(&value));
    }
    if let Some(flags) = edit.risk_flags {
        new_bid.risk_flags = clean_tags(flags);
    }
    if let Some(value) = edit.internal_comments {
        new_bid.internal_comments = normalize_text(Some(&value));
    }
    if let Some(value) = edit.interview_date {
        new_bid.interview_date = Some(value);
    }
    if let Some(value) = edit.interview_outcome {
        new_bid.interview_outcome = Some(value);
    }

    new_bid.updated_at = now;
    Ok(new_bid)
}

fn apply_transition(
    bid: &Bid,
    target: PipelineStatus,
    context: &TransitionContext,
    actor: Actor,
    now: OffsetDateTime,
) -> Bid {
    let mut new_bid: Bid = bid.clone();

    if target == PipelineStatus::Interview && context.interview_date.is_some() {
        new_bid.interview_date = context.interview_date;
    }
    if bid.current_status == PipelineStatus::Interview && context.interview_outcome.is_some() {
        new_bid.interview_outcome = context.interview_outcome;
    }

    if target.is_terminal() {
        new_bid.final_outcome_at = Some(now);
        match target {
            PipelineStatus::Lost => {
                new_bid.loss_reason = context.loss_reason;
                new_bid.loss_reason_other = normalize_text(context.loss_reason_other.as_deref());
            }
            PipelineStatus::Withdrawn => {
                new_bid.withdrawal_reason = context.withdrawal_reason;
            }
            PipelineStatus::Won => {
                new_bid.final_agreed_price = context.final_agreed_price;
                new_bid.expected_start_date = context.expected_start_date;
                new_bid.final_scope_notes = normalize_text(context.final_scope_notes.as_deref());
            }
            _ => {}
        }
    }

    let reason: Option<String> = select_reason(
        new_bid.loss_reason_other.as_deref(),
        new_bid.loss_reason,
        new_bid.withdrawal_reason,
    );

    record_status_change(&mut new_bid, target, actor, reason, now);
    new_bid.last_status_at = Some(now);
    new_bid.updated_at = now;

    new_bid
}

fn normalize_currency(currency: Option<&str>) -> String {
    normalize_text(currency).map_or_else(
        || String::from(DEFAULT_CURRENCY),
        |c| c.to_ascii_uppercase(),
    )
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .filter_map(|tag| normalize_text(Some(&tag)))
        .collect()
}
