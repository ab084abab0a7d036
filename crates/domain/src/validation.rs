// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::status::PipelineStatus;
use crate::types::{Bid, BidDraft, BidEdit, LossReason, TransitionContext};

/// Field names reported by `MissingRequiredField`.
pub mod fields {
    pub const INTERVIEW_DATE: &str = "InterviewDate";
    pub const INTERVIEW_OUTCOME: &str = "InterviewOutcome";
    pub const LOSS_REASON: &str = "LossReason";
    pub const LOSS_REASON_OTHER: &str = "LossReasonOther";
    pub const WITHDRAWAL_REASON: &str = "WithdrawalReason";
    pub const FINAL_AGREED_PRICE: &str = "FinalAgreedPrice";
    pub const EXPECTED_START_DATE: &str = "ExpectedStartDate";
}

/// Treats whitespace-only text as absent and trims the rest.
#[must_use]
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validates and trims a bid title.
///
/// # Errors
///
/// Returns `DomainError::InvalidTitle` if the title is blank.
pub fn validate_title(title: &str) -> Result<String, DomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates that a probability lies in `[0, 1]`.
///
/// # Errors
///
/// Returns `DomainError::InvalidProbability` if it does not.
pub fn validate_probability(probability: Option<f64>) -> Result<(), DomainError> {
    match probability {
        Some(p) if !(0.0..=1.0).contains(&p) => Err(DomainError::InvalidProbability(p)),
        _ => Ok(()),
    }
}

/// Validates that an amount is finite and non-negative.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` naming `field` if it is not.
pub fn validate_amount(field: &'static str, amount: Option<f64>) -> Result<(), DomainError> {
    match amount {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(DomainError::InvalidAmount { field, value })
        }
        _ => Ok(()),
    }
}

/// Validates the fields of a new bid.
///
/// # Errors
///
/// Returns an error if:
/// - The title is blank
/// - The probability is outside `[0, 1]`
/// - The proposed price or estimated hours is negative or not finite
/// - The initial status is terminal
pub fn validate_draft(draft: &BidDraft) -> Result<(), DomainError> {
    validate_title(&draft.title)?;
    validate_probability(draft.probability)?;
    validate_amount("proposedPrice", draft.proposed_price)?;
    validate_amount("estimatedHours", draft.estimated_hours)?;

    if let Some(status) = draft.initial_status.filter(PipelineStatus::is_terminal) {
        return Err(DomainError::InvalidInitialStatus(status));
    }

    Ok(())
}

/// Validates a field edit against the bid it applies to.
///
/// A status equal to the current one is accepted and ignored.
///
/// # Errors
///
/// Returns an error if:
/// - The bid is terminal
/// - The edit tries to change the status
/// - Any supplied field is invalid
pub fn validate_edit(bid: &Bid, edit: &BidEdit) -> Result<(), DomainError> {
    if bid.is_terminal() {
        return Err(DomainError::TerminalStateImmutable {
            status: bid.current_status,
        });
    }

    if let Some(requested) = edit
        .current_status
        .filter(|requested| *requested != bid.current_status)
    {
        return Err(DomainError::StatusChangeRequiresTransition {
            current: bid.current_status,
            requested,
        });
    }

    if let Some(title) = &edit.title {
        validate_title(title)?;
    }
    validate_probability(edit.probability)?;
    validate_amount("proposedPrice", edit.proposed_price)?;
    validate_amount("estimatedHours", edit.estimated_hours)?;

    Ok(())
}

/// Checks the required-field guards for entering `target`.
///
/// Values already on the bid satisfy the interview guards; terminal-outcome
/// fields must arrive with the transition.
///
/// # Errors
///
/// Returns `DomainError::MissingRequiredField` naming the first missing
/// field, or `DomainError::InvalidAmount` for a bad final price.
pub fn validate_transition_guards(
    bid: &Bid,
    target: PipelineStatus,
    context: &TransitionContext,
) -> Result<(), DomainError> {
    match target {
        PipelineStatus::Interview => {
            if context.interview_date.is_none() && bid.interview_date.is_none() {
                return Err(missing(fields::INTERVIEW_DATE));
            }
        }
        PipelineStatus::Lost => {
            let other_text = normalize_text(context.loss_reason_other.as_deref());
            match context.loss_reason {
                Some(LossReason::Other) if other_text.is_none() => {
                    return Err(missing(fields::LOSS_REASON_OTHER));
                }
                None if other_text.is_none() => {
                    return Err(missing(fields::LOSS_REASON));
                }
                _ => {}
            }
        }
        PipelineStatus::Withdrawn => {
            if context.withdrawal_reason.is_none() {
                return Err(missing(fields::WITHDRAWAL_REASON));
            }
        }
        PipelineStatus::Won => {
            if context.final_agreed_price.is_none() {
                return Err(missing(fields::FINAL_AGREED_PRICE));
            }
            if context.expected_start_date.is_none() {
                return Err(missing(fields::EXPECTED_START_DATE));
            }
            validate_amount("finalAgreedPrice", context.final_agreed_price)?;
        }
        PipelineStatus::Draft
        | PipelineStatus::Submitted
        | PipelineStatus::Viewed
        | PipelineStatus::Ghosted => {}
    }

    if bid.current_status == PipelineStatus::Interview
        && target.is_terminal()
        && context.interview_outcome.is_none()
        && bid.interview_outcome.is_none()
    {
        return Err(missing(fields::INTERVIEW_OUTCOME));
    }

    Ok(())
}

/// Validates a complete transition request: graph edge, then field guards.
///
/// # Errors
///
/// Returns `TerminalStateImmutable`, `InvalidTransition`, or
/// `MissingRequiredField` as appropriate.
pub fn validate_transition(
    bid: &Bid,
    target: PipelineStatus,
    context: &TransitionContext,
) -> Result<(), DomainError> {
    bid.current_status.validate_transition(target)?;
    validate_transition_guards(bid, target, context)
}

const fn missing(field: &'static str) -> DomainError {
    DomainError::MissingRequiredField { field }
}
