// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_bid_in, create_test_actor, create_test_bid, test_time};
use crate::{Command, CoreError, TransitionResult, apply};
use bidline_domain::{
    Bid, DomainError, InterviewOutcome, LossReason, PipelineStatus, TransitionContext,
    WithdrawalReason, parse_date,
};

fn transition(
    bid: &Bid,
    target: PipelineStatus,
    context: TransitionContext,
) -> Result<TransitionResult, CoreError> {
    apply(
        bid,
        Command::Transition { target, context },
        create_test_actor(),
        test_time(30),
    )
}

#[test]
fn test_transition_appends_history_and_sets_last_status_at() {
    let bid = create_test_bid();

    let result = transition(&bid, PipelineStatus::Submitted, TransitionContext::default()).unwrap();

    assert!(result.status_changed());
    assert_eq!(result.from, PipelineStatus::Draft);
    assert_eq!(result.to, PipelineStatus::Submitted);

    let new_bid = result.new_bid;
    assert_eq!(new_bid.current_status, PipelineStatus::Submitted);
    assert_eq!(new_bid.status_history.len(), 2);
    assert_eq!(
        new_bid.status_history.last().map(|e| e.status),
        Some(new_bid.current_status)
    );
    assert_eq!(new_bid.last_status_at, Some(test_time(30)));
    assert_eq!(new_bid.final_outcome_at, None);
    // The input is untouched.
    assert_eq!(bid.current_status, PipelineStatus::Draft);
    assert_eq!(bid.status_history.len(), 1);
}

#[test]
fn test_illegal_transition_is_rejected() {
    let bid = create_test_bid();
    let result = transition(&bid, PipelineStatus::Interview, TransitionContext::default());

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidTransition {
            from: PipelineStatus::Draft,
            to: PipelineStatus::Interview,
        }))
    );
}

#[test]
fn test_interview_records_supplied_date() {
    for start in [PipelineStatus::Submitted, PipelineStatus::Viewed] {
        let bid = create_bid_in(start);
        let date = parse_date("2026-02-01").unwrap();

        let new_bid = transition(
            &bid,
            PipelineStatus::Interview,
            TransitionContext {
                interview_date: Some(date),
                ..TransitionContext::default()
            },
        )
        .unwrap()
        .new_bid;

        assert_eq!(new_bid.current_status, PipelineStatus::Interview);
        assert_eq!(new_bid.interview_date, Some(date));
    }
}

#[test]
fn test_interview_without_date_is_rejected() {
    let bid = create_bid_in(PipelineStatus::Viewed);
    let result = transition(&bid, PipelineStatus::Interview, TransitionContext::default());

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::MissingRequiredField {
                field: "InterviewDate"
            }
        ))
    );
}

#[test]
fn test_lost_records_reason_fields() {
    let bid = create_bid_in(PipelineStatus::Interview);

    let new_bid = transition(
        &bid,
        PipelineStatus::Lost,
        TransitionContext {
            loss_reason: Some(LossReason::PriceTooHigh),
            interview_outcome: Some(InterviewOutcome::Negative),
            ..TransitionContext::default()
        },
    )
    .unwrap()
    .new_bid;

    assert_eq!(new_bid.current_status, PipelineStatus::Lost);
    assert_eq!(new_bid.loss_reason, Some(LossReason::PriceTooHigh));
    assert_eq!(new_bid.interview_outcome, Some(InterviewOutcome::Negative));
    assert_eq!(new_bid.final_outcome_at, Some(test_time(30)));
    assert_eq!(
        new_bid.status_history.last().and_then(|e| e.reason.clone()),
        Some(String::from("PRICE_TOO_HIGH"))
    );
}

#[test]
fn test_lost_history_prefers_free_text_reason() {
    let bid = create_bid_in(PipelineStatus::Interview);

    let new_bid = transition(
        &bid,
        PipelineStatus::Lost,
        TransitionContext {
            loss_reason: Some(LossReason::Other),
            loss_reason_other: Some(String::from("Client froze hiring")),
            interview_outcome: Some(InterviewOutcome::Positive),
            ..TransitionContext::default()
        },
    )
    .unwrap()
    .new_bid;

    assert_eq!(
        new_bid.status_history.last().and_then(|e| e.reason.clone()),
        Some(String::from("Client froze hiring"))
    );
}

#[test]
fn test_withdrawn_records_withdrawal_reason() {
    let bid = create_test_bid();

    let new_bid = transition(
        &bid,
        PipelineStatus::Withdrawn,
        TransitionContext {
            withdrawal_reason: Some(WithdrawalReason::ClientRedFlags),
            ..TransitionContext::default()
        },
    )
    .unwrap()
    .new_bid;

    assert_eq!(new_bid.withdrawal_reason, Some(WithdrawalReason::ClientRedFlags));
    assert_eq!(
        new_bid.status_history.last().and_then(|e| e.reason.clone()),
        Some(String::from("CLIENT_RED_FLAGS"))
    );
}

#[test]
fn test_non_terminal_transition_ignores_outcome_fields() {
    let bid = create_test_bid();

    let new_bid = transition(
        &bid,
        PipelineStatus::Submitted,
        TransitionContext {
            loss_reason: Some(LossReason::Timeline),
            final_agreed_price: Some(10.0),
            ..TransitionContext::default()
        },
    )
    .unwrap()
    .new_bid;

    assert_eq!(new_bid.loss_reason, None);
    assert_eq!(new_bid.final_agreed_price, None);
    assert_eq!(new_bid.status_history.last().and_then(|e| e.reason.clone()), None);
}

#[test]
fn test_ghosted_from_submitted_needs_no_fields() {
    let bid = create_bid_in(PipelineStatus::Submitted);
    let new_bid = transition(&bid, PipelineStatus::Ghosted, TransitionContext::default())
        .unwrap()
        .new_bid;

    assert!(new_bid.is_terminal());
    assert_eq!(new_bid.final_outcome_at, Some(test_time(30)));
}

#[test]
fn test_terminal_bid_rejects_every_transition() {
    let bid = create_bid_in(PipelineStatus::Submitted);
    let ghosted = transition(&bid, PipelineStatus::Ghosted, TransitionContext::default())
        .unwrap()
        .new_bid;

    for target in PipelineStatus::ALL {
        assert_eq!(
            transition(&ghosted, target, TransitionContext::default()),
            Err(CoreError::DomainViolation(
                DomainError::TerminalStateImmutable {
                    status: PipelineStatus::Ghosted
                }
            ))
        );
    }
}
