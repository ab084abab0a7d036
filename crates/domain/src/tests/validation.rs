// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_bid;
use crate::{
    BidDraft, BidEdit, DomainError, InterviewOutcome, LossReason, Platform, PipelineStatus,
    TransitionContext, WithdrawalReason, fields, normalize_text, parse_date, validate_draft,
    validate_edit, validate_transition,
};

fn missing(field: &'static str) -> Result<(), DomainError> {
    Err(DomainError::MissingRequiredField { field })
}

#[test]
fn test_validate_draft_accepts_minimal_draft() {
    let draft = BidDraft::new(Platform::Upwork, "Build a dashboard");
    assert!(validate_draft(&draft).is_ok());
}

#[test]
fn test_validate_draft_rejects_blank_title() {
    let draft = BidDraft::new(Platform::Upwork, "   ");
    assert!(matches!(
        validate_draft(&draft),
        Err(DomainError::InvalidTitle(_))
    ));
}

#[test]
fn test_validate_draft_rejects_out_of_range_values() {
    let mut draft = BidDraft::new(Platform::Direct, "Audit");
    draft.probability = Some(1.2);
    assert_eq!(
        validate_draft(&draft),
        Err(DomainError::InvalidProbability(1.2))
    );

    let mut draft = BidDraft::new(Platform::Direct, "Audit");
    draft.proposed_price = Some(-5.0);
    assert_eq!(
        validate_draft(&draft),
        Err(DomainError::InvalidAmount {
            field: "proposedPrice",
            value: -5.0
        })
    );
}

#[test]
fn test_validate_draft_rejects_terminal_initial_status() {
    let mut draft = BidDraft::new(Platform::Direct, "Audit");
    draft.initial_status = Some(PipelineStatus::Won);
    assert_eq!(
        validate_draft(&draft),
        Err(DomainError::InvalidInitialStatus(PipelineStatus::Won))
    );

    draft.initial_status = Some(PipelineStatus::Submitted);
    assert!(validate_draft(&draft).is_ok());
}

#[test]
fn test_validate_edit_allows_same_status() {
    let bid = create_test_bid(1, PipelineStatus::Submitted, 1);
    let edit = BidEdit {
        current_status: Some(PipelineStatus::Submitted),
        title: Some(String::from("Renamed")),
        ..BidEdit::default()
    };
    assert!(validate_edit(&bid, &edit).is_ok());
}

#[test]
fn test_validate_edit_rejects_status_change() {
    let bid = create_test_bid(1, PipelineStatus::Submitted, 1);
    let edit = BidEdit {
        current_status: Some(PipelineStatus::Won),
        ..BidEdit::default()
    };
    assert_eq!(
        validate_edit(&bid, &edit),
        Err(DomainError::StatusChangeRequiresTransition {
            current: PipelineStatus::Submitted,
            requested: PipelineStatus::Won,
        })
    );
}

#[test]
fn test_validate_edit_rejects_terminal_bid() {
    let bid = create_test_bid(1, PipelineStatus::Ghosted, 1);
    let edit = BidEdit {
        title: Some(String::from("Renamed")),
        ..BidEdit::default()
    };
    assert_eq!(
        validate_edit(&bid, &edit),
        Err(DomainError::TerminalStateImmutable {
            status: PipelineStatus::Ghosted
        })
    );
}

#[test]
fn test_interview_requires_date() {
    let bid = create_test_bid(1, PipelineStatus::Submitted, 1);
    assert_eq!(
        validate_transition(&bid, PipelineStatus::Interview, &TransitionContext::default()),
        missing(fields::INTERVIEW_DATE)
    );

    let context = TransitionContext {
        interview_date: Some(parse_date("2026-02-01").unwrap()),
        ..TransitionContext::default()
    };
    assert!(validate_transition(&bid, PipelineStatus::Interview, &context).is_ok());
}

#[test]
fn test_interview_date_already_on_bid_satisfies_guard() {
    let mut bid = create_test_bid(1, PipelineStatus::Viewed, 1);
    bid.interview_date = Some(parse_date("2026-02-01").unwrap());
    assert!(
        validate_transition(&bid, PipelineStatus::Interview, &TransitionContext::default()).is_ok()
    );
}

#[test]
fn test_lost_requires_reason() {
    let mut bid = create_test_bid(1, PipelineStatus::Interview, 1);
    bid.interview_outcome = Some(InterviewOutcome::Negative);

    assert_eq!(
        validate_transition(&bid, PipelineStatus::Lost, &TransitionContext::default()),
        missing(fields::LOSS_REASON)
    );

    let other_without_text = TransitionContext {
        loss_reason: Some(LossReason::Other),
        loss_reason_other: Some(String::from("  ")),
        ..TransitionContext::default()
    };
    assert_eq!(
        validate_transition(&bid, PipelineStatus::Lost, &other_without_text),
        missing(fields::LOSS_REASON_OTHER)
    );

    let priced_out = TransitionContext {
        loss_reason: Some(LossReason::PriceTooHigh),
        ..TransitionContext::default()
    };
    assert!(validate_transition(&bid, PipelineStatus::Lost, &priced_out).is_ok());

    let free_text_only = TransitionContext {
        loss_reason_other: Some(String::from("Went in-house")),
        ..TransitionContext::default()
    };
    assert!(validate_transition(&bid, PipelineStatus::Lost, &free_text_only).is_ok());
}

#[test]
fn test_withdrawn_requires_reason() {
    let bid = create_test_bid(1, PipelineStatus::Draft, 1);
    assert_eq!(
        validate_transition(&bid, PipelineStatus::Withdrawn, &TransitionContext::default()),
        missing(fields::WITHDRAWAL_REASON)
    );

    let context = TransitionContext {
        withdrawal_reason: Some(WithdrawalReason::CapacityUnavailable),
        ..TransitionContext::default()
    };
    assert!(validate_transition(&bid, PipelineStatus::Withdrawn, &context).is_ok());
}

#[test]
fn test_won_requires_price_and_start_date() {
    let mut bid = create_test_bid(1, PipelineStatus::Interview, 1);
    bid.interview_outcome = Some(InterviewOutcome::Positive);

    let price_only = TransitionContext {
        final_agreed_price: Some(5_000.0),
        ..TransitionContext::default()
    };
    assert_eq!(
        validate_transition(&bid, PipelineStatus::Won, &price_only),
        missing(fields::EXPECTED_START_DATE)
    );

    let date_only = TransitionContext {
        expected_start_date: Some(parse_date("2026-03-01").unwrap()),
        ..TransitionContext::default()
    };
    assert_eq!(
        validate_transition(&bid, PipelineStatus::Won, &date_only),
        missing(fields::FINAL_AGREED_PRICE)
    );

    let both = TransitionContext {
        final_agreed_price: Some(5_000.0),
        expected_start_date: Some(parse_date("2026-03-01").unwrap()),
        ..TransitionContext::default()
    };
    assert!(validate_transition(&bid, PipelineStatus::Won, &both).is_ok());
}

#[test]
fn test_leaving_interview_requires_outcome() {
    let bid = create_test_bid(1, PipelineStatus::Interview, 1);
    let context = TransitionContext {
        final_agreed_price: Some(5_000.0),
        expected_start_date: Some(parse_date("2026-03-01").unwrap()),
        ..TransitionContext::default()
    };
    assert_eq!(
        validate_transition(&bid, PipelineStatus::Won, &context),
        missing(fields::INTERVIEW_OUTCOME)
    );

    let ghosted = TransitionContext::default();
    assert_eq!(
        validate_transition(&bid, PipelineStatus::Ghosted, &ghosted),
        missing(fields::INTERVIEW_OUTCOME)
    );

    let with_outcome = TransitionContext {
        interview_outcome: Some(InterviewOutcome::NoShow),
        ..TransitionContext::default()
    };
    assert!(validate_transition(&bid, PipelineStatus::Ghosted, &with_outcome).is_ok());
}

#[test]
fn test_graph_checked_before_guards() {
    let bid = create_test_bid(1, PipelineStatus::Draft, 1);
    assert_eq!(
        validate_transition(&bid, PipelineStatus::Won, &TransitionContext::default()),
        Err(DomainError::InvalidTransition {
            from: PipelineStatus::Draft,
            to: PipelineStatus::Won,
        })
    );
}

#[test]
fn test_terminal_bid_rejects_every_target() {
    for terminal in [
        PipelineStatus::Won,
        PipelineStatus::Lost,
        PipelineStatus::Ghosted,
        PipelineStatus::Withdrawn,
    ] {
        let bid = create_test_bid(1, terminal, 1);
        for target in PipelineStatus::ALL {
            assert_eq!(
                validate_transition(&bid, target, &TransitionContext::default()),
                Err(DomainError::TerminalStateImmutable { status: terminal })
            );
        }
    }
}

#[test]
fn test_normalize_text() {
    assert_eq!(normalize_text(Some("  hi ")), Some(String::from("hi")));
    assert_eq!(normalize_text(Some("   ")), None);
    assert_eq!(normalize_text(None), None);
}
