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
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod access;
mod backlog;
mod dates;
mod error;
mod metrics;
mod pagination;
mod status;
mod thresholds;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use access::{MemberRole, VisibilityPolicy, VisibilityScope};
pub use backlog::{BacklogKind, needs_review};
pub use dates::{
    cutoff, format_date, from_unix_millis, now_millis, parse_date, to_unix_millis,
    truncate_to_millis,
};
pub use metrics::{PipelineMetrics, compute_metrics};
pub use pagination::{Page, PageRequest, SortField, SortOrder};
pub use status::PipelineStatus;
pub use thresholds::{EffectiveThresholds, OrganizationThresholds};

// Re-export public types
pub use error::DomainError;
pub use types::{
    Bid, BidDraft, BidEdit, DEFAULT_CURRENCY, InterviewOutcome, LossReason, Platform,
    StatusHistory, StatusHistoryEntry, TransitionContext, WithdrawalReason,
};
pub use validation::{
    fields, normalize_text, validate_amount, validate_draft, validate_edit, validate_probability,
    validate_title, validate_transition, validate_transition_guards,
};
