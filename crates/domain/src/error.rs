// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::status::PipelineStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The target status is not reachable from the current status.
    InvalidTransition {
        /// The current status.
        from: PipelineStatus,
        /// The requested status.
        to: PipelineStatus,
    },
    /// A transition guard requires a field that was not supplied.
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
    /// The bid is in a terminal status and cannot be changed.
    TerminalStateImmutable {
        /// The terminal status the bid is in.
        status: PipelineStatus,
    },
    /// A field edit attempted to change the status directly.
    StatusChangeRequiresTransition {
        /// The current status.
        current: PipelineStatus,
        /// The status the edit tried to set.
        requested: PipelineStatus,
    },
    /// A bid cannot be created directly in a terminal status.
    InvalidInitialStatus(PipelineStatus),
    /// Pipeline status string is not recognized.
    InvalidPipelineStatus(String),
    /// Platform string is not recognized.
    InvalidPlatform(String),
    /// Loss reason string is not recognized.
    InvalidLossReason(String),
    /// Withdrawal reason string is not recognized.
    InvalidWithdrawalReason(String),
    /// Interview outcome string is not recognized.
    InvalidInterviewOutcome(String),
    /// Membership role string is not recognized.
    InvalidRole(String),
    /// Sort order string is not recognized.
    InvalidSortOrder(String),
    /// Bid title is empty.
    InvalidTitle(String),
    /// Probability is outside `[0, 1]`.
    InvalidProbability(f64),
    /// A monetary or effort amount is negative or not finite.
    InvalidAmount {
        /// The field holding the amount.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A metrics count is too large to average.
    AggregationOverflow(String),
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition { from, to } => {
                write!(f, "Cannot transition bid from {from} to {to}")
            }
            Self::MissingRequiredField { field } => {
                write!(f, "Missing required field: {field}")
            }
            Self::TerminalStateImmutable { status } => {
                write!(f, "Bid is in terminal status {status} and cannot be modified")
            }
            Self::StatusChangeRequiresTransition { current, requested } => {
                write!(
                    f,
                    "Status cannot be changed from {current} to {requested} by an edit; \
                     use a transition"
                )
            }
            Self::InvalidInitialStatus(status) => {
                write!(f, "Bids cannot be created in terminal status {status}")
            }
            Self::InvalidPipelineStatus(s) => write!(f, "Invalid pipeline status: '{s}'"),
            Self::InvalidPlatform(s) => write!(f, "Invalid platform: '{s}'"),
            Self::InvalidLossReason(s) => write!(f, "Invalid loss reason: '{s}'"),
            Self::InvalidWithdrawalReason(s) => write!(f, "Invalid withdrawal reason: '{s}'"),
            Self::InvalidInterviewOutcome(s) => write!(f, "Invalid interview outcome: '{s}'"),
            Self::InvalidRole(s) => write!(f, "Invalid membership role: '{s}'"),
            Self::InvalidSortOrder(s) => {
                write!(f, "Invalid sort order: '{s}'. Must be 'asc' or 'desc'")
            }
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidProbability(value) => {
                write!(f, "Invalid probability: {value}. Must be between 0 and 1")
            }
            Self::InvalidAmount { field, value } => {
                write!(f, "Invalid {field}: {value}. Must be a non-negative number")
            }
            Self::AggregationOverflow(count) => {
                write!(f, "Metrics aggregation overflowed at count {count}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
