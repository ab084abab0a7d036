// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use bidline::CoreError;
use bidline_domain::DomainError;
use bidline_persistence::PersistenceError;
use tracing::error;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller's identity could not be established.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain, core, and persistence errors and
/// represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller's identity could not be established.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller may not see or change the resource.
    Forbidden {
        /// A human-readable description of the refusal.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The requested status is not reachable from the current one.
    InvalidTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// The target status requires a field that was not supplied.
    MissingRequiredField {
        /// The missing field.
        field: String,
    },
    /// The bid is terminal and cannot be changed.
    TerminalStateImmutable {
        /// The terminal status.
        status: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The resource changed since it was read.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { message } => write!(f, "Forbidden: {message}"),
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidTransition { from, to } => {
                write!(f, "Cannot transition bid from {from} to {to}")
            }
            Self::MissingRequiredField { field } => {
                write!(f, "Missing required field: {field}")
            }
            Self::TerminalStateImmutable { status } => {
                write!(f, "Bid is in terminal status {status} and cannot be modified")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
        }
    }
}

fn invalid_input(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidTransition { from, to } => ApiError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        },
        DomainError::MissingRequiredField { field } => ApiError::MissingRequiredField {
            field: (*field).to_string(),
        },
        DomainError::TerminalStateImmutable { status } => ApiError::TerminalStateImmutable {
            status: status.to_string(),
        },
        DomainError::StatusChangeRequiresTransition { .. } => invalid_input("currentStatus", &err),
        DomainError::InvalidInitialStatus(_) | DomainError::InvalidPipelineStatus(_) => {
            invalid_input("status", &err)
        }
        DomainError::InvalidPlatform(_) => invalid_input("platform", &err),
        DomainError::InvalidLossReason(_) => invalid_input("lossReason", &err),
        DomainError::InvalidWithdrawalReason(_) => invalid_input("withdrawalReason", &err),
        DomainError::InvalidInterviewOutcome(_) => invalid_input("interviewOutcome", &err),
        DomainError::InvalidRole(_) => invalid_input("role", &err),
        DomainError::InvalidSortOrder(_) => invalid_input("sort_order", &err),
        DomainError::InvalidTitle(_) => invalid_input("title", &err),
        DomainError::InvalidProbability(_) => invalid_input("probability", &err),
        DomainError::InvalidAmount { field, .. } => invalid_input(field, &err),
        DomainError::DateParseError { .. } => invalid_input("date", &err),
        DomainError::AggregationOverflow(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Storage failures become `Internal` and are logged at error level; the
/// client sees only a generic message.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::BidNotFound(bid_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Bid"),
            message: format!("Bid {bid_id} does not exist"),
        },
        PersistenceError::OrganizationNotFound(organization_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Organization"),
            message: format!("Organization {organization_id} does not exist"),
        },
        PersistenceError::Conflict { bid_id, .. } => ApiError::Conflict {
            message: format!("Bid {bid_id} was modified by another request; reload and retry"),
        },
        other => {
            error!(error = %other, "Storage failure");
            ApiError::Internal {
                message: String::from("A storage error occurred"),
            }
        }
    }
}
