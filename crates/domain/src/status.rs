// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pipeline status states and the transition graph.
//!
//! The graph is fixed at compile time. Status changes are always
//! caller-initiated; nothing in the system advances a bid based on time.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The stage a bid occupies in the sales pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStatus {
    /// Being written, not yet sent to the client
    Draft,
    /// Sent to the client
    Submitted,
    /// Client opened the proposal
    Viewed,
    /// Client requested an interview
    Interview,
    /// Contract awarded
    Won,
    /// Contract went elsewhere
    Lost,
    /// Client stopped responding
    Ghosted,
    /// We pulled the bid
    Withdrawn,
}

impl PipelineStatus {
    /// Every status, in pipeline order.
    pub const ALL: [Self; 8] = [
        Self::Draft,
        Self::Submitted,
        Self::Viewed,
        Self::Interview,
        Self::Won,
        Self::Lost,
        Self::Ghosted,
        Self::Withdrawn,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Viewed => "VIEWED",
            Self::Interview => "INTERVIEW",
            Self::Won => "WON",
            Self::Lost => "LOST",
            Self::Ghosted => "GHOSTED",
            Self::Withdrawn => "WITHDRAWN",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPipelineStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "SUBMITTED" => Ok(Self::Submitted),
            "VIEWED" => Ok(Self::Viewed),
            "INTERVIEW" => Ok(Self::Interview),
            "WON" => Ok(Self::Won),
            "LOST" => Ok(Self::Lost),
            "GHOSTED" => Ok(Self::Ghosted),
            "WITHDRAWN" => Ok(Self::Withdrawn),
            _ => Err(DomainError::InvalidPipelineStatus(s.to_string())),
        }
    }

    /// Returns true if this status is terminal (no outgoing transitions).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Won | Self::Lost | Self::Ghosted | Self::Withdrawn
        )
    }

    /// Returns the statuses reachable from this one in a single transition.
    #[must_use]
    pub const fn allowed_next(&self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Submitted, Self::Withdrawn],
            Self::Submitted => &[
                Self::Viewed,
                Self::Interview,
                Self::Ghosted,
                Self::Withdrawn,
            ],
            Self::Viewed => &[Self::Interview, Self::Ghosted],
            Self::Interview => &[Self::Won, Self::Lost, Self::Ghosted],
            Self::Won | Self::Lost | Self::Ghosted | Self::Withdrawn => &[],
        }
    }

    /// Returns true if `target` is reachable from this status in one step.
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        self.allowed_next().contains(&target)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// Terminal statuses are reported as immutable rather than as an
    /// invalid edge so callers can tell the two apart.
    ///
    /// # Errors
    ///
    /// Returns `TerminalStateImmutable` if this status is terminal, or
    /// `InvalidTransition` if `target` is not an edge of the graph.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::TerminalStateImmutable { status: *self });
        }

        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl FromStr for PipelineStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
