// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bidline_domain::{BidEdit, PipelineStatus, TransitionContext};

/// A command represents caller intent against an existing bid, as data only.
///
/// Commands are the only way to request changes to a bid.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Edit non-status fields.
    Update {
        /// The fields to change.
        edit: BidEdit,
    },
    /// Move the bid to a new pipeline status.
    Transition {
        /// The status to enter.
        target: PipelineStatus,
        /// Fields required by, or recorded with, the target status.
        context: TransitionContext,
    },
}

impl Command {
    /// Returns the command name, for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Update { .. } => "UpdateBid",
            Self::Transition { .. } => "TransitionBid",
        }
    }
}
