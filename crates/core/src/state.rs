// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bidline_domain::{Bid, PipelineStatus};

/// The result of successfully applying a command to a bid.
///
/// Application is atomic: it either produces a complete new bid or fails
/// without touching the input.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The bid after the command.
    pub new_bid: Bid,
    /// The status before the command.
    pub from: PipelineStatus,
    /// The status after the command. Equal to `from` for field edits.
    pub to: PipelineStatus,
}

impl TransitionResult {
    /// Returns true if the command changed the bid's status.
    #[must_use]
    pub fn status_changed(&self) -> bool {
        self.from != self.to
    }
}
