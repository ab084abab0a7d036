// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Per-organization backlog thresholds as stored.
///
/// Any value may be absent, in which case the system default applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationThresholds {
    pub draft_aging_days: Option<u32>,
    pub follow_up_sla_days: Option<u32>,
    pub ghosted_suggest_days: Option<u32>,
}

/// Thresholds after defaults have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveThresholds {
    /// Days a draft may sit before it counts as aging.
    pub draft_aging_days: u32,
    /// Days after the last status change before a follow-up is due.
    pub follow_up_sla_days: u32,
    /// Days of silence before a bid is suggested as ghosted.
    pub ghosted_suggest_days: u32,
}

impl EffectiveThresholds {
    pub const DEFAULT_DRAFT_AGING_DAYS: u32 = 7;
    pub const DEFAULT_FOLLOW_UP_SLA_DAYS: u32 = 3;
    pub const DEFAULT_GHOSTED_SUGGEST_DAYS: u32 = 14;

    /// Overlays an organization's stored values on these defaults.
    #[must_use]
    pub fn resolve(&self, org: &OrganizationThresholds) -> Self {
        Self {
            draft_aging_days: org.draft_aging_days.unwrap_or(self.draft_aging_days),
            follow_up_sla_days: org.follow_up_sla_days.unwrap_or(self.follow_up_sla_days),
            ghosted_suggest_days: org
                .ghosted_suggest_days
                .unwrap_or(self.ghosted_suggest_days),
        }
    }
}

impl Default for EffectiveThresholds {
    fn default() -> Self {
        Self {
            draft_aging_days: Self::DEFAULT_DRAFT_AGING_DAYS,
            follow_up_sla_days: Self::DEFAULT_FOLLOW_UP_SLA_DAYS,
            ghosted_suggest_days: Self::DEFAULT_GHOSTED_SUGGEST_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_values_fall_back_to_defaults() {
        let effective = EffectiveThresholds::default().resolve(&OrganizationThresholds::default());
        assert_eq!(effective.draft_aging_days, 7);
        assert_eq!(effective.follow_up_sla_days, 3);
        assert_eq!(effective.ghosted_suggest_days, 14);
    }

    #[test]
    fn test_stored_values_override_defaults() {
        let org = OrganizationThresholds {
            draft_aging_days: Some(2),
            follow_up_sla_days: None,
            ghosted_suggest_days: Some(30),
        };
        let effective = EffectiveThresholds::default().resolve(&org);
        assert_eq!(effective.draft_aging_days, 2);
        assert_eq!(effective.follow_up_sla_days, 3);
        assert_eq!(effective.ghosted_suggest_days, 30);
    }

    #[test]
    fn test_custom_system_defaults() {
        let defaults = EffectiveThresholds {
            draft_aging_days: 1,
            follow_up_sla_days: 1,
            ghosted_suggest_days: 1,
        };
        let effective = defaults.resolve(&OrganizationThresholds {
            follow_up_sla_days: Some(5),
            ..OrganizationThresholds::default()
        });
        assert_eq!(effective.draft_aging_days, 1);
        assert_eq!(effective.follow_up_sla_days, 5);
    }
}
