// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Process-wide pipeline settings shared by every handler.

use std::str::FromStr;

use bidline_domain::{EffectiveThresholds, MemberRole, VisibilityPolicy};
use thiserror::Error;

/// Errors raised while assembling a [`PipelineConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The visibility preset name is not recognized.
    #[error("Unknown visibility preset '{0}'")]
    UnknownVisibilityPreset(String),
    /// A role name is not recognized.
    #[error("Unknown membership role '{0}'")]
    UnknownRole(String),
}

/// Named visibility policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityPreset {
    /// Only `PIPELINE_MANAGER` sees the whole organization.
    #[default]
    PipelineManagerOnly,
    /// `PIPELINE_MANAGER` and `ADMIN` see the whole organization.
    ManagersAndAdmins,
}

impl VisibilityPreset {
    #[must_use]
    pub fn policy(self) -> VisibilityPolicy {
        match self {
            Self::PipelineManagerOnly => VisibilityPolicy::pipeline_manager_only(),
            Self::ManagersAndAdmins => VisibilityPolicy::managers_and_admins(),
        }
    }
}

impl FromStr for VisibilityPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pipeline-manager-only" => Ok(Self::PipelineManagerOnly),
            "managers-and-admins" => Ok(Self::ManagersAndAdmins),
            _ => Err(ConfigError::UnknownVisibilityPreset(s.to_string())),
        }
    }
}

/// Settings every pipeline operation consults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineConfig {
    /// Which roles see every bid in their organization.
    pub visibility: VisibilityPolicy,
    /// Thresholds used where an organization stores none.
    pub default_thresholds: EffectiveThresholds,
}

impl PipelineConfig {
    /// Builds a configuration from a preset, optional explicit roles, and
    /// system-wide default thresholds.
    ///
    /// Explicit roles, when present, replace the preset.
    ///
    /// # Errors
    ///
    /// Returns an error if a role name is not recognized.
    pub fn from_parts(
        preset: VisibilityPreset,
        org_wide_roles: &[String],
        default_thresholds: EffectiveThresholds,
    ) -> Result<Self, ConfigError> {
        let visibility = if org_wide_roles.is_empty() {
            preset.policy()
        } else {
            let roles = org_wide_roles
                .iter()
                .map(|r| MemberRole::from_str(r).map_err(|_| ConfigError::UnknownRole(r.clone())))
                .collect::<Result<Vec<_>, _>>()?;
            VisibilityPolicy::new(&roles)
        };

        Ok(Self {
            visibility,
            default_thresholds,
        })
    }
}
