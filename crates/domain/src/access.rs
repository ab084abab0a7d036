// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organization roles and the visibility policy derived from them.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A user's role within an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Owner,
    Admin,
    PipelineManager,
    Member,
}

impl MemberRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::PipelineManager => "PIPELINE_MANAGER",
            Self::Member => "MEMBER",
        }
    }
}

impl FromStr for MemberRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OWNER" => Ok(Self::Owner),
            "ADMIN" => Ok(Self::Admin),
            "PIPELINE_MANAGER" => Ok(Self::PipelineManager),
            "MEMBER" => Ok(Self::Member),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which bids of an organization a member may see and edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Only bids the member authored.
    OwnerOnly,
    /// Every bid in the organization.
    OrgWide,
}

impl VisibilityScope {
    /// Returns true for the owner-only scope.
    #[must_use]
    pub const fn is_owner_only(self) -> bool {
        matches!(self, Self::OwnerOnly)
    }
}

/// The set of roles granted org-wide visibility.
///
/// Every access decision in the system goes through [`VisibilityPolicy::scope_for`],
/// so the bid operations, backlogs, and metrics always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityPolicy {
    org_wide_roles: Vec<MemberRole>,
}

impl VisibilityPolicy {
    /// Creates a policy granting org-wide visibility to exactly `roles`.
    #[must_use]
    pub fn new(roles: &[MemberRole]) -> Self {
        let mut org_wide_roles = roles.to_vec();
        org_wide_roles.sort();
        org_wide_roles.dedup();
        Self { org_wide_roles }
    }

    /// Only pipeline managers see the whole organization.
    #[must_use]
    pub fn pipeline_manager_only() -> Self {
        Self::new(&[MemberRole::PipelineManager])
    }

    /// Pipeline managers and admins see the whole organization.
    #[must_use]
    pub fn managers_and_admins() -> Self {
        Self::new(&[MemberRole::PipelineManager, MemberRole::Admin])
    }

    /// Returns the roles granted org-wide visibility.
    #[must_use]
    pub fn org_wide_roles(&self) -> &[MemberRole] {
        &self.org_wide_roles
    }

    /// Resolves the visibility scope for a member's role.
    ///
    /// A user with no membership (`None`) is confined to their own bids.
    #[must_use]
    pub fn scope_for(&self, role: Option<MemberRole>) -> VisibilityScope {
        match role {
            Some(role) if self.org_wide_roles.contains(&role) => VisibilityScope::OrgWide,
            _ => VisibilityScope::OwnerOnly,
        }
    }
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self::pipeline_manager_only()
    }
}
