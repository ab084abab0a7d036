// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organization resolution and bid visibility checks.

use bidline_domain::{Bid, MemberRole, VisibilityPolicy};
use bidline_persistence::Persistence;
use time::OffsetDateTime;
use tracing::debug;

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, translate_persistence_error};

/// The organization a request operates on, and the owner filter the
/// caller's visibility scope imposes on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedScope {
    pub organization_id: i64,
    /// `Some(user_id)` when the caller sees only their own bids.
    pub owner_filter: Option<i64>,
}

/// Resolves the organization a request operates on.
///
/// An explicit organization requires membership. Without one, the
/// caller's default organization is used, created on first use.
///
/// # Errors
///
/// Returns `Forbidden` if the caller is not a member of the requested
/// organization.
pub fn resolve_organization(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    requested: Option<i64>,
    now: OffsetDateTime,
) -> Result<i64, ApiError> {
    if let Some(organization_id) = requested {
        let member: bool = persistence
            .is_member(organization_id, user.user_id)
            .map_err(translate_persistence_error)?;
        if !member {
            return Err(ApiError::Forbidden {
                message: format!("Not a member of organization {organization_id}"),
            });
        }
        return Ok(organization_id);
    }

    let organization_id: i64 = persistence
        .default_organization_for(user.user_id, now)
        .map_err(translate_persistence_error)?;
    debug!(
        user_id = user.user_id,
        organization_id, "Resolved default organization"
    );
    Ok(organization_id)
}

/// Returns true if the caller sees only their own bids in the organization.
///
/// A caller with no membership is confined to their own bids.
///
/// # Errors
///
/// Returns an error if the membership lookup fails.
pub fn is_owner_only_scope(
    persistence: &mut Persistence,
    policy: &VisibilityPolicy,
    user: &AuthenticatedUser,
    organization_id: i64,
) -> Result<bool, ApiError> {
    let role: Option<MemberRole> = persistence
        .role_of(organization_id, user.user_id)
        .map_err(translate_persistence_error)?;
    Ok(policy.scope_for(role).is_owner_only())
}

/// Resolves the organization and the caller's owner filter in one step.
///
/// # Errors
///
/// Returns `Forbidden` if the caller is not a member of the requested
/// organization.
pub fn resolve_scope(
    persistence: &mut Persistence,
    policy: &VisibilityPolicy,
    user: &AuthenticatedUser,
    requested: Option<i64>,
    now: OffsetDateTime,
) -> Result<ResolvedScope, ApiError> {
    let organization_id: i64 = resolve_organization(persistence, user, requested, now)?;
    let owner_only: bool = is_owner_only_scope(persistence, policy, user, organization_id)?;
    Ok(ResolvedScope {
        organization_id,
        owner_filter: owner_only.then_some(user.user_id),
    })
}

/// Checks that the caller may view and edit the bid.
///
/// A bid without an organization belongs to its owner alone. A bid in an
/// organization requires membership, and ownership when the caller's
/// scope is owner-only.
///
/// # Errors
///
/// Returns `Forbidden` if the caller may not access the bid.
pub fn assert_can_edit_or_view(
    persistence: &mut Persistence,
    policy: &VisibilityPolicy,
    bid: &Bid,
    user: &AuthenticatedUser,
) -> Result<(), ApiError> {
    let forbidden = || ApiError::Forbidden {
        message: String::from("You do not have access to this bid"),
    };

    let Some(organization_id) = bid.organization_id else {
        return if bid.is_owned_by(user.user_id) {
            Ok(())
        } else {
            Err(forbidden())
        };
    };

    let role: Option<MemberRole> = persistence
        .role_of(organization_id, user.user_id)
        .map_err(translate_persistence_error)?;
    if role.is_none() {
        return Err(forbidden());
    }
    if policy.scope_for(role).is_owner_only() && !bid.is_owned_by(user.user_id) {
        return Err(forbidden());
    }
    Ok(())
}
