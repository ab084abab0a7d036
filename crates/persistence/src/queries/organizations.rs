// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Membership and organization lookups.

use bidline_domain::{MemberRole, OrganizationThresholds};
use diesel::SqliteConnection;
use diesel::prelude::*;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::diesel_schema::{memberships, organizations};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = organizations)]
struct ThresholdRow {
    draft_aging_days: Option<i64>,
    follow_up_sla_days: Option<i64>,
    ghosted_suggest_days: Option<i64>,
}

/// Returns the user's role in an organization, or `None` if they are not
/// a member.
///
/// # Errors
///
/// Returns an error if the query fails or the stored role is unknown.
pub fn role_of(
    conn: &mut SqliteConnection,
    organization_id: i64,
    user_id: i64,
) -> Result<Option<MemberRole>, PersistenceError> {
    let role: Option<String> = memberships::table
        .filter(memberships::organization_id.eq(organization_id))
        .filter(memberships::user_id.eq(user_id))
        .select(memberships::role)
        .first(conn)
        .optional()?;

    debug!(organization_id, user_id, ?role, "Resolved membership");

    role.map(|r| {
        MemberRole::from_str(&r).map_err(|e| {
            PersistenceError::CorruptRecord(format!(
                "membership of user {user_id} in organization {organization_id}: {e}"
            ))
        })
    })
    .transpose()
}

/// Returns the id of the user's personal organization, if one exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn personal_organization_of(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(organizations::table
        .filter(organizations::personal_owner_id.eq(user_id))
        .select(organizations::organization_id)
        .first(conn)
        .optional()?)
}

fn stored_days(organization_id: i64, field: &'static str, value: Option<i64>) -> Option<u32> {
    value.and_then(|days| match u32::try_from(days) {
        Ok(days) => Some(days),
        Err(_) => {
            warn!(
                organization_id,
                field,
                value = days,
                "Ignoring invalid stored threshold; using default"
            );
            None
        }
    })
}

/// Returns an organization's stored backlog thresholds.
///
/// Stored values that are not valid day counts are reported as absent.
///
/// # Errors
///
/// Returns `OrganizationNotFound` if the organization does not exist.
pub fn thresholds_of(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<OrganizationThresholds, PersistenceError> {
    let row: ThresholdRow = organizations::table
        .filter(organizations::organization_id.eq(organization_id))
        .select(ThresholdRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::OrganizationNotFound(organization_id))?;

    Ok(OrganizationThresholds {
        draft_aging_days: stored_days(organization_id, "draft_aging_days", row.draft_aging_days),
        follow_up_sla_days: stored_days(
            organization_id,
            "follow_up_sla_days",
            row.follow_up_sla_days,
        ),
        ghosted_suggest_days: stored_days(
            organization_id,
            "ghosted_suggest_days",
            row.ghosted_suggest_days,
        ),
    })
}
