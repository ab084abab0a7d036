// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organization and membership writes.

use bidline_domain::{MemberRole, OrganizationThresholds, to_unix_millis};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{memberships, organizations};
use crate::error::PersistenceError;
use crate::queries::organizations::personal_organization_of;

#[derive(Insertable)]
#[diesel(table_name = organizations)]
struct NewOrganization<'a> {
    name: &'a str,
    personal_owner_id: Option<i64>,
    created_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = memberships)]
struct NewMembership<'a> {
    organization_id: i64,
    user_id: i64,
    role: &'a str,
    created_at: i64,
}

#[derive(AsChangeset)]
#[diesel(table_name = organizations)]
#[diesel(treat_none_as_null = true)]
struct ThresholdChanges {
    draft_aging_days: Option<i64>,
    follow_up_sla_days: Option<i64>,
    ghosted_suggest_days: Option<i64>,
}

fn insert_organization(
    conn: &mut SqliteConnection,
    name: &str,
    personal_owner_id: Option<i64>,
    owner_user_id: i64,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: i64 = to_unix_millis(now);

    diesel::insert_into(organizations::table)
        .values(&NewOrganization {
            name,
            personal_owner_id,
            created_at,
        })
        .execute(conn)?;
    let organization_id: i64 = get_last_insert_rowid(conn)?;

    diesel::insert_into(memberships::table)
        .values(&NewMembership {
            organization_id,
            user_id: owner_user_id,
            role: MemberRole::Owner.as_str(),
            created_at,
        })
        .execute(conn)?;

    Ok(organization_id)
}

/// Creates an organization with `owner_user_id` as its `OWNER`.
///
/// # Errors
///
/// Returns an error if the insert fails. Nothing is written in that case.
pub fn create_organization(
    conn: &mut SqliteConnection,
    name: &str,
    owner_user_id: i64,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let organization_id: i64 = conn.transaction::<_, PersistenceError, _>(|conn| {
        insert_organization(conn, name, None, owner_user_id, now)
    })?;

    info!(organization_id, owner_user_id, name, "Created organization");
    Ok(organization_id)
}

/// Returns the user's personal organization, creating it on first use.
///
/// # Errors
///
/// Returns an error if the lookup or insert fails.
pub fn ensure_personal_organization(
    conn: &mut SqliteConnection,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if let Some(organization_id) = personal_organization_of(conn, user_id)? {
            return Ok(organization_id);
        }

        let organization_id: i64 =
            insert_organization(conn, "Personal", Some(user_id), user_id, now)?;
        info!(organization_id, user_id, "Created personal organization");
        Ok(organization_id)
    })
}

/// Adds a user to an organization, or changes their role if already a member.
///
/// # Errors
///
/// Returns an error if the organization does not exist or the write fails.
pub fn upsert_membership(
    conn: &mut SqliteConnection,
    organization_id: i64,
    user_id: i64,
    role: MemberRole,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    diesel::insert_into(memberships::table)
        .values(&NewMembership {
            organization_id,
            user_id,
            role: role.as_str(),
            created_at: to_unix_millis(now),
        })
        .on_conflict((memberships::organization_id, memberships::user_id))
        .do_update()
        .set(memberships::role.eq(role.as_str()))
        .execute(conn)?;

    info!(organization_id, user_id, role = %role, "Set membership");
    Ok(())
}

/// Replaces an organization's stored thresholds. `None` clears a value.
///
/// # Errors
///
/// Returns `OrganizationNotFound` if the organization does not exist.
pub fn update_thresholds(
    conn: &mut SqliteConnection,
    organization_id: i64,
    thresholds: &OrganizationThresholds,
) -> Result<(), PersistenceError> {
    let changes = ThresholdChanges {
        draft_aging_days: thresholds.draft_aging_days.map(i64::from),
        follow_up_sla_days: thresholds.follow_up_sla_days.map(i64::from),
        ghosted_suggest_days: thresholds.ghosted_suggest_days.map(i64::from),
    };

    let updated: usize = diesel::update(
        organizations::table.filter(organizations::organization_id.eq(organization_id)),
    )
    .set(&changes)
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::OrganizationNotFound(organization_id));
    }

    info!(organization_id, ?thresholds, "Updated organization thresholds");
    Ok(())
}
