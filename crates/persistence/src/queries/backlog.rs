// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backlog queries.
//!
//! Each backlog's filter, ordering, count, and page window run in the
//! database. They must select the same bids, in the same order, as
//! `BacklogKind::classify`.

use bidline_domain::{BacklogKind, Bid, LossReason, PipelineStatus, to_unix_millis};
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable};
use diesel::sqlite::Sqlite;
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::BidRow;
use crate::diesel_schema::bids;
use crate::error::PersistenceError;

diesel::define_sql_function!(fn coalesce(x: Nullable<BigInt>, y: BigInt) -> BigInt);

fn filtered(
    kind: BacklogKind,
    organization_id: i64,
    owner_id: Option<i64>,
    cutoff_ms: i64,
) -> bids::BoxedQuery<'static, Sqlite> {
    let statuses: Vec<&'static str> = kind.statuses().iter().map(PipelineStatus::as_str).collect();
    let query = super::bids::scoped(organization_id, owner_id)
        .filter(bids::current_status.eq_any(statuses));

    match kind {
        BacklogKind::DraftAging => query.filter(bids::created_at.le(cutoff_ms)),
        BacklogKind::FollowUp | BacklogKind::GhostedSuggestion => {
            query.filter(coalesce(bids::last_status_at, bids::created_at).le(cutoff_ms))
        }
        BacklogKind::Interview => query,
        BacklogKind::Review => {
            let lost_unexplained = bids::current_status
                .eq(PipelineStatus::Lost.as_str())
                .and(
                    bids::loss_reason.is_null().or(bids::loss_reason
                        .eq(LossReason::Other.as_str())
                        .and(
                            bids::loss_reason_other
                                .is_null()
                                .or(bids::loss_reason_other.eq("")),
                        )),
                );
            let withdrawn_unexplained = bids::current_status
                .eq(PipelineStatus::Withdrawn.as_str())
                .and(bids::withdrawal_reason.is_null());
            let won_incomplete = bids::current_status
                .eq(PipelineStatus::Won.as_str())
                .and(
                    bids::final_agreed_price
                        .is_null()
                        .or(bids::expected_start_date.is_null()),
                );
            query.filter(lost_unexplained.or(withdrawn_unexplained).or(won_incomplete))
        }
    }
}

/// Retrieves one page of a backlog plus the unpaged total.
///
/// `cutoff` is required for the time-based backlogs; when it is absent
/// they match nothing.
///
/// # Errors
///
/// Returns an error if the query fails or a stored bid is corrupt.
pub fn find_backlog_page(
    conn: &mut SqliteConnection,
    kind: BacklogKind,
    organization_id: i64,
    owner_id: Option<i64>,
    cutoff: Option<OffsetDateTime>,
    skip: u64,
    take: u32,
) -> Result<(Vec<Bid>, u64), PersistenceError> {
    let cutoff_ms: i64 = cutoff.map_or(i64::MIN, to_unix_millis);

    let total: i64 = filtered(kind, organization_id, owner_id, cutoff_ms)
        .count()
        .get_result(conn)?;

    let base = filtered(kind, organization_id, owner_id, cutoff_ms);
    let sorted = match kind {
        BacklogKind::DraftAging => base.order_by(bids::created_at.asc()),
        BacklogKind::FollowUp | BacklogKind::Interview | BacklogKind::GhostedSuggestion => {
            base.order_by(coalesce(bids::last_status_at, bids::created_at).asc())
        }
        BacklogKind::Review => base.order_by(bids::bid_id.asc()),
    };

    let rows: Vec<BidRow> = sorted
        .then_order_by(bids::bid_id.asc())
        .offset(super::offset(skip)?)
        .limit(i64::from(take))
        .select(BidRow::as_select())
        .load(conn)?;

    debug!(
        backlog = kind.as_str(),
        organization_id,
        ?owner_id,
        total,
        returned = rows.len(),
        "Loaded backlog page"
    );

    Ok((super::bids::hydrate(conn, rows)?, super::total(total)?))
}
