// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid lookups and paginated listing.

use std::collections::HashMap;

use bidline_audit::verify_history;
use bidline_domain::{Bid, PipelineStatus, SortField, SortOrder};
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use tracing::{debug, warn};

use crate::data_models::{BidRow, HistoryRow, bid_from_row, history_from_rows};
use crate::diesel_schema::{bid_status_history, bids};
use crate::error::PersistenceError;

/// Filters, ordering, and window for a paginated bid listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidListQuery {
    pub organization_id: i64,
    /// Restricts results to bids owned by this user.
    pub owner_id: Option<i64>,
    pub status: Option<PipelineStatus>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub skip: u64,
    pub take: u32,
}

/// The bids of one organization, optionally restricted to one owner.
pub(crate) fn scoped(
    organization_id: i64,
    owner_id: Option<i64>,
) -> bids::BoxedQuery<'static, Sqlite> {
    let mut query = bids::table
        .filter(bids::organization_id.eq(organization_id))
        .into_boxed();
    if let Some(owner_id) = owner_id {
        query = query.filter(bids::owner_id.eq(owner_id));
    }
    query
}

/// Bid ids bound per history query. SQLite caps bound variables at 32766.
const HISTORY_BATCH_SIZE: usize = 10_000;

/// Attaches status histories to bid rows, keeping row order.
///
/// Histories are fetched in batches of `HISTORY_BATCH_SIZE` bids. A history
/// that disagrees with the bid's current status is logged but does not
/// fail the load.
///
/// # Errors
///
/// Returns an error if a query fails or a row cannot be converted.
pub fn hydrate(
    conn: &mut SqliteConnection,
    rows: Vec<BidRow>,
) -> Result<Vec<Bid>, PersistenceError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.bid_id).collect();

    let mut by_bid: HashMap<i64, Vec<HistoryRow>> = HashMap::new();
    for batch in ids.chunks(HISTORY_BATCH_SIZE) {
        let history_rows: Vec<HistoryRow> = bid_status_history::table
            .filter(bid_status_history::bid_id.eq_any(batch))
            .order((
                bid_status_history::bid_id.asc(),
                bid_status_history::sequence.asc(),
            ))
            .select(HistoryRow::as_select())
            .load(conn)?;

        for row in history_rows {
            by_bid.entry(row.bid_id).or_default().push(row);
        }
    }

    rows.into_iter()
        .map(|row| {
            let history = history_from_rows(by_bid.remove(&row.bid_id).unwrap_or_default())?;
            let bid = bid_from_row(row, history)?;
            if let Err(e) = verify_history(&bid) {
                warn!(bid_id = ?bid.bid_id, error = %e, "Stored status history is inconsistent");
            }
            Ok(bid)
        })
        .collect()
}

/// Retrieves a bid by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored bid is corrupt.
/// Returns `Ok(None)` if the bid does not exist.
pub fn find_bid(
    conn: &mut SqliteConnection,
    bid_id: i64,
) -> Result<Option<Bid>, PersistenceError> {
    debug!(bid_id, "Looking up bid");

    let row: Option<BidRow> = bids::table
        .filter(bids::bid_id.eq(bid_id))
        .select(BidRow::as_select())
        .first(conn)
        .optional()?;

    match row {
        Some(row) => Ok(hydrate(conn, vec![row])?.pop()),
        None => Ok(None),
    }
}

/// Returns the stored version of a bid, if it exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn bid_version(
    conn: &mut SqliteConnection,
    bid_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(bids::table
        .filter(bids::bid_id.eq(bid_id))
        .select(bids::version)
        .first(conn)
        .optional()?)
}

/// Retrieves every bid of an organization in id order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored bid is corrupt.
pub fn find_bids_by_organization(
    conn: &mut SqliteConnection,
    organization_id: i64,
    owner_id: Option<i64>,
) -> Result<Vec<Bid>, PersistenceError> {
    let rows: Vec<BidRow> = scoped(organization_id, owner_id)
        .order(bids::bid_id.asc())
        .select(BidRow::as_select())
        .load(conn)?;

    debug!(
        organization_id,
        ?owner_id,
        count = rows.len(),
        "Loaded organization bids"
    );
    hydrate(conn, rows)
}

macro_rules! order_by_column {
    ($query:expr, $column:expr, $order:expr) => {
        match $order {
            SortOrder::Asc => $query
                .order_by($column.asc())
                .then_order_by(bids::bid_id.asc()),
            SortOrder::Desc => $query
                .order_by($column.desc())
                .then_order_by(bids::bid_id.desc()),
        }
    };
}

/// Retrieves one page of an organization's bids plus the unpaged total.
///
/// Ties on the sort column are broken by bid id in the same direction.
///
/// # Errors
///
/// Returns an error if the query fails or a stored bid is corrupt.
pub fn find_bids_page(
    conn: &mut SqliteConnection,
    query: &BidListQuery,
) -> Result<(Vec<Bid>, u64), PersistenceError> {
    let filtered = || {
        let mut q = scoped(query.organization_id, query.owner_id);
        if let Some(status) = query.status {
            q = q.filter(bids::current_status.eq(status.as_str()));
        }
        q
    };

    let total: i64 = filtered().count().get_result(conn)?;

    let base = filtered();
    let sorted = match query.sort_field {
        SortField::CreatedAt => order_by_column!(base, bids::created_at, query.sort_order),
        SortField::UpdatedAt => order_by_column!(base, bids::updated_at, query.sort_order),
        SortField::LastStatusAt => order_by_column!(base, bids::last_status_at, query.sort_order),
        SortField::SubmissionDate => {
            order_by_column!(base, bids::submission_date, query.sort_order)
        }
        SortField::ProposedPrice => order_by_column!(base, bids::proposed_price, query.sort_order),
        SortField::Title => order_by_column!(base, bids::title, query.sort_order),
        SortField::ClientName => order_by_column!(base, bids::client_name, query.sort_order),
    };

    let rows: Vec<BidRow> = sorted
        .offset(super::offset(query.skip)?)
        .limit(i64::from(query.take))
        .select(BidRow::as_select())
        .load(conn)?;

    debug!(
        organization_id = query.organization_id,
        total,
        returned = rows.len(),
        "Loaded bid page"
    );

    Ok((hydrate(conn, rows)?, super::total(total)?))
}
