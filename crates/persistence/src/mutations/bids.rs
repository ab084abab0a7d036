// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid writes.
//!
//! Saves use the row's `version` column as a compare-and-swap guard.

use bidline_domain::Bid;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{BidValues, NewHistoryRow};
use crate::diesel_schema::{bid_status_history, bids};
use crate::error::PersistenceError;
use crate::queries::bids::bid_version;

/// Appends the history entries from position `from` onward.
fn append_history(
    conn: &mut SqliteConnection,
    bid_id: i64,
    bid: &Bid,
    from: usize,
) -> Result<usize, PersistenceError> {
    let rows: Vec<NewHistoryRow> = bid
        .status_history
        .entries()
        .iter()
        .enumerate()
        .skip(from)
        .map(|(index, entry)| {
            let sequence = i64::try_from(index).map_err(|_| {
                PersistenceError::SerializationError(format!(
                    "history position {index} out of range"
                ))
            })?;
            Ok(NewHistoryRow::from_entry(bid_id, sequence, entry))
        })
        .collect::<Result<_, PersistenceError>>()?;

    if rows.is_empty() {
        return Ok(0);
    }

    Ok(diesel::insert_into(bid_status_history::table)
        .values(&rows)
        .execute(conn)?)
}

/// Inserts a new bid and its history.
///
/// The stored bid starts at version 1.
///
/// # Returns
///
/// The bid with its assigned id.
///
/// # Errors
///
/// Returns an error if the insert fails. Nothing is written in that case.
pub fn insert_bid(conn: &mut SqliteConnection, bid: &Bid) -> Result<Bid, PersistenceError> {
    let values: BidValues = BidValues::from_bid(bid, 1)?;

    let bid_id: i64 = conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(bids::table).values(&values).execute(conn)?;
        let bid_id: i64 = get_last_insert_rowid(conn)?;
        append_history(conn, bid_id, bid, 0)?;
        Ok(bid_id)
    })?;

    info!(
        bid_id,
        organization_id = ?bid.organization_id,
        owner_id = bid.owner_id,
        status = %bid.current_status,
        "Inserted bid"
    );

    let mut stored: Bid = bid.clone();
    stored.bid_id = Some(bid_id);
    stored.version = 1;
    Ok(stored)
}

/// Saves a modified bid.
///
/// The write succeeds only if the stored version still equals
/// `bid.version`. The row and any new history entries are written in one
/// transaction, and the stored version is incremented.
///
/// # Returns
///
/// The bid carrying its new version.
///
/// # Errors
///
/// Returns `Conflict` if the bid was modified since it was read, or
/// `BidNotFound` if it no longer exists. Nothing is written in either case.
pub fn save_bid(conn: &mut SqliteConnection, bid: &Bid) -> Result<Bid, PersistenceError> {
    let bid_id: i64 = bid
        .bid_id
        .ok_or_else(|| PersistenceError::NotFound("Cannot save a bid without an id".to_string()))?;
    let expected_version: i64 = bid.version;
    let values: BidValues = BidValues::from_bid(bid, expected_version + 1)?;

    let appended: usize = conn.transaction::<_, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(
            bids::table
                .filter(bids::bid_id.eq(bid_id))
                .filter(bids::version.eq(expected_version)),
        )
        .set(&values)
        .execute(conn)?;

        if updated == 0 {
            return Err(match bid_version(conn, bid_id)? {
                Some(_) => PersistenceError::Conflict {
                    bid_id,
                    expected_version,
                },
                None => PersistenceError::BidNotFound(bid_id),
            });
        }

        let stored_entries: i64 = bid_status_history::table
            .filter(bid_status_history::bid_id.eq(bid_id))
            .count()
            .get_result(conn)?;
        let from: usize = usize::try_from(stored_entries).map_err(|_| {
            PersistenceError::CorruptRecord(format!("bid {bid_id}: invalid history length"))
        })?;

        append_history(conn, bid_id, bid, from)
    })?;

    debug!(bid_id, version = values.version, appended, "Saved bid");

    let mut stored: Bid = bid.clone();
    stored.version = values.version;
    Ok(stored)
}

/// Deletes a bid. Its history is removed by cascade.
///
/// # Errors
///
/// Returns `BidNotFound` if the bid does not exist.
pub fn delete_bid(conn: &mut SqliteConnection, bid_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(bids::table.filter(bids::bid_id.eq(bid_id))).execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::BidNotFound(bid_id));
    }

    info!(bid_id, "Deleted bid");
    Ok(())
}
