// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the bid pipeline.
//!
//! This crate stores bids, their status histories, organizations, and
//! memberships in `SQLite` through Diesel.
//!
//! ## Storage conventions
//!
//! - Timestamps are UTC Unix milliseconds (`BIGINT`)
//! - Calendar dates are `YYYY-MM-DD` text
//! - Skills and risk flags are JSON arrays of strings
//! - Status history rows are append-only and ordered by `sequence`
//!
//! ## Concurrency
//!
//! Every bid row carries a `version`. Saving a bid compares the stored
//! version with the one the caller read; a mismatch writes nothing and
//! returns `PersistenceError::Conflict`.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory` gives every caller its own shared-cache
//! in-memory database, so tests never observe each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use bidline_domain::{BacklogKind, Bid, MemberRole, OrganizationThresholds};
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use queries::bids::BidListQuery;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The bid store and organization lookups, backed by one `SQLite`
/// connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter over a fresh in-memory database.
    ///
    /// Each call receives a unique database instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter over a database file, creating it if
    /// needed.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Organizations & Memberships
    // ========================================================================

    /// Creates an organization owned by `owner_user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_organization(
        &mut self,
        name: &str,
        owner_user_id: i64,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::organizations::create_organization(&mut self.conn, name, owner_user_id, now)
    }

    /// Resolves the user's default organization, creating a personal one
    /// with the user as `OWNER` on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or insert fails.
    pub fn default_organization_for(
        &mut self,
        user_id: i64,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::organizations::ensure_personal_organization(&mut self.conn, user_id, now)
    }

    /// Adds a member, or changes an existing member's role.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization does not exist or the write fails.
    pub fn add_member(
        &mut self,
        organization_id: i64,
        user_id: i64,
        role: MemberRole,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::organizations::upsert_membership(
            &mut self.conn,
            organization_id,
            user_id,
            role,
            now,
        )
    }

    /// Returns the user's role in the organization, if they are a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn role_of(
        &mut self,
        organization_id: i64,
        user_id: i64,
    ) -> Result<Option<MemberRole>, PersistenceError> {
        queries::organizations::role_of(&mut self.conn, organization_id, user_id)
    }

    /// Returns true if the user belongs to the organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn is_member(
        &mut self,
        organization_id: i64,
        user_id: i64,
    ) -> Result<bool, PersistenceError> {
        Ok(self.role_of(organization_id, user_id)?.is_some())
    }

    /// Returns the organization's stored backlog thresholds.
    ///
    /// # Errors
    ///
    /// Returns `OrganizationNotFound` if the organization does not exist.
    pub fn thresholds_of(
        &mut self,
        organization_id: i64,
    ) -> Result<OrganizationThresholds, PersistenceError> {
        queries::organizations::thresholds_of(&mut self.conn, organization_id)
    }

    /// Replaces the organization's stored backlog thresholds.
    ///
    /// # Errors
    ///
    /// Returns `OrganizationNotFound` if the organization does not exist.
    pub fn update_thresholds(
        &mut self,
        organization_id: i64,
        thresholds: &OrganizationThresholds,
    ) -> Result<(), PersistenceError> {
        mutations::organizations::update_thresholds(&mut self.conn, organization_id, thresholds)
    }

    // ========================================================================
    // Bids
    // ========================================================================

    /// Stores a new bid.
    ///
    /// # Returns
    ///
    /// The bid with its assigned id and version 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_bid(&mut self, bid: &Bid) -> Result<Bid, PersistenceError> {
        mutations::bids::insert_bid(&mut self.conn, bid)
    }

    /// Saves a modified bid if nobody else has saved it since it was read.
    ///
    /// # Returns
    ///
    /// The bid carrying its new version.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` on a version mismatch or `BidNotFound` if the bid
    /// was deleted.
    pub fn save_bid(&mut self, bid: &Bid) -> Result<Bid, PersistenceError> {
        mutations::bids::save_bid(&mut self.conn, bid)
    }

    /// Deletes a bid and its history.
    ///
    /// # Errors
    ///
    /// Returns `BidNotFound` if the bid does not exist.
    pub fn remove_bid(&mut self, bid_id: i64) -> Result<(), PersistenceError> {
        mutations::bids::delete_bid(&mut self.conn, bid_id)
    }

    /// Retrieves a bid by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored bid is corrupt.
    pub fn find_bid(&mut self, bid_id: i64) -> Result<Option<Bid>, PersistenceError> {
        queries::bids::find_bid(&mut self.conn, bid_id)
    }

    /// Retrieves every bid of an organization, optionally for one owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored bid is corrupt.
    pub fn find_bids_by_organization(
        &mut self,
        organization_id: i64,
        owner_id: Option<i64>,
    ) -> Result<Vec<Bid>, PersistenceError> {
        queries::bids::find_bids_by_organization(&mut self.conn, organization_id, owner_id)
    }

    /// Retrieves one sorted, filtered page of an organization's bids.
    ///
    /// # Returns
    ///
    /// The page of bids and the unpaged total.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored bid is corrupt.
    pub fn find_bids_page(
        &mut self,
        query: &BidListQuery,
    ) -> Result<(Vec<Bid>, u64), PersistenceError> {
        queries::bids::find_bids_page(&mut self.conn, query)
    }

    /// Retrieves one page of a backlog.
    ///
    /// # Returns
    ///
    /// The page of bids and the unpaged total.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored bid is corrupt.
    pub fn find_backlog_page(
        &mut self,
        kind: BacklogKind,
        organization_id: i64,
        owner_id: Option<i64>,
        cutoff: Option<OffsetDateTime>,
        skip: u64,
        take: u32,
    ) -> Result<(Vec<Bid>, u64), PersistenceError> {
        queries::backlog::find_backlog_page(
            &mut self.conn,
            kind,
            organization_id,
            owner_id,
            cutoff,
            skip,
            take,
        )
    }
}
