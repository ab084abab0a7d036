// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side queries.
//!
//! All queries use the Diesel DSL. Rows are converted to domain values
//! before leaving this module.

pub mod backlog;
pub mod bids;
pub mod organizations;

use crate::error::PersistenceError;

/// Converts a row offset to the type Diesel expects.
pub(crate) fn offset(skip: u64) -> Result<i64, PersistenceError> {
    i64::try_from(skip)
        .map_err(|_| PersistenceError::QueryFailed(format!("offset {skip} out of range")))
}

/// Converts a row count returned by `COUNT(*)`.
pub(crate) fn total(count: i64) -> Result<u64, PersistenceError> {
    u64::try_from(count)
        .map_err(|_| PersistenceError::QueryFailed(format!("invalid count {count}")))
}
