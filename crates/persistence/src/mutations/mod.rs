// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Multi-row writes run inside a single transaction. The only raw SQL is
//! `last_insert_rowid()`, imported from the `backend` module.

pub mod bids;
pub mod organizations;
