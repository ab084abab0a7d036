// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

//! The API boundary of the bid pipeline.
//!
//! Handlers here resolve the caller's organization and visibility scope,
//! translate request strings into domain values, run core commands, and
//! persist the results. Errors from every lower layer are translated into
//! [`ApiError`] explicitly.

mod access;
mod auth;
mod config;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use access::{
    ResolvedScope, assert_can_edit_or_view, is_owner_only_scope, resolve_organization,
    resolve_scope,
};
pub use auth::{AuthenticatedUser, USER_ID_HEADER};
pub use config::{ConfigError, PipelineConfig, VisibilityPreset};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    bulk_delete_bids, create_bid, delete_bid, get_backlog, get_bid, get_metrics, list_bids,
    transition_bid, update_bid,
};
pub use request_response::{
    BacklogQuery, BidInfo, BulkDeleteRequest, BulkDeleteResponse, CreateBidRequest,
    DeleteBidResponse, ListBidsQuery, MetricsQuery, StatusHistoryInfo, TransitionBidRequest,
    UpdateBidRequest,
};
