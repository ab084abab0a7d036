// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity.
//!
//! Authentication happens upstream. The gateway forwards the caller's
//! numeric user id, which this module validates and wraps.

use bidline_audit::Actor;

use crate::error::AuthError;

/// The header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// A caller whose identity has been established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The caller's user id.
    pub user_id: i64,
}

impl AuthenticatedUser {
    #[must_use]
    pub const fn new(user_id: i64) -> Self {
        Self { user_id }
    }

    /// Parses the forwarded user id header value.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the value is missing, blank, or
    /// not a positive integer.
    pub fn from_header_value(value: Option<&str>) -> Result<Self, AuthError> {
        let raw: &str = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Missing caller identity"),
            })?;

        match raw.parse::<i64>() {
            Ok(user_id) if user_id > 0 => Ok(Self { user_id }),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Malformed caller identity '{raw}'"),
            }),
        }
    }

    /// Converts this caller into the actor recorded in status history.
    #[must_use]
    pub const fn to_actor(&self) -> Actor {
        Actor::new(self.user_id)
    }
}
