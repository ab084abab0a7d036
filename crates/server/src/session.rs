// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity extraction for the server.
//!
//! Authentication happens at the gateway in front of this server, which
//! forwards the caller's user id in the `X-User-Id` header.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use bidline_api::{AuthError, AuthenticatedUser, USER_ID_HEADER};
use tracing::{debug, warn};

use crate::ErrorResponse;

/// Extractor for the calling user.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     Caller(user): Caller,
/// ) -> Result<Json<Response>, HttpError> {
///     // user: AuthenticatedUser
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 Unauthorized if the header is missing, not
/// valid UTF-8, or not a positive integer.
pub struct Caller(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw: Option<&str> = match parts.headers.get(USER_ID_HEADER) {
            Some(value) => Some(value.to_str().map_err(|_| {
                warn!("Caller identity header is not valid UTF-8");
                SessionError(String::from("Malformed caller identity"))
            })?),
            None => None,
        };

        let user: AuthenticatedUser = AuthenticatedUser::from_header_value(raw).map_err(|e| {
            warn!(error = %e, path = %parts.uri.path(), "Rejected request without a valid caller");
            let AuthError::AuthenticationFailed { reason } = e;
            SessionError(reason)
        })?;

        debug!(user_id = user.user_id, "Caller identified");

        Ok(Self(user))
    }
}

/// Caller identity rejection, rendered as a 401 error body.
#[derive(Debug)]
pub struct SessionError(String);

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: format!("Authentication failed: {}", self.0),
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
