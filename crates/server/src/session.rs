// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Principal extraction for the server.
//!
//! The identity provider sits in front of this service and forwards the
//! caller's staff id in the `x-staff-id` header. This module turns that id
//! into an [`AuthenticatedStaff`] by loading the staff record.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use ward_roster_api::{AuthenticatedStaff, AuthenticationService};

use crate::{AppState, ErrorResponse};

/// Header carrying the caller's staff id.
pub const STAFF_ID_HEADER: &str = "x-staff-id";

/// Extractor for the authenticated staff member.
///
/// # Errors
///
/// Rejects with HTTP 401 if:
/// - The `x-staff-id` header is missing
/// - The header is not an integer
/// - The staff member does not exist or is inactive
pub struct StaffSession(pub AuthenticatedStaff);

impl FromRequestParts<AppState> for StaffSession {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(STAFF_ID_HEADER)
            .ok_or_else(|| {
                debug!("Missing staff id header");
                SessionError::MissingStaffHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid staff id header encoding");
                SessionError::InvalidStaffHeader
            })?;

        let staff_id: i64 = raw.trim().parse().map_err(|_| {
            warn!(header = raw, "Staff id header is not an integer");
            SessionError::InvalidStaffHeader
        })?;

        let mut persistence = state.persistence.lock().await;
        let principal: AuthenticatedStaff =
            AuthenticationService::authenticate(&mut persistence, staff_id).map_err(|e| {
                warn!(staff_id, error = %e, "Authentication failed");
                SessionError::AuthenticationFailed(e.to_string())
            })?;
        drop(persistence);

        debug!(
            staff_id,
            role = %principal.role,
            "Principal resolved"
        );

        Ok(Self(principal))
    }
}

/// Principal extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// The staff id header is missing.
    MissingStaffHeader,
    /// The staff id header is not a valid integer.
    InvalidStaffHeader,
    /// The staff member could not be authenticated.
    AuthenticationFailed(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingStaffHeader => format!("Missing {STAFF_ID_HEADER} header"),
            Self::InvalidStaffHeader => {
                format!("Invalid {STAFF_ID_HEADER} header. Expected an integer staff id")
            }
            Self::AuthenticationFailed(reason) => reason,
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: true,
                message,
            }),
        )
            .into_response()
    }
}
