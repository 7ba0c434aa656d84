// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Principal resolution and role checks.
//!
//! The identity provider is external. It hands the API a staff id; the API
//! loads that staff record and works only with its role and active flag.
//! Privileged operations are gated by [`can_manage`], never by inspecting
//! the role at each call site.

use crate::error::AuthError;
use ward_roster_domain::{Staff, StaffRole};
use ward_roster_persistence::SqlitePersistence;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedStaff {
    /// The caller's staff id.
    pub staff_id: i64,
    /// The caller's display name.
    pub display_name: String,
    /// The caller's role.
    pub role: StaffRole,
    /// Whether the caller's staff record is active.
    pub is_active: bool,
}

impl AuthenticatedStaff {
    /// Creates an authenticated principal.
    #[must_use]
    pub const fn new(staff_id: i64, display_name: String, role: StaffRole, is_active: bool) -> Self {
        Self {
            staff_id,
            display_name,
            role,
            is_active,
        }
    }
}

impl From<Staff> for AuthenticatedStaff {
    fn from(staff: Staff) -> Self {
        Self::new(staff.staff_id, staff.display_name, staff.role, staff.is_active)
    }
}

/// Returns true if the principal may perform manager operations.
///
/// Only active managers qualify.
#[must_use]
pub const fn can_manage(principal: &AuthenticatedStaff) -> bool {
    matches!(principal.role, StaffRole::Manager) && principal.is_active
}

/// Authorization checks for privileged operations.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the principal may perform a manager operation.
    ///
    /// # Arguments
    ///
    /// * `principal` - The authenticated caller
    /// * `action` - The operation name, used in the error
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if [`can_manage`] is false.
    pub fn require_manager(principal: &AuthenticatedStaff, action: &str) -> Result<(), AuthError> {
        if can_manage(principal) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Manager"),
            })
        }
    }
}

/// Resolves callers to staff records.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Loads the staff record behind a caller id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the staff member does not
    /// exist, is inactive, or cannot be loaded.
    pub fn authenticate(
        persistence: &mut SqlitePersistence,
        staff_id: i64,
    ) -> Result<AuthenticatedStaff, AuthError> {
        let staff: Staff = persistence
            .get_staff(staff_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("Unknown staff member: {staff_id}"),
            })?;

        if !staff.is_active {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Staff member is inactive"),
            });
        }

        Ok(AuthenticatedStaff::from(staff))
    }
}
