// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what a caller is permitted to do without leaking
//! domain internals. They are advisory only and do not replace the checks
//! each operation performs.

use crate::auth::{AuthenticatedStaff, can_manage};
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::CapabilitiesResponse;
use std::collections::BTreeSet;
use time::Date;
use ward_roster_domain::{Shift, team_leader_scope};
use ward_roster_persistence::SqlitePersistence;

/// Returns true if the caller holds a team leader shift on `today`.
///
/// # Errors
///
/// Returns an error if the day's shifts cannot be loaded.
pub fn is_team_leader_on(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    today: Date,
) -> Result<bool, ApiError> {
    let shifts: Vec<Shift> = persistence
        .shifts_on_date(today)
        .map_err(|e| translate_persistence_error(e, "Shift"))?;
    let leader_ids: BTreeSet<i64> = persistence
        .team_leader_assignment_ids()
        .map_err(|e| translate_persistence_error(e, "Assignment"))?;
    Ok(team_leader_scope(principal.staff_id, today, &shifts, &leader_ids).is_some())
}

/// Computes the capability summary for the caller.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `principal` - The authenticated caller
/// * `today` - The caller's current date
///
/// # Errors
///
/// Returns an error if database queries fail.
pub fn compute_capabilities(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    today: Date,
) -> Result<CapabilitiesResponse, ApiError> {
    Ok(CapabilitiesResponse {
        staff_id: principal.staff_id,
        display_name: principal.display_name.clone(),
        role: principal.role.as_str().to_string(),
        can_manage: can_manage(principal),
        is_team_leader_today: is_team_leader_on(persistence, principal, today)?,
    })
}
