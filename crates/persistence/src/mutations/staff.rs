// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff registry mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;
use ward_roster_domain::StaffRole;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::staff;
use crate::error::PersistenceError;

/// Creates a staff member.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn create_staff(
    conn: &mut SqliteConnection,
    display_name: &str,
    role: StaffRole,
    is_active: bool,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(staff::table)
        .values((
            staff::display_name.eq(display_name),
            staff::role.eq(role.as_str()),
            staff::is_active.eq(i32::from(is_active)),
        ))
        .execute(conn)?;

    let staff_id: i64 = conn.get_last_insert_rowid()?;
    info!(staff_id, display_name, role = role.as_str(), "Created staff member");
    Ok(staff_id)
}

/// Updates a staff member's name, role and active flag.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the staff member does not exist.
pub fn update_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
    display_name: &str,
    role: StaffRole,
    is_active: bool,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(staff::table)
        .filter(staff::staff_id.eq(staff_id))
        .set((
            staff::display_name.eq(display_name),
            staff::role.eq(role.as_str()),
            staff::is_active.eq(i32::from(is_active)),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Staff member {staff_id} not found"
        )));
    }

    info!(staff_id, is_active, "Updated staff member");
    Ok(())
}

/// Deletes a staff member together with their shifts and monthly
/// assignments.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the staff member does not exist.
pub fn delete_staff(conn: &mut SqliteConnection, staff_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(staff::table)
        .filter(staff::staff_id.eq(staff_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Staff member {staff_id} not found"
        )));
    }

    info!(staff_id, "Deleted staff member and their roster entries");
    Ok(())
}
