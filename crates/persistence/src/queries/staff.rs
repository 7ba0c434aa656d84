// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff registry queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::BTreeSet;
use tracing::debug;
use ward_roster_domain::Staff;

use crate::data_models::StaffRow;
use crate::diesel_schema::staff;
use crate::error::PersistenceError;
use crate::queries::ensure_all_found;

/// Retrieves a staff member by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the staff member is not found.
pub fn get_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
) -> Result<Option<Staff>, PersistenceError> {
    debug!(staff_id, "Looking up staff member");

    let result: Result<StaffRow, diesel::result::Error> = staff::table
        .filter(staff::staff_id.eq(staff_id))
        .select(StaffRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists staff members ordered by display name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_staff(
    conn: &mut SqliteConnection,
    active_only: bool,
) -> Result<Vec<Staff>, PersistenceError> {
    let min_active: i32 = i32::from(active_only);
    let rows: Vec<StaffRow> = staff::table
        .filter(staff::is_active.ge(min_active))
        .select(StaffRow::as_select())
        .order((staff::display_name.asc(), staff::staff_id.asc()))
        .load(conn)?;
    rows.into_iter().map(StaffRow::into_domain).collect()
}

/// Counts staff members, active or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_staff(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let total: i64 = staff::table.select(count(staff::staff_id)).first(conn)?;
    debug!(total, "Counted staff");
    Ok(total)
}

/// Ids of every active staff member, ascending.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn active_staff_ids(conn: &mut SqliteConnection) -> Result<Vec<i64>, PersistenceError> {
    Ok(staff::table
        .filter(staff::is_active.eq(1))
        .select(staff::staff_id)
        .order(staff::staff_id.asc())
        .load(conn)?)
}

/// Fails if any of the given staff ids does not exist.
///
/// # Errors
///
/// Returns `PersistenceError::ReferenceNotFound` naming the first missing id.
pub fn ensure_staff_exist(
    conn: &mut SqliteConnection,
    staff_ids: &BTreeSet<i64>,
) -> Result<(), PersistenceError> {
    if staff_ids.is_empty() {
        return Ok(());
    }
    let wanted: Vec<i64> = staff_ids.iter().copied().collect();
    let found: Vec<i64> = staff::table
        .filter(staff::staff_id.eq_any(wanted))
        .select(staff::staff_id)
        .load(conn)?;
    ensure_all_found("Staff", staff_ids, &found)
}
