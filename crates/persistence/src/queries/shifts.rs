// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift ledger queries.
//!
//! Shift rows are loaded first, then the four membership tables are read in
//! one query each for the whole batch and folded into task sets.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::BTreeMap;
use time::Date;
use tracing::debug;
use ward_roster_domain::{DateRange, Shift, TaskCategory, TaskSet};

use crate::data_models::{ShiftRow, date_key};
use crate::diesel_schema::{shift_types, shifts};
use crate::error::PersistenceError;

/// Loads the task sets of the given shifts, keyed by shift id.
///
/// Shifts with no memberships get an empty set.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_task_sets(
    conn: &mut SqliteConnection,
    shift_ids: &[i64],
) -> Result<BTreeMap<i64, TaskSet>, PersistenceError> {
    let mut sets: BTreeMap<i64, TaskSet> =
        shift_ids.iter().map(|id| (*id, TaskSet::new())).collect();
    if shift_ids.is_empty() {
        return Ok(sets);
    }

    for category in TaskCategory::ALL {
        let wanted: Vec<i64> = shift_ids.to_vec();
        let links: Vec<(i64, i64)> = category_tables!(category, |_items, links| {
            links::table
                .filter(links::shift_id.eq_any(wanted))
                .select((links::shift_id, links::item_id))
                .load(conn)?
        });
        for (shift_id, item_id) in links {
            sets.entry(shift_id).or_default().insert(category, item_id);
        }
    }

    Ok(sets)
}

fn hydrate(
    conn: &mut SqliteConnection,
    rows: Vec<ShiftRow>,
) -> Result<Vec<Shift>, PersistenceError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.shift_id).collect();
    let mut sets = load_task_sets(conn, &ids)?;
    rows.into_iter()
        .map(|row| {
            let tasks = sets.remove(&row.shift_id).unwrap_or_default();
            row.into_domain(tasks)
        })
        .collect()
}

/// Retrieves a shift with its task sets.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the shift is not found.
pub fn get_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<Option<Shift>, PersistenceError> {
    let result: Result<ShiftRow, diesel::result::Error> = shifts::table
        .filter(shifts::shift_id.eq(shift_id))
        .select(ShiftRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(hydrate(conn, vec![row])?.pop()),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Every shift on one date, ordered by shift type start time then staff.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn shifts_on_date(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<Vec<Shift>, PersistenceError> {
    debug!(%date, "Loading shifts for date");
    let rows: Vec<ShiftRow> = shifts::table
        .inner_join(shift_types::table)
        .filter(shifts::date.eq(date_key(date)))
        .select(ShiftRow::as_select())
        .order((
            shift_types::start_time.asc(),
            shifts::staff_id.asc(),
            shifts::shift_id.asc(),
        ))
        .load(conn)?;
    hydrate(conn, rows)
}

/// Every shift within the inclusive range, ordered by date then start time.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn shifts_in_range(
    conn: &mut SqliteConnection,
    range: DateRange,
) -> Result<Vec<Shift>, PersistenceError> {
    let rows: Vec<ShiftRow> = shifts::table
        .inner_join(shift_types::table)
        .filter(shifts::date.ge(date_key(range.start())))
        .filter(shifts::date.le(date_key(range.end())))
        .select(ShiftRow::as_select())
        .order((
            shifts::date.asc(),
            shift_types::start_time.asc(),
            shifts::shift_id.asc(),
        ))
        .load(conn)?;
    hydrate(conn, rows)
}

/// One staff member's shifts within the inclusive range, ordered by date
/// then start time.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn shifts_for_staff_in_range(
    conn: &mut SqliteConnection,
    staff_id: i64,
    range: DateRange,
) -> Result<Vec<Shift>, PersistenceError> {
    let rows: Vec<ShiftRow> = shifts::table
        .inner_join(shift_types::table)
        .filter(shifts::staff_id.eq(staff_id))
        .filter(shifts::date.ge(date_key(range.start())))
        .filter(shifts::date.le(date_key(range.end())))
        .select(ShiftRow::as_select())
        .order((shifts::date.asc(), shift_types::start_time.asc()))
        .load(conn)?;
    hydrate(conn, rows)
}

/// One staff member's shifts on or after `from`, ordered by date then start
/// time.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn shifts_for_staff_from(
    conn: &mut SqliteConnection,
    staff_id: i64,
    from: Date,
) -> Result<Vec<Shift>, PersistenceError> {
    let rows: Vec<ShiftRow> = shifts::table
        .inner_join(shift_types::table)
        .filter(shifts::staff_id.eq(staff_id))
        .filter(shifts::date.ge(date_key(from)))
        .select(ShiftRow::as_select())
        .order((shifts::date.asc(), shift_types::start_time.asc()))
        .load(conn)?;
    hydrate(conn, rows)
}
