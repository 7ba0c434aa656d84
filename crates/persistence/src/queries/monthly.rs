// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly assignment ledger queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use ward_roster_domain::{DateRange, MonthlyAssignment};

use crate::data_models::{MonthlyAssignmentRow, date_key};
use crate::diesel_schema::{monthly_assignments, monthly_tasks};
use crate::error::PersistenceError;

fn convert(rows: Vec<MonthlyAssignmentRow>) -> Result<Vec<MonthlyAssignment>, PersistenceError> {
    rows.into_iter()
        .map(MonthlyAssignmentRow::into_domain)
        .collect()
}

/// Retrieves a monthly assignment by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the assignment is not found.
pub fn get_monthly_assignment(
    conn: &mut SqliteConnection,
    monthly_assignment_id: i64,
) -> Result<Option<MonthlyAssignment>, PersistenceError> {
    let row: Option<MonthlyAssignmentRow> = monthly_assignments::table
        .filter(monthly_assignments::monthly_assignment_id.eq(monthly_assignment_id))
        .select(MonthlyAssignmentRow::as_select())
        .first(conn)
        .optional()?;
    row.map(MonthlyAssignmentRow::into_domain).transpose()
}

/// Every monthly assignment, newest start date first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_monthly_assignments(
    conn: &mut SqliteConnection,
) -> Result<Vec<MonthlyAssignment>, PersistenceError> {
    let rows: Vec<MonthlyAssignmentRow> = monthly_assignments::table
        .select(MonthlyAssignmentRow::as_select())
        .order((
            monthly_assignments::start_date.desc(),
            monthly_assignments::staff_id.asc(),
            monthly_assignments::monthly_assignment_id.asc(),
        ))
        .load(conn)?;
    convert(rows)
}

/// Assignments whose range overlaps `range`, ordered by task name.
///
/// Task-less records sort first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn monthly_assignments_overlapping(
    conn: &mut SqliteConnection,
    range: DateRange,
) -> Result<Vec<MonthlyAssignment>, PersistenceError> {
    let rows: Vec<MonthlyAssignmentRow> = monthly_assignments::table
        .left_join(monthly_tasks::table)
        .filter(monthly_assignments::end_date.ge(date_key(range.start())))
        .filter(monthly_assignments::start_date.le(date_key(range.end())))
        .select(MonthlyAssignmentRow::as_select())
        .order((
            monthly_tasks::name.nullable().asc(),
            monthly_assignments::staff_id.asc(),
            monthly_assignments::monthly_assignment_id.asc(),
        ))
        .load(conn)?;
    convert(rows)
}

/// Assignments stored for exactly this period.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn monthly_assignments_for_period(
    conn: &mut SqliteConnection,
    range: DateRange,
) -> Result<Vec<MonthlyAssignment>, PersistenceError> {
    let rows: Vec<MonthlyAssignmentRow> = monthly_assignments::table
        .filter(monthly_assignments::start_date.eq(date_key(range.start())))
        .filter(monthly_assignments::end_date.eq(date_key(range.end())))
        .select(MonthlyAssignmentRow::as_select())
        .order((
            monthly_assignments::staff_id.asc(),
            monthly_assignments::monthly_assignment_id.asc(),
        ))
        .load(conn)?;
    convert(rows)
}

/// One staff member's assignments overlapping `range`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn monthly_assignments_for_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
    range: DateRange,
) -> Result<Vec<MonthlyAssignment>, PersistenceError> {
    let rows: Vec<MonthlyAssignmentRow> = monthly_assignments::table
        .filter(monthly_assignments::staff_id.eq(staff_id))
        .filter(monthly_assignments::end_date.ge(date_key(range.start())))
        .filter(monthly_assignments::start_date.le(date_key(range.end())))
        .select(MonthlyAssignmentRow::as_select())
        .order((
            monthly_assignments::start_date.asc(),
            monthly_assignments::monthly_assignment_id.asc(),
        ))
        .load(conn)?;
    convert(rows)
}
