// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly assignment ledger mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, info};
use ward_roster_domain::{DateRange, MonthlyAssignmentDraft};

use crate::backend::PersistenceBackend;
use crate::data_models::date_key;
use crate::diesel_schema::monthly_assignments;
use crate::error::PersistenceError;
use crate::queries::reference::ensure_monthly_references_exist;
use crate::queries::staff::ensure_staff_exist;

/// Fails if any staff member, task, group or committee named by the drafts
/// does not exist.
///
/// # Errors
///
/// Returns `PersistenceError::ReferenceNotFound` naming the first missing row.
pub fn ensure_monthly_draft_references(
    conn: &mut SqliteConnection,
    drafts: &[MonthlyAssignmentDraft],
) -> Result<(), PersistenceError> {
    let staff_ids: BTreeSet<i64> = drafts.iter().map(|d| d.staff_id).collect();
    ensure_staff_exist(conn, &staff_ids)?;

    let task_ids: BTreeSet<i64> = drafts.iter().filter_map(|d| d.task_id).collect();
    let group_ids: BTreeSet<i64> = drafts.iter().filter_map(|d| d.group_id).collect();
    let committee_ids: BTreeSet<i64> = drafts.iter().filter_map(|d| d.committee_id).collect();
    ensure_monthly_references_exist(conn, &task_ids, &group_ids, &committee_ids)
}

/// Inserts one monthly assignment and returns its id.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn insert_monthly_assignment(
    conn: &mut SqliteConnection,
    draft: &MonthlyAssignmentDraft,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(monthly_assignments::table)
        .values((
            monthly_assignments::staff_id.eq(draft.staff_id),
            monthly_assignments::task_id.eq(draft.task_id),
            monthly_assignments::start_date.eq(date_key(draft.start_date)),
            monthly_assignments::end_date.eq(date_key(draft.end_date)),
            monthly_assignments::group_id.eq(draft.group_id),
            monthly_assignments::committee_id.eq(draft.committee_id),
            monthly_assignments::status.eq(draft.status.as_str()),
            monthly_assignments::notes.eq(&draft.notes),
        ))
        .execute(conn)?;

    let monthly_assignment_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        monthly_assignment_id,
        staff_id = draft.staff_id,
        task_id = ?draft.task_id,
        "Inserted monthly assignment"
    );
    Ok(monthly_assignment_id)
}

/// Creates one monthly assignment.
///
/// # Errors
///
/// Returns `PersistenceError::ReferenceNotFound` for an unknown reference.
pub fn create_monthly_assignment(
    conn: &mut SqliteConnection,
    draft: &MonthlyAssignmentDraft,
) -> Result<i64, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        ensure_monthly_draft_references(conn, std::slice::from_ref(draft))?;
        let monthly_assignment_id = insert_monthly_assignment(conn, draft)?;
        info!(monthly_assignment_id, staff_id = draft.staff_id, "Created monthly assignment");
        Ok(monthly_assignment_id)
    })
}

/// Rewrites every field of a monthly assignment.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the assignment does not exist and
/// `PersistenceError::ReferenceNotFound` for an unknown reference.
pub fn update_monthly_assignment(
    conn: &mut SqliteConnection,
    monthly_assignment_id: i64,
    draft: &MonthlyAssignmentDraft,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        ensure_monthly_draft_references(conn, std::slice::from_ref(draft))?;

        let rows_affected: usize = diesel::update(monthly_assignments::table)
            .filter(monthly_assignments::monthly_assignment_id.eq(monthly_assignment_id))
            .set((
                monthly_assignments::staff_id.eq(draft.staff_id),
                monthly_assignments::task_id.eq(draft.task_id),
                monthly_assignments::start_date.eq(date_key(draft.start_date)),
                monthly_assignments::end_date.eq(date_key(draft.end_date)),
                monthly_assignments::group_id.eq(draft.group_id),
                monthly_assignments::committee_id.eq(draft.committee_id),
                monthly_assignments::status.eq(draft.status.as_str()),
                monthly_assignments::notes.eq(&draft.notes),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Monthly assignment {monthly_assignment_id} not found"
            )));
        }

        info!(monthly_assignment_id, "Updated monthly assignment");
        Ok(())
    })
}

/// Deletes one monthly assignment.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the assignment does not exist.
pub fn delete_monthly_assignment(
    conn: &mut SqliteConnection,
    monthly_assignment_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(monthly_assignments::table)
        .filter(monthly_assignments::monthly_assignment_id.eq(monthly_assignment_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Monthly assignment {monthly_assignment_id} not found"
        )));
    }

    info!(monthly_assignment_id, "Deleted monthly assignment");
    Ok(())
}

/// Deletes every assignment stored for exactly this period.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_monthly_for_period(
    conn: &mut SqliteConnection,
    range: DateRange,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(monthly_assignments::table)
        .filter(monthly_assignments::start_date.eq(date_key(range.start())))
        .filter(monthly_assignments::end_date.eq(date_key(range.end())))
        .execute(conn)?;

    debug!(deleted, start = %range.start(), end = %range.end(), "Deleted monthly assignments for period");
    Ok(deleted)
}
