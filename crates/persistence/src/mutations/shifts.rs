// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift ledger mutations.
//!
//! Task sets are written with set-replace semantics: every membership row of
//! a shift is deleted and the new set inserted.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, info};
use ward_roster::ShiftScope;
use ward_roster_domain::{ReviewOutcome, ShiftDraft, TaskCategory, TaskSet};

use crate::backend::PersistenceBackend;
use crate::data_models::date_key;
use crate::diesel_schema::shifts;
use crate::error::PersistenceError;
use crate::queries::reference::{ensure_shift_types_exist, ensure_task_items_exist};
use crate::queries::staff::ensure_staff_exist;

/// Fails if any staff member, shift type or task item named by the drafts
/// does not exist.
///
/// # Errors
///
/// Returns `PersistenceError::ReferenceNotFound` naming the first missing row.
pub fn ensure_draft_references(
    conn: &mut SqliteConnection,
    drafts: &[ShiftDraft],
) -> Result<(), PersistenceError> {
    let staff_ids: BTreeSet<i64> = drafts.iter().map(|d| d.staff_id).collect();
    ensure_staff_exist(conn, &staff_ids)?;

    let shift_type_ids: BTreeSet<i64> = drafts.iter().map(|d| d.shift_type_id).collect();
    ensure_shift_types_exist(conn, &shift_type_ids)?;

    for category in TaskCategory::ALL {
        let item_ids: BTreeSet<i64> = drafts
            .iter()
            .flat_map(|d| d.tasks.get(category).iter().copied())
            .collect();
        ensure_task_items_exist(conn, category, &item_ids)?;
    }
    Ok(())
}

/// Replaces the four task sets of a shift.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn replace_task_sets(
    conn: &mut SqliteConnection,
    shift_id: i64,
    tasks: &TaskSet,
) -> Result<(), PersistenceError> {
    for category in TaskCategory::ALL {
        let rows: Vec<(i64, i64)> = tasks
            .get(category)
            .iter()
            .map(|item_id| (shift_id, *item_id))
            .collect();

        category_tables!(category, |_items, links| {
            diesel::delete(links::table)
                .filter(links::shift_id.eq(shift_id))
                .execute(conn)?;
            if !rows.is_empty() {
                let values: Vec<_> = rows
                    .iter()
                    .map(|(shift_id, item_id)| {
                        (links::shift_id.eq(*shift_id), links::item_id.eq(*item_id))
                    })
                    .collect();
                diesel::insert_into(links::table)
                    .values(values)
                    .execute(conn)?;
            }
        });
    }
    Ok(())
}

/// Inserts one shift with its task sets and returns its id.
///
/// The status starts as pending with no approval.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the staff member already holds
/// this shift type on this date.
pub fn insert_shift(
    conn: &mut SqliteConnection,
    draft: &ShiftDraft,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(shifts::table)
        .values((
            shifts::staff_id.eq(draft.staff_id),
            shifts::date.eq(date_key(draft.date)),
            shifts::shift_type_id.eq(draft.shift_type_id),
            shifts::notes.eq(draft.notes.as_deref()),
        ))
        .execute(conn)?;

    let shift_id: i64 = conn.get_last_insert_rowid()?;
    replace_task_sets(conn, shift_id, &draft.tasks)?;

    debug!(
        shift_id,
        staff_id = draft.staff_id,
        date = %draft.date,
        shift_type_id = draft.shift_type_id,
        "Inserted shift"
    );
    Ok(shift_id)
}

/// Creates a single shift.
///
/// # Errors
///
/// Returns `PersistenceError::ReferenceNotFound` for an unknown staff member,
/// shift type or task item, and `PersistenceError::Conflict` if the slot is
/// already taken.
pub fn create_shift(
    conn: &mut SqliteConnection,
    draft: &ShiftDraft,
) -> Result<i64, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        ensure_draft_references(conn, std::slice::from_ref(draft))?;
        let shift_id = insert_shift(conn, draft)?;
        info!(shift_id, staff_id = draft.staff_id, date = %draft.date, "Created shift");
        Ok(shift_id)
    })
}

/// Rewrites a shift's slot, notes and task sets. Review fields are kept.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the shift does not exist,
/// `PersistenceError::ReferenceNotFound` for an unknown reference and
/// `PersistenceError::Conflict` if the new slot is already taken.
pub fn update_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
    draft: &ShiftDraft,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        ensure_draft_references(conn, std::slice::from_ref(draft))?;

        let rows_affected: usize = diesel::update(shifts::table)
            .filter(shifts::shift_id.eq(shift_id))
            .set((
                shifts::staff_id.eq(draft.staff_id),
                shifts::date.eq(date_key(draft.date)),
                shifts::shift_type_id.eq(draft.shift_type_id),
                shifts::notes.eq(draft.notes.as_deref()),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Shift {shift_id} not found"
            )));
        }

        replace_task_sets(conn, shift_id, &draft.tasks)?;
        info!(shift_id, "Updated shift");
        Ok(())
    })
}

/// Deletes a shift and its task memberships.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the shift does not exist.
pub fn delete_shift(conn: &mut SqliteConnection, shift_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(shifts::table)
        .filter(shifts::shift_id.eq(shift_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Shift {shift_id} not found"
        )));
    }

    info!(shift_id, "Deleted shift");
    Ok(())
}

/// Deletes every shift in scope and returns how many were removed.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_shifts_in_scope(
    conn: &mut SqliteConnection,
    scope: &ShiftScope,
) -> Result<usize, PersistenceError> {
    let deleted: usize = match scope {
        ShiftScope::Date(date) => diesel::delete(shifts::table)
            .filter(shifts::date.eq(date_key(*date)))
            .execute(conn)?,
        ShiftScope::StaffRange { staff_ids, range } => {
            if staff_ids.is_empty() {
                0
            } else {
                diesel::delete(shifts::table)
                    .filter(shifts::staff_id.eq_any(staff_ids.clone()))
                    .filter(shifts::date.ge(date_key(range.start())))
                    .filter(shifts::date.le(date_key(range.end())))
                    .execute(conn)?
            }
        }
    };

    debug!(deleted, ?scope, "Deleted shifts in scope");
    Ok(deleted)
}

/// Writes one review outcome onto its shift.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the shift does not exist.
pub fn record_review(
    conn: &mut SqliteConnection,
    outcome: &ReviewOutcome,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(shifts::table)
        .filter(shifts::shift_id.eq(outcome.shift_id))
        .set((
            shifts::status.eq(outcome.status.as_str()),
            shifts::team_leader_notes.eq(Some(outcome.team_leader_notes.as_str())),
            shifts::is_approved_by_manager.eq(i32::from(outcome.is_approved_by_manager)),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Shift {} not found",
            outcome.shift_id
        )));
    }

    debug!(
        shift_id = outcome.shift_id,
        status = outcome.status.as_str(),
        approved = outcome.is_approved_by_manager,
        "Recorded review"
    );
    Ok(())
}
