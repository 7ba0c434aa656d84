// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data queries.
//!
//! Shift types, the four task category item lists, rotations with their
//! days, monthly tasks, assignment groups and committees.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use ward_roster_domain::{
    AssignmentGroup, Committee, MonthlyTask, Rotation, RotationDay, ShiftType, TaskCategory,
    TaskItem, is_team_leader_assignment,
};

use crate::data_models::{RotationDayRow, ShiftTypeRow};
use crate::diesel_schema::{
    assignment_groups, committees, monthly_tasks, rotation_days, rotations, shift_types, shifts,
};
use crate::error::PersistenceError;
use crate::queries::ensure_all_found;

/// Lists shift types ordered by start time.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored time is invalid.
pub fn list_shift_types(conn: &mut SqliteConnection) -> Result<Vec<ShiftType>, PersistenceError> {
    let rows: Vec<ShiftTypeRow> = shift_types::table
        .select(ShiftTypeRow::as_select())
        .order((shift_types::start_time.asc(), shift_types::name.asc()))
        .load(conn)?;
    rows.into_iter().map(ShiftTypeRow::into_domain).collect()
}

/// Retrieves a shift type by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the shift type is not found.
pub fn get_shift_type(
    conn: &mut SqliteConnection,
    shift_type_id: i64,
) -> Result<Option<ShiftType>, PersistenceError> {
    let row: Option<ShiftTypeRow> = shift_types::table
        .filter(shift_types::shift_type_id.eq(shift_type_id))
        .select(ShiftTypeRow::as_select())
        .first(conn)
        .optional()?;
    row.map(ShiftTypeRow::into_domain).transpose()
}

/// Returns true if any shift still uses the shift type.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_shift_type_referenced(
    conn: &mut SqliteConnection,
    shift_type_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = shifts::table
        .filter(shifts::shift_type_id.eq(shift_type_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Fails if any of the given shift type ids does not exist.
///
/// # Errors
///
/// Returns `PersistenceError::ReferenceNotFound` naming the first missing id.
pub fn ensure_shift_types_exist(
    conn: &mut SqliteConnection,
    shift_type_ids: &BTreeSet<i64>,
) -> Result<(), PersistenceError> {
    if shift_type_ids.is_empty() {
        return Ok(());
    }
    let wanted: Vec<i64> = shift_type_ids.iter().copied().collect();
    let found: Vec<i64> = shift_types::table
        .filter(shift_types::shift_type_id.eq_any(wanted))
        .select(shift_types::shift_type_id)
        .load(conn)?;
    ensure_all_found("Shift type", shift_type_ids, &found)
}

/// Lists the items of one task category ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_task_items(
    conn: &mut SqliteConnection,
    category: TaskCategory,
) -> Result<Vec<TaskItem>, PersistenceError> {
    let rows: Vec<(i64, String)> = category_tables!(category, |items, _links| {
        items::table
            .select((items::item_id, items::name))
            .order((items::name.asc(), items::item_id.asc()))
            .load(conn)?
    });
    Ok(rows
        .into_iter()
        .map(|(item_id, name)| TaskItem {
            item_id,
            category,
            name,
        })
        .collect())
}

/// Id to name map for one task category.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn task_item_names(
    conn: &mut SqliteConnection,
    category: TaskCategory,
) -> Result<BTreeMap<i64, String>, PersistenceError> {
    Ok(list_task_items(conn, category)?
        .into_iter()
        .map(|item| (item.item_id, item.name))
        .collect())
}

/// Fails if any of the given item ids does not exist in the category.
///
/// # Errors
///
/// Returns `PersistenceError::ReferenceNotFound` naming the first missing id.
pub fn ensure_task_items_exist(
    conn: &mut SqliteConnection,
    category: TaskCategory,
    item_ids: &BTreeSet<i64>,
) -> Result<(), PersistenceError> {
    if item_ids.is_empty() {
        return Ok(());
    }
    let wanted: Vec<i64> = item_ids.iter().copied().collect();
    let found: Vec<i64> = category_tables!(category, |items, _links| {
        items::table
            .filter(items::item_id.eq_any(wanted))
            .select(items::item_id)
            .load(conn)?
    });
    ensure_all_found(&format!("{category} task"), item_ids, &found)
}

/// Main assignment ids whose names mark a team leader.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn team_leader_assignment_ids(
    conn: &mut SqliteConnection,
) -> Result<BTreeSet<i64>, PersistenceError> {
    Ok(list_task_items(conn, TaskCategory::Main)?
        .into_iter()
        .filter(|item| is_team_leader_assignment(&item.name))
        .map(|item| item.item_id)
        .collect())
}

fn load_rotation_days(
    conn: &mut SqliteConnection,
    rotation_id: i64,
) -> Result<Vec<RotationDay>, PersistenceError> {
    let rows: Vec<RotationDayRow> = rotation_days::table
        .filter(rotation_days::rotation_id.eq(rotation_id))
        .select(RotationDayRow::as_select())
        .order(rotation_days::day_number.asc())
        .load(conn)?;
    rows.into_iter().map(RotationDayRow::into_domain).collect()
}

/// Retrieves a rotation with its days ordered by day number.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the rotation is not found.
pub fn get_rotation(
    conn: &mut SqliteConnection,
    rotation_id: i64,
) -> Result<Option<Rotation>, PersistenceError> {
    let row: Option<(i64, String, i32)> = rotations::table
        .filter(rotations::rotation_id.eq(rotation_id))
        .select((
            rotations::rotation_id,
            rotations::name,
            rotations::length_in_days,
        ))
        .first(conn)
        .optional()?;

    let Some((rotation_id, name, length_in_days)) = row else {
        return Ok(None);
    };
    let days = load_rotation_days(conn, rotation_id)?;
    let length_in_days = u32::try_from(length_in_days).map_err(|_| {
        PersistenceError::CorruptData(format!(
            "rotation {rotation_id} has length {length_in_days}"
        ))
    })?;
    Ok(Some(
        Rotation::new(&name, length_in_days, days).with_id(rotation_id),
    ))
}

/// Lists rotations with their days, ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_rotations(conn: &mut SqliteConnection) -> Result<Vec<Rotation>, PersistenceError> {
    let ids: Vec<i64> = rotations::table
        .select(rotations::rotation_id)
        .order(rotations::name.asc())
        .load(conn)?;

    let mut result: Vec<Rotation> = Vec::with_capacity(ids.len());
    for rotation_id in ids {
        if let Some(rotation) = get_rotation(conn, rotation_id)? {
            result.push(rotation);
        }
    }
    Ok(result)
}

/// Lists monthly tasks ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_monthly_tasks(
    conn: &mut SqliteConnection,
) -> Result<Vec<MonthlyTask>, PersistenceError> {
    let rows: Vec<(i64, String)> = monthly_tasks::table
        .select((monthly_tasks::monthly_task_id, monthly_tasks::name))
        .order(monthly_tasks::name.asc())
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|(monthly_task_id, name)| MonthlyTask {
            monthly_task_id,
            name,
        })
        .collect())
}

/// Lists assignment groups ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_assignment_groups(
    conn: &mut SqliteConnection,
) -> Result<Vec<AssignmentGroup>, PersistenceError> {
    let rows: Vec<(i64, String)> = assignment_groups::table
        .select((assignment_groups::group_id, assignment_groups::name))
        .order(assignment_groups::name.asc())
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|(group_id, name)| AssignmentGroup { group_id, name })
        .collect())
}

/// Lists committees ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_committees(conn: &mut SqliteConnection) -> Result<Vec<Committee>, PersistenceError> {
    let rows: Vec<(i64, String)> = committees::table
        .select((committees::committee_id, committees::name))
        .order(committees::name.asc())
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|(committee_id, name)| Committee { committee_id, name })
        .collect())
}

/// Fails if a monthly task, group or committee referenced by a monthly
/// assignment does not exist.
///
/// # Errors
///
/// Returns `PersistenceError::ReferenceNotFound` naming the first missing id.
pub fn ensure_monthly_references_exist(
    conn: &mut SqliteConnection,
    task_ids: &BTreeSet<i64>,
    group_ids: &BTreeSet<i64>,
    committee_ids: &BTreeSet<i64>,
) -> Result<(), PersistenceError> {
    if !task_ids.is_empty() {
        let wanted: Vec<i64> = task_ids.iter().copied().collect();
        let found: Vec<i64> = monthly_tasks::table
            .filter(monthly_tasks::monthly_task_id.eq_any(wanted))
            .select(monthly_tasks::monthly_task_id)
            .load(conn)?;
        ensure_all_found("Monthly task", task_ids, &found)?;
    }
    if !group_ids.is_empty() {
        let wanted: Vec<i64> = group_ids.iter().copied().collect();
        let found: Vec<i64> = assignment_groups::table
            .filter(assignment_groups::group_id.eq_any(wanted))
            .select(assignment_groups::group_id)
            .load(conn)?;
        ensure_all_found("Assignment group", group_ids, &found)?;
    }
    if !committee_ids.is_empty() {
        let wanted: Vec<i64> = committee_ids.iter().copied().collect();
        let found: Vec<i64> = committees::table
            .filter(committees::committee_id.eq_any(wanted))
            .select(committees::committee_id)
            .load(conn)?;
        ensure_all_found("Committee", committee_ids, &found)?;
    }
    Ok(())
}
