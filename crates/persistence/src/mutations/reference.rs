// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use num_traits::ToPrimitive;
use std::collections::BTreeSet;
use time::Time;
use tracing::{debug, info};
use ward_roster_domain::{Rotation, RotationSlot, TaskCategory, format_time};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{
    assignment_groups, committees, monthly_tasks, rotation_days, rotations, shift_types,
};
use crate::error::PersistenceError;
use crate::queries::reference::{ensure_shift_types_exist, is_shift_type_referenced};

/// Creates a shift type.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the name is already taken.
pub fn create_shift_type(
    conn: &mut SqliteConnection,
    name: &str,
    start_time: Time,
    end_time: Time,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(shift_types::table)
        .values((
            shift_types::name.eq(name),
            shift_types::start_time.eq(format_time(start_time)),
            shift_types::end_time.eq(format_time(end_time)),
        ))
        .execute(conn)?;

    let shift_type_id: i64 = conn.get_last_insert_rowid()?;
    info!(shift_type_id, name, "Created shift type");
    Ok(shift_type_id)
}

/// Deletes a shift type that no shift uses.
///
/// Rotation days bound to the shift type are removed with it.
///
/// # Errors
///
/// Returns `PersistenceError::Referenced` if any shift still uses it and
/// `PersistenceError::NotFound` if it does not exist.
pub fn delete_shift_type(
    conn: &mut SqliteConnection,
    shift_type_id: i64,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if is_shift_type_referenced(conn, shift_type_id)? {
            return Err(PersistenceError::Referenced(format!(
                "Shift type {shift_type_id} is used by existing shifts"
            )));
        }

        let rows_affected: usize = diesel::delete(shift_types::table)
            .filter(shift_types::shift_type_id.eq(shift_type_id))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Shift type {shift_type_id} not found"
            )));
        }

        info!(shift_type_id, "Deleted shift type");
        Ok(())
    })
}

/// Creates an item in one task category.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the name is already taken in that
/// category.
pub fn create_task_item(
    conn: &mut SqliteConnection,
    category: TaskCategory,
    name: &str,
) -> Result<i64, PersistenceError> {
    category_tables!(category, |items, _links| {
        diesel::insert_into(items::table)
            .values(items::name.eq(name))
            .execute(conn)?
    });

    let item_id: i64 = conn.get_last_insert_rowid()?;
    info!(item_id, %category, name, "Created task item");
    Ok(item_id)
}

fn day_number_column(day_number: u32) -> Result<i32, PersistenceError> {
    day_number.to_i32().ok_or_else(|| {
        PersistenceError::QueryFailed(format!("Day number {day_number} is out of range"))
    })
}

/// Creates a rotation and its days in one transaction.
///
/// The rotation is expected to have passed domain validation.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the name is already taken and
/// `PersistenceError::ReferenceNotFound` if a day names an unknown shift type.
pub fn create_rotation(
    conn: &mut SqliteConnection,
    rotation: &Rotation,
) -> Result<i64, PersistenceError> {
    let length_in_days: i32 = day_number_column(rotation.length_in_days)?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let shift_type_ids: BTreeSet<i64> = rotation
            .days
            .iter()
            .filter_map(|d| match d.slot {
                RotationSlot::Work(shift_type_id) => Some(shift_type_id),
                RotationSlot::DayOff => None,
            })
            .collect();
        ensure_shift_types_exist(conn, &shift_type_ids)?;

        diesel::insert_into(rotations::table)
            .values((
                rotations::name.eq(&rotation.name),
                rotations::length_in_days.eq(length_in_days),
            ))
            .execute(conn)?;
        let rotation_id: i64 = conn.get_last_insert_rowid()?;

        for day in &rotation.days {
            let shift_type_id: Option<i64> = match day.slot {
                RotationSlot::Work(shift_type_id) => Some(shift_type_id),
                RotationSlot::DayOff => None,
            };
            diesel::insert_into(rotation_days::table)
                .values((
                    rotation_days::rotation_id.eq(rotation_id),
                    rotation_days::day_number.eq(day_number_column(day.day_number)?),
                    rotation_days::shift_type_id.eq(shift_type_id),
                    rotation_days::is_day_off.eq(i32::from(day.is_day_off())),
                ))
                .execute(conn)?;
        }
        debug!(rotation_id, days = rotation.days.len(), "Inserted rotation days");

        info!(rotation_id, name = %rotation.name, "Created rotation");
        Ok(rotation_id)
    })
}

/// Deletes a rotation and its days. Shifts already generated are kept.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the rotation does not exist.
pub fn delete_rotation(
    conn: &mut SqliteConnection,
    rotation_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(rotations::table)
        .filter(rotations::rotation_id.eq(rotation_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Rotation {rotation_id} not found"
        )));
    }

    info!(rotation_id, "Deleted rotation");
    Ok(())
}

/// Creates a monthly task.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the name is already taken.
pub fn create_monthly_task(conn: &mut SqliteConnection, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(monthly_tasks::table)
        .values(monthly_tasks::name.eq(name))
        .execute(conn)?;

    let monthly_task_id: i64 = conn.get_last_insert_rowid()?;
    info!(monthly_task_id, name, "Created monthly task");
    Ok(monthly_task_id)
}

/// Creates an assignment group.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the name is already taken.
pub fn create_assignment_group(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(assignment_groups::table)
        .values(assignment_groups::name.eq(name))
        .execute(conn)?;

    let group_id: i64 = conn.get_last_insert_rowid()?;
    info!(group_id, name, "Created assignment group");
    Ok(group_id)
}

/// Creates a committee.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the name is already taken.
pub fn create_committee(conn: &mut SqliteConnection, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(committees::table)
        .values(committees::name.eq(name))
        .execute(conn)?;

    let committee_id: i64 = conn.get_last_insert_rowid()?;
    info!(committee_id, name, "Created committee");
    Ok(committee_id)
}
