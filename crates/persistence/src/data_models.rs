// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row shapes and their conversion to domain types.
//!
//! Dates are stored as `YYYY-MM-DD` text, times as `HH:MM` text and
//! booleans as integers.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use time::Date;
use ward_roster_domain::{
    AssignmentStatus, MonthlyAssignment, RotationDay, RotationSlot, ShiftType, Staff, TaskSet,
    parse_date, parse_time,
};

use crate::diesel_schema::{monthly_assignments, rotation_days, shift_types, shifts, staff};
use crate::error::PersistenceError;

/// Formats a date for storage.
pub fn date_key(date: Date) -> String {
    date.to_string()
}

pub fn parse_status(value: &str) -> Result<AssignmentStatus, PersistenceError> {
    Ok(value.parse::<AssignmentStatus>()?)
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = staff)]
pub struct StaffRow {
    pub staff_id: i64,
    pub display_name: String,
    pub role: String,
    pub is_active: i32,
}

impl StaffRow {
    pub fn into_domain(self) -> Result<Staff, PersistenceError> {
        Ok(Staff {
            staff_id: self.staff_id,
            display_name: self.display_name,
            role: self.role.parse()?,
            is_active: self.is_active != 0,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_types)]
pub struct ShiftTypeRow {
    pub shift_type_id: i64,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
}

impl ShiftTypeRow {
    pub fn into_domain(self) -> Result<ShiftType, PersistenceError> {
        Ok(ShiftType {
            shift_type_id: self.shift_type_id,
            name: self.name,
            start_time: parse_time(&self.start_time)?,
            end_time: parse_time(&self.end_time)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = shifts)]
pub struct ShiftRow {
    pub shift_id: i64,
    pub staff_id: i64,
    pub date: String,
    pub shift_type_id: i64,
    pub notes: Option<String>,
    pub status: String,
    pub team_leader_notes: Option<String>,
    pub is_approved_by_manager: i32,
}

impl ShiftRow {
    /// Converts the row; task sets are filled in separately.
    pub fn into_domain(self, tasks: TaskSet) -> Result<ward_roster_domain::Shift, PersistenceError> {
        Ok(ward_roster_domain::Shift {
            shift_id: self.shift_id,
            staff_id: self.staff_id,
            date: parse_date(&self.date)?,
            shift_type_id: self.shift_type_id,
            tasks,
            notes: self.notes,
            status: parse_status(&self.status)?,
            team_leader_notes: self.team_leader_notes,
            is_approved_by_manager: self.is_approved_by_manager != 0,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = rotation_days)]
pub struct RotationDayRow {
    pub rotation_day_id: i64,
    pub rotation_id: i64,
    pub day_number: i32,
    pub shift_type_id: Option<i64>,
    pub is_day_off: i32,
}

impl RotationDayRow {
    /// A working day with no shift type is treated as a day off.
    pub fn into_domain(self) -> Result<RotationDay, PersistenceError> {
        let day_number: u32 = self.day_number.to_u32().ok_or_else(|| {
            PersistenceError::CorruptData(format!(
                "rotation day {} has day number {}",
                self.rotation_day_id, self.day_number
            ))
        })?;
        let slot = match (self.is_day_off != 0, self.shift_type_id) {
            (false, Some(shift_type_id)) => RotationSlot::Work(shift_type_id),
            _ => RotationSlot::DayOff,
        };
        Ok(RotationDay { day_number, slot })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = monthly_assignments)]
pub struct MonthlyAssignmentRow {
    pub monthly_assignment_id: i64,
    pub staff_id: i64,
    pub task_id: Option<i64>,
    pub start_date: String,
    pub end_date: String,
    pub group_id: Option<i64>,
    pub committee_id: Option<i64>,
    pub status: String,
    pub notes: String,
}

impl MonthlyAssignmentRow {
    pub fn into_domain(self) -> Result<MonthlyAssignment, PersistenceError> {
        Ok(MonthlyAssignment {
            monthly_assignment_id: self.monthly_assignment_id,
            staff_id: self.staff_id,
            task_id: self.task_id,
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            group_id: self.group_id,
            committee_id: self.committee_id,
            status: parse_status(&self.status)?,
            notes: self.notes,
        })
    }
}
