// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::status::AssignmentStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, Time};

/// Role of a staff member.
///
/// The role decides whether a staff member may manage the roster and which
/// column of the daily detail their shifts are listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    /// Registered nurse.
    Nurse,
    /// Auxiliary (MAS) staff.
    AuxiliaryStaff,
    /// Nurse manager. Holds roster management rights.
    Manager,
}

impl StaffRole {
    /// Converts this role to its persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nurse => "NURSE",
            Self::AuxiliaryStaff => "MAS",
            Self::Manager => "MANAGER",
        }
    }

    /// Returns whether shifts held by this role are listed with nurses.
    ///
    /// Managers work nurse shifts; auxiliary staff are listed separately.
    #[must_use]
    pub const fn is_nursing(&self) -> bool {
        matches!(self, Self::Nurse | Self::Manager)
    }
}

impl FromStr for StaffRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NURSE" => Ok(Self::Nurse),
            "MAS" => Ok(Self::AuxiliaryStaff),
            "MANAGER" => Ok(Self::Manager),
            _ => Err(DomainError::InvalidStaffRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A staff member as seen by the roster.
///
/// Identity data is owned elsewhere; the roster reads the id, role and
/// active flag and keeps a display name for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub staff_id: i64,
    pub display_name: String,
    pub role: StaffRole,
    pub is_active: bool,
}

/// A named shift with fixed start and end times, e.g. "Morning".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftType {
    pub shift_type_id: i64,
    pub name: String,
    pub start_time: Time,
    pub end_time: Time,
}

/// One of the four independent task facets a shift can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Main assignment (e.g. "Team Leader").
    Main,
    /// Sub assignment.
    Sub,
    /// Clinic.
    Clinic,
    /// Emergency role.
    Emergency,
}

impl TaskCategory {
    /// Every category in form order.
    pub const ALL: [Self; 4] = [Self::Main, Self::Sub, Self::Clinic, Self::Emergency];

    /// Returns the prefix used for this category in posted form keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Sub => "sub",
            Self::Clinic => "clinic",
            Self::Emergency => "emergency",
        }
    }
}

impl FromStr for TaskCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Self::Main),
            "sub" => Ok(Self::Sub),
            "clinic" => Ok(Self::Clinic),
            "emergency" => Ok(Self::Emergency),
            _ => Err(DomainError::InvalidTaskCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A name-only task item belonging to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub item_id: i64,
    pub category: TaskCategory,
    pub name: String,
}

/// The four task sets attached to a shift.
///
/// Updates replace a whole set; there is no diffing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSet {
    pub assignments: BTreeSet<i64>,
    pub sub_assignments: BTreeSet<i64>,
    pub clinics: BTreeSet<i64>,
    pub emergency_roles: BTreeSet<i64>,
}

impl TaskSet {
    /// Creates an empty task set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the item ids held for a category.
    #[must_use]
    pub const fn get(&self, category: TaskCategory) -> &BTreeSet<i64> {
        match category {
            TaskCategory::Main => &self.assignments,
            TaskCategory::Sub => &self.sub_assignments,
            TaskCategory::Clinic => &self.clinics,
            TaskCategory::Emergency => &self.emergency_roles,
        }
    }

    /// Returns the item ids held for a category, mutably.
    pub const fn get_mut(&mut self, category: TaskCategory) -> &mut BTreeSet<i64> {
        match category {
            TaskCategory::Main => &mut self.assignments,
            TaskCategory::Sub => &mut self.sub_assignments,
            TaskCategory::Clinic => &mut self.clinics,
            TaskCategory::Emergency => &mut self.emergency_roles,
        }
    }

    /// Adds an item to a category.
    pub fn insert(&mut self, category: TaskCategory, item_id: i64) {
        self.get_mut(category).insert(item_id);
    }

    /// Replaces the whole set for a category.
    pub fn replace(&mut self, category: TaskCategory, item_ids: impl IntoIterator<Item = i64>) {
        *self.get_mut(category) = item_ids.into_iter().collect();
    }

    /// Returns true if no category holds any item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        TaskCategory::ALL.iter().all(|c| self.get(*c).is_empty())
    }
}

/// A persisted shift: one staff member, one date, one shift type.
///
/// At most one shift exists per `(staff_id, date, shift_type_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub shift_id: i64,
    pub staff_id: i64,
    pub date: Date,
    pub shift_type_id: i64,
    pub tasks: TaskSet,
    pub notes: Option<String>,
    pub status: AssignmentStatus,
    pub team_leader_notes: Option<String>,
    pub is_approved_by_manager: bool,
}

/// A shift that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDraft {
    pub staff_id: i64,
    pub date: Date,
    pub shift_type_id: i64,
    pub tasks: TaskSet,
    pub notes: Option<String>,
}

impl ShiftDraft {
    /// Creates a draft with no tasks and no notes.
    #[must_use]
    pub fn new(staff_id: i64, date: Date, shift_type_id: i64) -> Self {
        Self {
            staff_id,
            date,
            shift_type_id,
            tasks: TaskSet::new(),
            notes: None,
        }
    }

    /// Returns the natural key of the draft.
    #[must_use]
    pub const fn slot(&self) -> (i64, Date, i64) {
        (self.staff_id, self.date, self.shift_type_id)
    }
}

/// What a rotation prescribes for one day of its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "shift_type_id", rename_all = "snake_case")]
pub enum RotationSlot {
    /// No shift on this day.
    DayOff,
    /// Work a shift of the given type.
    Work(i64),
}

/// One day of a rotation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationDay {
    /// Position in the cycle, starting at 1.
    pub day_number: u32,
    pub slot: RotationSlot,
}

impl RotationDay {
    /// Creates a working day.
    #[must_use]
    pub const fn work(day_number: u32, shift_type_id: i64) -> Self {
        Self {
            day_number,
            slot: RotationSlot::Work(shift_type_id),
        }
    }

    /// Creates a day off.
    #[must_use]
    pub const fn day_off(day_number: u32) -> Self {
        Self {
            day_number,
            slot: RotationSlot::DayOff,
        }
    }

    /// Returns true if this is a day off.
    #[must_use]
    pub const fn is_day_off(&self) -> bool {
        matches!(self.slot, RotationSlot::DayOff)
    }
}

/// A repeating pattern of shift types and days off, e.g. "4 On / 2 Off".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    pub rotation_id: Option<i64>,
    pub name: String,
    pub length_in_days: u32,
    /// Days ordered by `day_number` ascending.
    pub days: Vec<RotationDay>,
}

impl Rotation {
    /// Creates a rotation, ordering its days by day number.
    #[must_use]
    pub fn new(name: &str, length_in_days: u32, mut days: Vec<RotationDay>) -> Self {
        days.sort_by_key(|d| d.day_number);
        Self {
            rotation_id: None,
            name: name.to_string(),
            length_in_days,
            days,
        }
    }

    /// Returns the same rotation carrying its persisted id.
    #[must_use]
    pub const fn with_id(mut self, rotation_id: i64) -> Self {
        self.rotation_id = Some(rotation_id);
        self
    }
}

/// A name-only monthly task, e.g. "Inventory Check".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTask {
    pub monthly_task_id: i64,
    pub name: String,
}

/// A named group of staff, used to tag monthly assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentGroup {
    pub group_id: i64,
    pub name: String,
}

/// A named committee, used to tag monthly assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committee {
    pub committee_id: i64,
    pub name: String,
}

/// A staff member's task or committee tagging for an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAssignment {
    pub monthly_assignment_id: i64,
    pub staff_id: i64,
    pub task_id: Option<i64>,
    pub start_date: Date,
    pub end_date: Date,
    pub group_id: Option<i64>,
    pub committee_id: Option<i64>,
    pub status: AssignmentStatus,
    pub notes: String,
}

/// A monthly assignment that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAssignmentDraft {
    pub staff_id: i64,
    pub task_id: Option<i64>,
    pub start_date: Date,
    pub end_date: Date,
    pub group_id: Option<i64>,
    pub committee_id: Option<i64>,
    pub status: AssignmentStatus,
    pub notes: String,
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Parses a time of day in `HH:MM` form.
///
/// # Errors
///
/// Returns `DomainError::InvalidTime` if the string is not a valid time.
pub fn parse_time(value: &str) -> Result<Time, DomainError> {
    Time::parse(value, format_description!("[hour]:[minute]"))
        .map_err(|e| DomainError::InvalidTime(format!("'{value}': {e}")))
}

/// Formats a time of day in `HH:MM` form.
#[must_use]
pub fn format_time(value: Time) -> String {
    format!("{:02}:{:02}", value.hour(), value.minute())
}
