// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry dates, times and enumerations as strings and are parsed at
//! the boundary. Responses carry typed values ready for presentation.

use std::collections::BTreeMap;
use time::Date;
use ward_roster_domain::{
    AssignmentGroup, AssignmentStatus, Committee, MonthlyBulkEntry, MonthlyTask, Rotation,
    RotationSlot, ShiftType, Staff, TaskCategory, TaskHistory, TaskItem, TaskSet, format_time,
};

// ============================================================================
// Requests
// ============================================================================

/// Posted key/value pairs of a roster form.
///
/// Repeated keys are allowed and kept in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FormEntriesRequest {
    /// The posted pairs.
    #[serde(default)]
    pub entries: Vec<(String, String)>,
}

impl FormEntriesRequest {
    /// Creates a request from borrowed pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }
}

/// API request to register the first manager of an empty ward.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateFirstManagerRequest {
    pub display_name: String,
}

/// API request to apply a rotation to staff over a date range.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BulkAssignRequest {
    /// The rotation to expand.
    pub rotation_id: i64,
    /// The staff members to assign.
    pub staff_ids: Vec<i64>,
    /// First day of the range (`YYYY-MM-DD`).
    pub start_date: String,
    /// Last day of the range, inclusive (`YYYY-MM-DD`).
    pub end_date: String,
}

/// API request to create or rewrite one shift.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShiftRequest {
    pub staff_id: i64,
    /// The shift date (`YYYY-MM-DD`).
    pub date: String,
    pub shift_type_id: i64,
    #[serde(default)]
    pub assignments: Vec<i64>,
    #[serde(default)]
    pub sub_assignments: Vec<i64>,
    #[serde(default)]
    pub clinics: Vec<i64>,
    #[serde(default)]
    pub emergency_roles: Vec<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request to create or rewrite one monthly assignment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MonthlyAssignmentRequest {
    pub staff_id: i64,
    #[serde(default)]
    pub task_id: Option<i64>,
    /// First day covered (`YYYY-MM-DD`).
    pub start_date: String,
    /// Last day covered, inclusive (`YYYY-MM-DD`).
    pub end_date: String,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub committee_id: Option<i64>,
    /// Review status; pending when omitted.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request to create or update a staff member.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaffRequest {
    pub display_name: String,
    /// `NURSE`, `MAS` or `MANAGER`.
    pub role: String,
    pub is_active: bool,
}

/// API request to create a shift type.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateShiftTypeRequest {
    pub name: String,
    /// Start of the shift (`HH:MM`).
    pub start_time: String,
    /// End of the shift (`HH:MM`); may be before the start for overnight shifts.
    pub end_time: String,
}

/// One day of a rotation in a create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RotationDayRequest {
    /// 1-based position in the cycle.
    pub day_number: u32,
    /// The shift type worked, or `None` for a day off.
    pub shift_type_id: Option<i64>,
}

/// API request to create a rotation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateRotationRequest {
    pub name: String,
    pub length_in_days: u32,
    pub days: Vec<RotationDayRequest>,
}

/// API request carrying only a name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NamedRequest {
    pub name: String,
}

/// API request for an appraisal over a date range.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AppraisalRequest {
    pub staff_id: i64,
    /// First day of the range (`YYYY-MM-DD`).
    pub start_date: String,
    /// Last day of the range, inclusive (`YYYY-MM-DD`).
    pub end_date: String,
}

// ============================================================================
// Shared response parts
// ============================================================================

/// A staff member as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaffInfo {
    pub staff_id: i64,
    pub display_name: String,
    /// `NURSE`, `MAS` or `MANAGER`.
    pub role: String,
    pub is_active: bool,
}

impl From<&Staff> for StaffInfo {
    fn from(staff: &Staff) -> Self {
        Self {
            staff_id: staff.staff_id,
            display_name: staff.display_name.clone(),
            role: staff.role.as_str().to_string(),
            is_active: staff.is_active,
        }
    }
}

/// A shift type with times rendered as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShiftTypeInfo {
    pub shift_type_id: i64,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
}

impl From<&ShiftType> for ShiftTypeInfo {
    fn from(shift_type: &ShiftType) -> Self {
        Self {
            shift_type_id: shift_type.shift_type_id,
            name: shift_type.name.clone(),
            start_time: format_time(shift_type.start_time),
            end_time: format_time(shift_type.end_time),
        }
    }
}

/// A task item of one category.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TaskItemInfo {
    pub item_id: i64,
    pub category: TaskCategory,
    pub name: String,
}

impl From<&TaskItem> for TaskItemInfo {
    fn from(item: &TaskItem) -> Self {
        Self {
            item_id: item.item_id,
            category: item.category,
            name: item.name.clone(),
        }
    }
}

/// A named reference row: monthly task, assignment group or committee.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NamedInfo {
    pub id: i64,
    pub name: String,
}

impl From<&MonthlyTask> for NamedInfo {
    fn from(task: &MonthlyTask) -> Self {
        Self {
            id: task.monthly_task_id,
            name: task.name.clone(),
        }
    }
}

impl From<&AssignmentGroup> for NamedInfo {
    fn from(group: &AssignmentGroup) -> Self {
        Self {
            id: group.group_id,
            name: group.name.clone(),
        }
    }
}

impl From<&Committee> for NamedInfo {
    fn from(committee: &Committee) -> Self {
        Self {
            id: committee.committee_id,
            name: committee.name.clone(),
        }
    }
}

/// A shift with the names needed to display it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShiftInfo {
    pub shift_id: i64,
    pub staff_id: i64,
    pub staff_name: String,
    pub date: Date,
    pub shift_type_id: i64,
    pub shift_type_name: String,
    /// The four task sets.
    pub tasks: TaskSet,
    pub notes: Option<String>,
    pub status: AssignmentStatus,
    pub team_leader_notes: Option<String>,
    pub is_approved_by_manager: bool,
}

/// A monthly assignment with its task name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MonthlyAssignmentInfo {
    pub monthly_assignment_id: i64,
    pub staff_id: i64,
    pub staff_name: String,
    pub task_id: Option<i64>,
    pub task_name: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub group_id: Option<i64>,
    pub committee_id: Option<i64>,
    pub status: AssignmentStatus,
    pub notes: String,
}

/// One day of a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RotationDayInfo {
    pub day_number: u32,
    /// `None` for a day off.
    pub shift_type_id: Option<i64>,
}

/// A rotation with its days in cycle order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RotationInfo {
    pub rotation_id: Option<i64>,
    pub name: String,
    pub length_in_days: u32,
    pub days: Vec<RotationDayInfo>,
}

impl From<&Rotation> for RotationInfo {
    fn from(rotation: &Rotation) -> Self {
        Self {
            rotation_id: rotation.rotation_id,
            name: rotation.name.clone(),
            length_in_days: rotation.length_in_days,
            days: rotation
                .days
                .iter()
                .map(|d| RotationDayInfo {
                    day_number: d.day_number,
                    shift_type_id: match d.slot {
                        RotationSlot::Work(id) => Some(id),
                        RotationSlot::DayOff => None,
                    },
                })
                .collect(),
        }
    }
}

/// A calendar month reference used for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u8,
}

// ============================================================================
// Write responses
// ============================================================================

/// API response for a created record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatedResponse {
    /// The new record's id.
    pub id: i64,
    /// A success message.
    pub message: String,
}

/// API response for an update or delete.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// API response for a bulk replace.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignmentResponse {
    /// Records removed from the replaced scope.
    pub deleted: usize,
    /// Records inserted.
    pub created: usize,
    /// A success message.
    pub message: String,
}

/// API response for a submitted review.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReviewResponse {
    /// Shifts updated.
    pub reviewed: usize,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Read models
// ============================================================================

/// One staff row of the monthly roster grid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RosterRow {
    pub staff: StaffInfo,
    /// Day of month to that day's shifts. Every day of the month is present.
    pub days: BTreeMap<u8, Vec<ShiftInfo>>,
}

/// API response for the monthly roster grid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RosterGridResponse {
    pub year: i32,
    pub month: u8,
    pub previous: MonthRef,
    pub next: MonthRef,
    /// Days of the month, ascending.
    pub days: Vec<u8>,
    /// Active staff ordered by display name.
    pub rows: Vec<RosterRow>,
    /// Monthly assignments overlapping the month, ordered by task name.
    pub monthly_assignments: Vec<MonthlyAssignmentInfo>,
}

/// The shifts of one shift type on a date, split by role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShiftTypeGroup {
    pub shift_type: ShiftTypeInfo,
    /// Shifts held by nurses and managers.
    pub nurse_shifts: Vec<ShiftInfo>,
    /// Shifts held by auxiliary staff.
    pub auxiliary_shifts: Vec<ShiftInfo>,
}

/// API response for the daily detail view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DailyDetailResponse {
    pub date: Date,
    /// One group per shift type, ordered by start time.
    pub groups: Vec<ShiftTypeGroup>,
}

/// API response for the caller's schedule.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MyScheduleResponse {
    pub today: Date,
    /// Every shift on `today`.
    pub shifts_today: Vec<ShiftInfo>,
    /// The caller's shifts from `today` on, by date then start time.
    pub upcoming: Vec<ShiftInfo>,
}

/// API response backing the daily assignment form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DailyAssignContextResponse {
    pub date: Date,
    /// The shifts already stored for the date.
    pub shifts: Vec<ShiftInfo>,
    pub shift_types: Vec<ShiftTypeInfo>,
    /// Task items per category, each ordered by name.
    pub task_items: BTreeMap<TaskCategory, Vec<TaskItemInfo>>,
    pub active_staff: Vec<StaffInfo>,
    /// Staff, then category, then task, to the last day held in the
    /// preceding window.
    pub recent_history: TaskHistory,
}

/// API response backing the monthly bulk assignment form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MonthlyBulkContextResponse {
    pub year: i32,
    pub month: u8,
    pub start_date: Date,
    pub end_date: Date,
    /// What each staff member currently holds for the month.
    pub entries: BTreeMap<i64, MonthlyBulkEntry>,
    pub active_staff: Vec<StaffInfo>,
    pub monthly_tasks: Vec<NamedInfo>,
    pub committees: Vec<NamedInfo>,
    pub groups: Vec<NamedInfo>,
}

/// API response for the team leader checklist.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChecklistResponse {
    pub today: Date,
    pub is_team_leader: bool,
    /// The shift type being led, when leading.
    pub shift_type: Option<ShiftTypeInfo>,
    /// Shifts open for assessment.
    pub shifts: Vec<ShiftInfo>,
}

/// API response for the manager review screen.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ManagerReviewResponse {
    pub date: Date,
    pub shifts: Vec<ShiftInfo>,
}

/// API response for a staff member's monthly analytics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaffAnalyticsResponse {
    pub staff: StaffInfo,
    pub year: i32,
    pub month: u8,
    pub shift_type_counts: BTreeMap<String, usize>,
    pub assignment_counts: BTreeMap<String, usize>,
    pub sub_assignment_counts: BTreeMap<String, usize>,
    pub clinic_counts: BTreeMap<String, usize>,
    pub emergency_role_counts: BTreeMap<String, usize>,
    pub monthly_task_counts: BTreeMap<String, usize>,
    /// The month's shifts, by date.
    pub shift_history: Vec<ShiftInfo>,
}

/// API response for an appraisal.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AppraisalResponse {
    pub staff: StaffInfo,
    pub start_date: Date,
    pub end_date: Date,
    pub daily_completion_percent: f64,
    pub monthly_completion_percent: f64,
    pub daily_status_counts: BTreeMap<AssignmentStatus, usize>,
    pub monthly_status_counts: BTreeMap<AssignmentStatus, usize>,
}

/// API response listing staff.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListStaffResponse {
    pub staff: Vec<StaffInfo>,
}

/// API response listing shift types.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListShiftTypesResponse {
    pub shift_types: Vec<ShiftTypeInfo>,
}

/// API response listing the items of one task category.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListTaskItemsResponse {
    pub category: TaskCategory,
    pub items: Vec<TaskItemInfo>,
}

/// API response listing rotations.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListRotationsResponse {
    pub rotations: Vec<RotationInfo>,
}

/// API response listing named reference rows.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListNamedResponse {
    pub items: Vec<NamedInfo>,
}

/// API response listing monthly assignments.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListMonthlyAssignmentsResponse {
    pub assignments: Vec<MonthlyAssignmentInfo>,
}

/// What the caller may do, for UI gating.
///
/// Advisory only. Every operation still checks authorization itself.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CapabilitiesResponse {
    pub staff_id: i64,
    pub display_name: String,
    pub role: String,
    pub can_manage: bool,
    pub is_team_leader_today: bool,
}

/// API response reporting whether the ward still needs its first manager.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BootstrapStatusResponse {
    /// True while no staff member exists.
    pub is_bootstrap_mode: bool,
}
