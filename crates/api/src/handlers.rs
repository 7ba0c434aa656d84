// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for roster operations and read models.
//!
//! Every handler takes the authenticated caller. Manager operations check
//! [`can_manage`](crate::can_manage) before touching persistence. Roster
//! replacements and reviews go through the core `apply` function and are
//! persisted as one transaction; reference data is written directly.

use std::collections::{BTreeMap, BTreeSet};
use time::{Date, Duration};
use tracing::{debug, info};
use ward_roster::{Command, State, TransitionResult, apply};
use ward_roster_domain::{
    AppraisalSummary, DateRange, HISTORY_WINDOW_DAYS, MonthPeriod, MonthlyAssignment,
    MonthlyAssignmentDraft, Rotation, RotationDay, Shift, ShiftDraft, ShiftType, Staff,
    StaffMonthlySummary, StaffRole, TaskCategory, TaskHistory, TaskItem, TeamLeaderScope,
    fold_month_assignments, recent_task_history, team_leader_scope, validate_monthly_assignment,
    validate_name, validate_rotation, validate_staff,
};
use ward_roster_persistence::{PersistTransitionResult, PersistenceError, SqlitePersistence};

use crate::auth::{AuthenticatedStaff, AuthorizationService, can_manage};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::payload::{
    parse_category, parse_date_field, parse_month, parse_role, parse_status, parse_time_field,
};
use crate::request_response::{
    AppraisalRequest, AppraisalResponse, AssignmentResponse, BootstrapStatusResponse,
    BulkAssignRequest, CreateFirstManagerRequest,
    ChecklistResponse, CreateRotationRequest, CreateShiftTypeRequest, CreatedResponse,
    DailyAssignContextResponse, DailyDetailResponse, FormEntriesRequest, ListMonthlyAssignmentsResponse,
    ListNamedResponse, ListRotationsResponse, ListShiftTypesResponse, ListStaffResponse,
    ListTaskItemsResponse, ManagerReviewResponse, MessageResponse, MonthRef,
    MonthlyAssignmentInfo, MonthlyAssignmentRequest, MonthlyBulkContextResponse,
    MyScheduleResponse, NamedInfo, NamedRequest, ReviewResponse, RosterGridResponse, RosterRow,
    RotationInfo, ShiftInfo, ShiftRequest, ShiftTypeGroup, ShiftTypeInfo, StaffAnalyticsResponse,
    StaffInfo, StaffRequest, TaskItemInfo,
};

/// Maps persistence failures for one kind of resource.
fn db(resource_type: &'static str) -> impl Fn(PersistenceError) -> ApiError {
    move |err| translate_persistence_error(err, resource_type)
}

fn not_found(resource_type: &str, id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message: format!("{resource_type} {id} does not exist"),
    }
}

/// Names needed to render shifts and monthly assignments.
struct Directory {
    staff: BTreeMap<i64, Staff>,
    shift_types: BTreeMap<i64, ShiftType>,
    monthly_tasks: BTreeMap<i64, String>,
}

impl Directory {
    fn load(persistence: &mut SqlitePersistence) -> Result<Self, ApiError> {
        let staff: BTreeMap<i64, Staff> = persistence
            .list_staff(false)
            .map_err(db("Staff"))?
            .into_iter()
            .map(|s| (s.staff_id, s))
            .collect();
        let shift_types: BTreeMap<i64, ShiftType> = persistence
            .list_shift_types()
            .map_err(db("Shift type"))?
            .into_iter()
            .map(|t| (t.shift_type_id, t))
            .collect();
        let monthly_tasks: BTreeMap<i64, String> = persistence
            .list_monthly_tasks()
            .map_err(db("Monthly task"))?
            .into_iter()
            .map(|t| (t.monthly_task_id, t.name))
            .collect();
        Ok(Self {
            staff,
            shift_types,
            monthly_tasks,
        })
    }

    fn staff_name(&self, staff_id: i64) -> String {
        self.staff
            .get(&staff_id)
            .map(|s| s.display_name.clone())
            .unwrap_or_default()
    }

    fn is_nursing(&self, staff_id: i64) -> bool {
        self.staff
            .get(&staff_id)
            .is_some_and(|s| s.role.is_nursing())
    }

    fn shift_info(&self, shift: &Shift) -> ShiftInfo {
        ShiftInfo {
            shift_id: shift.shift_id,
            staff_id: shift.staff_id,
            staff_name: self.staff_name(shift.staff_id),
            date: shift.date,
            shift_type_id: shift.shift_type_id,
            shift_type_name: self
                .shift_types
                .get(&shift.shift_type_id)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            tasks: shift.tasks.clone(),
            notes: shift.notes.clone(),
            status: shift.status,
            team_leader_notes: shift.team_leader_notes.clone(),
            is_approved_by_manager: shift.is_approved_by_manager,
        }
    }

    fn shift_infos(&self, shifts: &[Shift]) -> Vec<ShiftInfo> {
        shifts.iter().map(|s| self.shift_info(s)).collect()
    }

    fn monthly_info(&self, assignment: &MonthlyAssignment) -> MonthlyAssignmentInfo {
        MonthlyAssignmentInfo {
            monthly_assignment_id: assignment.monthly_assignment_id,
            staff_id: assignment.staff_id,
            staff_name: self.staff_name(assignment.staff_id),
            task_id: assignment.task_id,
            task_name: assignment
                .task_id
                .and_then(|t| self.monthly_tasks.get(&t).cloned()),
            start_date: assignment.start_date,
            end_date: assignment.end_date,
            group_id: assignment.group_id,
            committee_id: assignment.committee_id,
            status: assignment.status,
            notes: assignment.notes.clone(),
        }
    }

    fn monthly_infos(&self, assignments: &[MonthlyAssignment]) -> Vec<MonthlyAssignmentInfo> {
        assignments.iter().map(|a| self.monthly_info(a)).collect()
    }
}

/// Applies a command and persists its transition in one transaction.
fn run_command(
    persistence: &mut SqlitePersistence,
    state: &State,
    command: Command,
    resource_type: &'static str,
) -> Result<(TransitionResult, PersistTransitionResult), ApiError> {
    let result: TransitionResult = apply(state, command).map_err(translate_core_error)?;
    let persisted: PersistTransitionResult = persistence
        .persist_transition(&result)
        .map_err(db(resource_type))?;
    info!(
        action = %result.action,
        deleted = persisted.deleted,
        inserted = persisted.inserted_ids.len(),
        reviewed = persisted.reviewed,
        "{}",
        result.details
    );
    Ok((result, persisted))
}

fn assignment_response(
    result: &TransitionResult,
    persisted: &PersistTransitionResult,
) -> AssignmentResponse {
    AssignmentResponse {
        deleted: persisted.deleted,
        created: persisted.inserted_ids.len(),
        message: result.details.clone(),
    }
}

fn load_staff(persistence: &mut SqlitePersistence, staff_id: i64) -> Result<Staff, ApiError> {
    persistence
        .get_staff(staff_id)
        .map_err(db("Staff"))?
        .ok_or_else(|| not_found("Staff", staff_id))
}

fn active_staff_infos(persistence: &mut SqlitePersistence) -> Result<Vec<StaffInfo>, ApiError> {
    Ok(persistence
        .list_staff(true)
        .map_err(db("Staff"))?
        .iter()
        .map(StaffInfo::from)
        .collect())
}

const fn month_ref(period: MonthPeriod) -> MonthRef {
    MonthRef {
        year: period.year(),
        month: period.month(),
    }
}

// ============================================================================
// Roster views
// ============================================================================

/// Builds the monthly roster grid.
///
/// Rows cover every active staff member, ordered by display name, and every
/// day of the month, including days without shifts.
///
/// # Errors
///
/// Returns an error if the month is invalid or a query fails.
pub fn roster_grid(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    year: i32,
    month: u8,
) -> Result<RosterGridResponse, ApiError> {
    let period: MonthPeriod = parse_month(year, month)?;
    let range: DateRange = period.range().map_err(translate_domain_error)?;
    debug!(staff_id = principal.staff_id, month = %period, "Building roster grid");

    let directory: Directory = Directory::load(persistence)?;
    let staff: Vec<Staff> = persistence.list_staff(true).map_err(db("Staff"))?;
    let shifts: Vec<Shift> = persistence.shifts_in_range(range).map_err(db("Shift"))?;
    let assignments: Vec<MonthlyAssignment> = persistence
        .monthly_assignments_overlapping(range)
        .map_err(db("Monthly assignment"))?;

    let mut by_staff_day: BTreeMap<(i64, u8), Vec<ShiftInfo>> = BTreeMap::new();
    for shift in &shifts {
        by_staff_day
            .entry((shift.staff_id, shift.date.day()))
            .or_default()
            .push(directory.shift_info(shift));
    }

    let days: Vec<u8> = range.days().map(|d| d.day()).collect();
    let rows: Vec<RosterRow> = staff
        .iter()
        .map(|s| RosterRow {
            staff: StaffInfo::from(s),
            days: days
                .iter()
                .map(|day| {
                    (
                        *day,
                        by_staff_day.remove(&(s.staff_id, *day)).unwrap_or_default(),
                    )
                })
                .collect(),
        })
        .collect();

    Ok(RosterGridResponse {
        year: period.year(),
        month: period.month(),
        previous: month_ref(period.previous()),
        next: month_ref(period.following()),
        days,
        rows,
        monthly_assignments: directory.monthly_infos(&assignments),
    })
}

/// Builds the daily detail view: shifts grouped by shift type and role.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn daily_detail(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    date: Date,
) -> Result<DailyDetailResponse, ApiError> {
    debug!(staff_id = principal.staff_id, %date, "Building daily detail");
    let directory: Directory = Directory::load(persistence)?;
    let shift_types: Vec<ShiftType> = persistence.list_shift_types().map_err(db("Shift type"))?;
    let shifts: Vec<Shift> = persistence.shifts_on_date(date).map_err(db("Shift"))?;

    let groups: Vec<ShiftTypeGroup> = shift_types
        .iter()
        .map(|shift_type| {
            let (nurse, auxiliary): (Vec<&Shift>, Vec<&Shift>) = shifts
                .iter()
                .filter(|s| s.shift_type_id == shift_type.shift_type_id)
                .partition(|s| directory.is_nursing(s.staff_id));
            ShiftTypeGroup {
                shift_type: ShiftTypeInfo::from(shift_type),
                nurse_shifts: nurse.into_iter().map(|s| directory.shift_info(s)).collect(),
                auxiliary_shifts: auxiliary
                    .into_iter()
                    .map(|s| directory.shift_info(s))
                    .collect(),
            }
        })
        .collect();

    Ok(DailyDetailResponse { date, groups })
}

/// Builds the caller's schedule: today's roster and their own upcoming shifts.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn my_schedule(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    today: Date,
) -> Result<MyScheduleResponse, ApiError> {
    let directory: Directory = Directory::load(persistence)?;
    let shifts_today: Vec<Shift> = persistence.shifts_on_date(today).map_err(db("Shift"))?;
    let upcoming: Vec<Shift> = persistence
        .shifts_for_staff_from(principal.staff_id, today)
        .map_err(db("Shift"))?;
    debug!(
        staff_id = principal.staff_id,
        %today,
        upcoming = upcoming.len(),
        "Built schedule"
    );

    Ok(MyScheduleResponse {
        today,
        shifts_today: directory.shift_infos(&shifts_today),
        upcoming: directory.shift_infos(&upcoming),
    })
}

// ============================================================================
// Daily assignment
// ============================================================================

/// Loads everything the daily assignment form needs for `date`.
///
/// # Errors
///
/// Returns an error if the caller is not a manager or a query fails.
pub fn daily_assign_context(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    date: Date,
) -> Result<DailyAssignContextResponse, ApiError> {
    AuthorizationService::require_manager(principal, "daily_assign")?;

    let directory: Directory = Directory::load(persistence)?;
    let shifts: Vec<Shift> = persistence.shifts_on_date(date).map_err(db("Shift"))?;

    let mut task_items: BTreeMap<TaskCategory, Vec<TaskItemInfo>> = BTreeMap::new();
    for category in TaskCategory::ALL {
        let items: Vec<TaskItem> = persistence
            .list_task_items(category)
            .map_err(db("Task item"))?;
        task_items.insert(category, items.iter().map(TaskItemInfo::from).collect());
    }

    let window_start: Date = date.saturating_sub(Duration::days(HISTORY_WINDOW_DAYS));
    let window_end: Date = date.previous_day().unwrap_or(date);
    let window: DateRange =
        DateRange::new(window_start, window_end).map_err(translate_domain_error)?;
    let recent: Vec<Shift> = persistence.shifts_in_range(window).map_err(db("Shift"))?;
    let recent_history: TaskHistory = recent_task_history(date, &recent);

    Ok(DailyAssignContextResponse {
        date,
        shifts: directory.shift_infos(&shifts),
        shift_types: directory.shift_types.values().map(ShiftTypeInfo::from).collect(),
        task_items,
        active_staff: active_staff_infos(persistence)?,
        recent_history,
    })
}

/// Replaces every shift on `date` with the posted task grid.
///
/// An empty payload clears the day.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, a key is malformed, a
/// referenced row does not exist, or the result collides with another shift.
/// Nothing is written on error.
pub fn assign_day(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    date: Date,
    request: FormEntriesRequest,
) -> Result<AssignmentResponse, ApiError> {
    AuthorizationService::require_manager(principal, "assign_day")?;
    info!(
        staff_id = principal.staff_id,
        %date,
        entries = request.entries.len(),
        "Handling daily assignment"
    );

    let command: Command = Command::AssignDay {
        date,
        entries: request.entries,
    };
    let (result, persisted) = run_command(persistence, &State::new(), command, "Shift")?;
    Ok(assignment_response(&result, &persisted))
}

/// Applies a rotation to the listed staff over a date range.
///
/// Existing shifts of those staff in the range are replaced.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the range is inverted,
/// the rotation or a listed staff member is missing, a listed staff member is
/// inactive, the rotation is empty, or the result collides with another
/// shift. Nothing is written on error.
pub fn bulk_assign(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    request: BulkAssignRequest,
) -> Result<AssignmentResponse, ApiError> {
    AuthorizationService::require_manager(principal, "bulk_assign")?;

    let start: Date = parse_date_field("start_date", &request.start_date)?;
    let end: Date = parse_date_field("end_date", &request.end_date)?;
    let range: DateRange = DateRange::new(start, end).map_err(translate_domain_error)?;
    let rotation: Rotation = persistence
        .get_rotation(request.rotation_id)
        .map_err(db("Rotation"))?
        .ok_or_else(|| not_found("Rotation", request.rotation_id))?;

    if request.staff_ids.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("staff_ids"),
            message: String::from("At least one staff member is required"),
        });
    }
    for &staff_id in &request.staff_ids {
        let staff: Staff = load_staff(persistence, staff_id)?;
        if !staff.is_active {
            return Err(ApiError::InvalidInput {
                field: String::from("staff_ids"),
                message: format!("Staff member '{}' is inactive", staff.display_name),
            });
        }
    }

    info!(
        staff_id = principal.staff_id,
        rotation = %rotation.name,
        staff_count = request.staff_ids.len(),
        %start,
        %end,
        "Handling rotation bulk assignment"
    );

    let command: Command = Command::AssignRotation {
        rotation,
        staff_ids: request.staff_ids,
        range,
    };
    let (result, persisted) = run_command(persistence, &State::new(), command, "Shift")?;
    Ok(assignment_response(&result, &persisted))
}

// ============================================================================
// Manual shift maintenance
// ============================================================================

fn shift_draft(request: ShiftRequest) -> Result<ShiftDraft, ApiError> {
    let date: Date = parse_date_field("date", &request.date)?;
    let mut draft: ShiftDraft = ShiftDraft::new(request.staff_id, date, request.shift_type_id);
    draft.tasks.replace(TaskCategory::Main, request.assignments);
    draft.tasks.replace(TaskCategory::Sub, request.sub_assignments);
    draft.tasks.replace(TaskCategory::Clinic, request.clinics);
    draft
        .tasks
        .replace(TaskCategory::Emergency, request.emergency_roles);
    draft.notes = request.notes.filter(|n| !n.trim().is_empty());
    Ok(draft)
}

/// Creates one shift.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, a reference does not
/// exist, or the staff member already holds that shift type on that date.
pub fn create_shift(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    request: ShiftRequest,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::require_manager(principal, "create_shift")?;
    let draft: ShiftDraft = shift_draft(request)?;
    let shift_id: i64 = persistence.create_shift(&draft).map_err(db("Shift"))?;
    info!(shift_id, staff_id = draft.staff_id, date = %draft.date, "Created shift");
    Ok(CreatedResponse {
        id: shift_id,
        message: format!("Created shift {shift_id}"),
    })
}

/// Rewrites one shift. The four task sets are replaced, not merged.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the shift or a reference
/// does not exist, or the new slot collides with another shift.
pub fn update_shift(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    shift_id: i64,
    request: ShiftRequest,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::require_manager(principal, "update_shift")?;
    let draft: ShiftDraft = shift_draft(request)?;
    persistence
        .update_shift(shift_id, &draft)
        .map_err(db("Shift"))?;
    info!(shift_id, "Updated shift");
    Ok(MessageResponse {
        message: format!("Updated shift {shift_id}"),
    })
}

/// Deletes one shift.
///
/// # Errors
///
/// Returns an error if the caller is not a manager or the shift does not exist.
pub fn delete_shift(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    shift_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::require_manager(principal, "delete_shift")?;
    persistence.delete_shift(shift_id).map_err(db("Shift"))?;
    info!(shift_id, "Deleted shift");
    Ok(MessageResponse {
        message: format!("Deleted shift {shift_id}"),
    })
}

// ============================================================================
// Monthly assignments
// ============================================================================

/// Loads the monthly bulk form for one month, pre-filled from stored records.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the month is invalid, or
/// a query fails.
pub fn monthly_bulk_context(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    year: i32,
    month: u8,
) -> Result<MonthlyBulkContextResponse, ApiError> {
    AuthorizationService::require_manager(principal, "monthly_bulk_assign")?;
    let period: MonthPeriod = parse_month(year, month)?;
    let range: DateRange = period.range().map_err(translate_domain_error)?;

    let stored: Vec<MonthlyAssignment> = persistence
        .monthly_assignments_for_period(range)
        .map_err(db("Monthly assignment"))?;

    Ok(MonthlyBulkContextResponse {
        year: period.year(),
        month: period.month(),
        start_date: range.start(),
        end_date: range.end(),
        entries: fold_month_assignments(&stored),
        active_staff: active_staff_infos(persistence)?,
        monthly_tasks: persistence
            .list_monthly_tasks()
            .map_err(db("Monthly task"))?
            .iter()
            .map(NamedInfo::from)
            .collect(),
        committees: persistence
            .list_committees()
            .map_err(db("Committee"))?
            .iter()
            .map(NamedInfo::from)
            .collect(),
        groups: persistence
            .list_assignment_groups()
            .map_err(db("Assignment group"))?
            .iter()
            .map(NamedInfo::from)
            .collect(),
    })
}

/// Replaces every monthly assignment of one month with the posted form.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the month is invalid, a
/// key or value is malformed, or a referenced row does not exist. Nothing is
/// written on error.
pub fn assign_month(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    year: i32,
    month: u8,
    request: FormEntriesRequest,
) -> Result<AssignmentResponse, ApiError> {
    AuthorizationService::require_manager(principal, "monthly_bulk_assign")?;
    let period: MonthPeriod = parse_month(year, month)?;
    info!(
        staff_id = principal.staff_id,
        month = %period,
        entries = request.entries.len(),
        "Handling monthly bulk assignment"
    );

    let active: Vec<i64> = persistence.active_staff_ids().map_err(db("Staff"))?;
    let state: State = State::new().with_active_staff(active);
    let command: Command = Command::AssignMonth {
        month: period,
        entries: request.entries,
    };
    let (result, persisted) = run_command(persistence, &state, command, "Monthly assignment")?;
    Ok(assignment_response(&result, &persisted))
}

fn monthly_draft(request: MonthlyAssignmentRequest) -> Result<MonthlyAssignmentDraft, ApiError> {
    let draft: MonthlyAssignmentDraft = MonthlyAssignmentDraft {
        staff_id: request.staff_id,
        task_id: request.task_id,
        start_date: parse_date_field("start_date", &request.start_date)?,
        end_date: parse_date_field("end_date", &request.end_date)?,
        group_id: request.group_id,
        committee_id: request.committee_id,
        status: parse_status(request.status.as_deref())?,
        notes: request.notes.unwrap_or_default(),
    };
    validate_monthly_assignment(&draft).map_err(translate_domain_error)?;
    Ok(draft)
}

/// Creates one monthly assignment.
///
/// A record with neither task nor committee is accepted.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the range is inverted,
/// or a reference does not exist.
pub fn create_monthly_assignment(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    request: MonthlyAssignmentRequest,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::require_manager(principal, "create_monthly_assignment")?;
    let draft: MonthlyAssignmentDraft = monthly_draft(request)?;
    let id: i64 = persistence
        .create_monthly_assignment(&draft)
        .map_err(db("Monthly assignment"))?;
    info!(monthly_assignment_id = id, staff_id = draft.staff_id, "Created monthly assignment");
    Ok(CreatedResponse {
        id,
        message: format!("Created monthly assignment {id}"),
    })
}

/// Rewrites one monthly assignment.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the range is inverted,
/// or the record or a reference does not exist.
pub fn update_monthly_assignment(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    monthly_assignment_id: i64,
    request: MonthlyAssignmentRequest,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::require_manager(principal, "update_monthly_assignment")?;
    let draft: MonthlyAssignmentDraft = monthly_draft(request)?;
    persistence
        .update_monthly_assignment(monthly_assignment_id, &draft)
        .map_err(db("Monthly assignment"))?;
    info!(monthly_assignment_id, "Updated monthly assignment");
    Ok(MessageResponse {
        message: format!("Updated monthly assignment {monthly_assignment_id}"),
    })
}

/// Deletes one monthly assignment.
///
/// # Errors
///
/// Returns an error if the caller is not a manager or the record does not
/// exist.
pub fn delete_monthly_assignment(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    monthly_assignment_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::require_manager(principal, "delete_monthly_assignment")?;
    persistence
        .delete_monthly_assignment(monthly_assignment_id)
        .map_err(db("Monthly assignment"))?;
    info!(monthly_assignment_id, "Deleted monthly assignment");
    Ok(MessageResponse {
        message: format!("Deleted monthly assignment {monthly_assignment_id}"),
    })
}

/// Lists every monthly assignment, newest first.
///
/// # Errors
///
/// Returns an error if the caller is not a manager or a query fails.
pub fn list_monthly_assignments(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
) -> Result<ListMonthlyAssignmentsResponse, ApiError> {
    AuthorizationService::require_manager(principal, "list_monthly_assignments")?;
    let directory: Directory = Directory::load(persistence)?;
    let assignments: Vec<MonthlyAssignment> = persistence
        .list_monthly_assignments()
        .map_err(db("Monthly assignment"))?;
    Ok(ListMonthlyAssignmentsResponse {
        assignments: directory.monthly_infos(&assignments),
    })
}

/// Lists the monthly assignments overlapping one month, ordered by task name.
///
/// # Errors
///
/// Returns an error if the month is invalid or a query fails.
pub fn monthly_assignments_for_month(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    year: i32,
    month: u8,
) -> Result<ListMonthlyAssignmentsResponse, ApiError> {
    let period: MonthPeriod = parse_month(year, month)?;
    let range: DateRange = period.range().map_err(translate_domain_error)?;
    debug!(staff_id = principal.staff_id, month = %period, "Listing monthly assignments");
    let directory: Directory = Directory::load(persistence)?;
    let assignments: Vec<MonthlyAssignment> = persistence
        .monthly_assignments_overlapping(range)
        .map_err(db("Monthly assignment"))?;
    Ok(ListMonthlyAssignmentsResponse {
        assignments: directory.monthly_infos(&assignments),
    })
}

// ============================================================================
// Review
// ============================================================================

fn review_state(
    persistence: &mut SqlitePersistence,
    date: Date,
) -> Result<State, ApiError> {
    let shifts: Vec<Shift> = persistence.shifts_on_date(date).map_err(db("Shift"))?;
    let leader_ids: BTreeSet<i64> = persistence
        .team_leader_assignment_ids()
        .map_err(db("Assignment"))?;
    Ok(State::new()
        .with_shifts(shifts)
        .with_team_leader_assignments(leader_ids))
}

/// Loads the team leader checklist for the caller on `today`.
///
/// Callers who do not lead a shift today get an empty checklist.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn checklist(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    today: Date,
) -> Result<ChecklistResponse, ApiError> {
    let state: State = review_state(persistence, today)?;
    let scope: Option<TeamLeaderScope> = team_leader_scope(
        principal.staff_id,
        today,
        &state.shifts,
        &state.team_leader_assignment_ids,
    );
    let Some(scope) = scope else {
        debug!(staff_id = principal.staff_id, %today, "Not team leader today");
        return Ok(ChecklistResponse {
            today,
            is_team_leader: false,
            shift_type: None,
            shifts: Vec::new(),
        });
    };

    let directory: Directory = Directory::load(persistence)?;
    let shifts: Vec<ShiftInfo> = state
        .shifts
        .iter()
        .filter(|s| scope.eligible_shift_ids.contains(&s.shift_id))
        .map(|s| directory.shift_info(s))
        .collect();
    Ok(ChecklistResponse {
        today,
        is_team_leader: true,
        shift_type: directory
            .shift_types
            .get(&scope.shift_type_id)
            .map(ShiftTypeInfo::from),
        shifts,
    })
}

/// Records the caller's team leader checklist for `today`.
///
/// # Errors
///
/// Returns an error if a line targets a shift the caller may not assess, a
/// status is unknown or moves a reviewed shift back to pending, or a
/// reviewed shift has vanished. Nothing is written on error.
pub fn submit_checklist(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    today: Date,
    request: FormEntriesRequest,
) -> Result<ReviewResponse, ApiError> {
    info!(staff_id = principal.staff_id, %today, "Handling checklist submission");
    let state: State = review_state(persistence, today)?;
    let command: Command = Command::SubmitChecklist {
        reviewer_staff_id: principal.staff_id,
        today,
        entries: request.entries,
    };
    let (result, persisted) = run_command(persistence, &state, command, "Shift")?;
    Ok(ReviewResponse {
        reviewed: persisted.reviewed,
        message: result.details,
    })
}

/// Loads every shift on `date` for manager review.
///
/// # Errors
///
/// Returns an error if the caller is not a manager or a query fails.
pub fn manager_review(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    date: Date,
) -> Result<ManagerReviewResponse, ApiError> {
    AuthorizationService::require_manager(principal, "manager_review")?;
    let directory: Directory = Directory::load(persistence)?;
    let shifts: Vec<Shift> = persistence.shifts_on_date(date).map_err(db("Shift"))?;
    Ok(ManagerReviewResponse {
        date,
        shifts: directory.shift_infos(&shifts),
    })
}

/// Records a manager's review of `date`, including approvals.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, a line targets a shift
/// on another date, or a status is invalid. Nothing is written on error.
pub fn submit_manager_review(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    date: Date,
    request: FormEntriesRequest,
) -> Result<ReviewResponse, ApiError> {
    AuthorizationService::require_manager(principal, "manager_review")?;
    info!(staff_id = principal.staff_id, %date, "Handling manager review");
    let state: State = review_state(persistence, date)?;
    let command: Command = Command::SubmitManagerReview {
        date,
        entries: request.entries,
    };
    let (result, persisted) = run_command(persistence, &state, command, "Shift")?;
    Ok(ReviewResponse {
        reviewed: persisted.reviewed,
        message: result.details,
    })
}

// ============================================================================
// Analytics
// ============================================================================

/// Builds one staff member's frequency tables and shift history for a month.
///
/// Managers may view anyone; other staff only themselves.
///
/// # Errors
///
/// Returns an error if the caller may not view the staff member, the month
/// is invalid, or the staff member does not exist.
pub fn staff_analytics(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    staff_id: i64,
    year: i32,
    month: u8,
) -> Result<StaffAnalyticsResponse, ApiError> {
    if staff_id != principal.staff_id {
        AuthorizationService::require_manager(principal, "staff_analytics")?;
    }
    let period: MonthPeriod = parse_month(year, month)?;
    let staff: Staff = load_staff(persistence, staff_id)?;
    let directory: Directory = Directory::load(persistence)?;
    let summary: StaffMonthlySummary = persistence
        .staff_monthly_summary(staff_id, period)
        .map_err(db("Staff"))?;
    debug!(staff_id, month = %period, shifts = summary.shift_history.len(), "Built staff analytics");

    Ok(StaffAnalyticsResponse {
        staff: StaffInfo::from(&staff),
        year: period.year(),
        month: period.month(),
        shift_history: directory.shift_infos(&summary.shift_history),
        shift_type_counts: summary.shift_type_counts,
        assignment_counts: summary.assignment_counts,
        sub_assignment_counts: summary.sub_assignment_counts,
        clinic_counts: summary.clinic_counts,
        emergency_role_counts: summary.emergency_role_counts,
        monthly_task_counts: summary.monthly_task_counts,
    })
}

/// Computes a staff member's completion percentages over a date range.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, a date is invalid, the
/// range is inverted, or the staff member does not exist.
pub fn appraisal(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    request: &AppraisalRequest,
) -> Result<AppraisalResponse, ApiError> {
    AuthorizationService::require_manager(principal, "appraisal")?;
    let start: Date = parse_date_field("start_date", &request.start_date)?;
    let end: Date = parse_date_field("end_date", &request.end_date)?;
    let range: DateRange = DateRange::new(start, end).map_err(translate_domain_error)?;
    let staff: Staff = load_staff(persistence, request.staff_id)?;

    let summary: AppraisalSummary = persistence
        .appraisal_summary(request.staff_id, range)
        .map_err(db("Staff"))?;
    debug!(
        staff_id = request.staff_id,
        daily = summary.daily_completion_percent,
        monthly = summary.monthly_completion_percent,
        "Computed appraisal"
    );

    Ok(AppraisalResponse {
        staff: StaffInfo::from(&staff),
        start_date: start,
        end_date: end,
        daily_completion_percent: summary.daily_completion_percent,
        monthly_completion_percent: summary.monthly_completion_percent,
        daily_status_counts: summary.daily_status_counts,
        monthly_status_counts: summary.monthly_status_counts,
    })
}

// ============================================================================
// Staff registry
// ============================================================================

/// Lists staff ordered by display name.
///
/// Inactive staff are included only when a manager asks for them.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_staff(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    include_inactive: bool,
) -> Result<ListStaffResponse, ApiError> {
    let active_only: bool = !(include_inactive && can_manage(principal));
    let staff: Vec<Staff> = persistence.list_staff(active_only).map_err(db("Staff"))?;
    Ok(ListStaffResponse {
        staff: staff.iter().map(StaffInfo::from).collect(),
    })
}

/// Fetches one staff member.
///
/// # Errors
///
/// Returns an error if the staff member does not exist.
pub fn get_staff(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    staff_id: i64,
) -> Result<StaffInfo, ApiError> {
    debug!(caller = principal.staff_id, staff_id, "Fetching staff member");
    load_staff(persistence, staff_id).map(|s| StaffInfo::from(&s))
}

/// Reports whether the staff registry is still empty.
///
/// # Errors
///
/// Returns an error if the staff count cannot be read.
pub fn check_bootstrap_status(
    persistence: &mut SqlitePersistence,
) -> Result<BootstrapStatusResponse, ApiError> {
    let staff_count: i64 = persistence.count_staff().map_err(db("Staff"))?;
    Ok(BootstrapStatusResponse {
        is_bootstrap_mode: staff_count == 0,
    })
}

/// Registers the first manager of an empty ward.
///
/// Needs no principal, and only succeeds while no staff member exists. Every
/// later registration goes through [`create_staff`].
///
/// # Errors
///
/// Returns an error if staff already exist, the name is blank, or the
/// database write fails.
pub fn create_first_manager(
    persistence: &mut SqlitePersistence,
    request: CreateFirstManagerRequest,
) -> Result<CreatedResponse, ApiError> {
    let staff_count: i64 = persistence.count_staff().map_err(db("Staff"))?;
    if staff_count > 0 {
        return Err(ApiError::Unauthorized {
            action: String::from("create_first_manager"),
            required_role: String::from("Bootstrap mode (no staff exist)"),
        });
    }
    let name: String = request.display_name;
    validate_name("Staff", &name).map_err(translate_domain_error)?;

    let staff_id: i64 = persistence
        .create_staff(name.trim(), StaffRole::Manager, true)
        .map_err(db("Staff"))?;
    info!(staff_id, "Created first manager");
    Ok(CreatedResponse {
        id: staff_id,
        message: format!("Created first manager '{}'", name.trim()),
    })
}

/// Registers a staff member.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the name is blank, the
/// role is unknown, or the name is taken.
pub fn create_staff(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    request: StaffRequest,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::require_manager(principal, "create_staff")?;
    let role = parse_role(&request.role)?;
    let name: String = request.display_name;
    validate_name("Staff", &name).map_err(translate_domain_error)?;

    let staff_id: i64 = persistence
        .create_staff(name.trim(), role, request.is_active)
        .map_err(db("Staff"))?;
    info!(staff_id, role = %role, "Created staff member");
    Ok(CreatedResponse {
        id: staff_id,
        message: format!("Created staff member '{}'", name.trim()),
    })
}

/// Updates a staff member's name, role or active flag.
///
/// Setting `is_active` to false deactivates the staff member.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the input is invalid, or
/// the staff member does not exist.
pub fn update_staff(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    staff_id: i64,
    request: StaffRequest,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::require_manager(principal, "update_staff")?;
    let staff: Staff = Staff {
        staff_id,
        display_name: request.display_name.trim().to_string(),
        role: parse_role(&request.role)?,
        is_active: request.is_active,
    };
    validate_staff(&staff).map_err(translate_domain_error)?;
    persistence.update_staff(&staff).map_err(db("Staff"))?;
    info!(staff_id, is_active = staff.is_active, "Updated staff member");
    Ok(MessageResponse {
        message: format!("Updated staff member {staff_id}"),
    })
}

/// Deletes a staff member together with their shifts and monthly assignments.
///
/// # Errors
///
/// Returns an error if the caller is not a manager or the staff member does
/// not exist.
pub fn delete_staff(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    staff_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::require_manager(principal, "delete_staff")?;
    persistence.delete_staff(staff_id).map_err(db("Staff"))?;
    info!(staff_id, "Deleted staff member");
    Ok(MessageResponse {
        message: format!("Deleted staff member {staff_id}"),
    })
}

// ============================================================================
// Reference data
// ============================================================================

/// Lists shift types ordered by start time.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_shift_types(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
) -> Result<ListShiftTypesResponse, ApiError> {
    debug!(staff_id = principal.staff_id, "Listing shift types");
    let shift_types: Vec<ShiftType> = persistence.list_shift_types().map_err(db("Shift type"))?;
    Ok(ListShiftTypesResponse {
        shift_types: shift_types.iter().map(ShiftTypeInfo::from).collect(),
    })
}

/// Creates a shift type.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the name is blank or
/// taken, or a time is invalid.
pub fn create_shift_type(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    request: CreateShiftTypeRequest,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::require_manager(principal, "create_shift_type")?;
    let name: String = request.name;
    validate_name("Shift type", &name).map_err(translate_domain_error)?;
    let start_time = parse_time_field("start_time", &request.start_time)?;
    let end_time = parse_time_field("end_time", &request.end_time)?;

    let id: i64 = persistence
        .create_shift_type(name.trim(), start_time, end_time)
        .map_err(db("Shift type"))?;
    info!(shift_type_id = id, name = %name.trim(), "Created shift type");
    Ok(CreatedResponse {
        id,
        message: format!("Created shift type '{}'", name.trim()),
    })
}

/// Deletes a shift type that no shift uses.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the shift type does not
/// exist, or shifts still reference it.
pub fn delete_shift_type(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    shift_type_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::require_manager(principal, "delete_shift_type")?;
    persistence
        .delete_shift_type(shift_type_id)
        .map_err(db("Shift type"))?;
    info!(shift_type_id, "Deleted shift type");
    Ok(MessageResponse {
        message: format!("Deleted shift type {shift_type_id}"),
    })
}

/// Lists the items of one task category, ordered by name.
///
/// # Errors
///
/// Returns an error if the category is unknown or the query fails.
pub fn list_task_items(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    category: &str,
) -> Result<ListTaskItemsResponse, ApiError> {
    let category: TaskCategory = parse_category(category)?;
    debug!(staff_id = principal.staff_id, %category, "Listing task items");
    let items: Vec<TaskItem> = persistence
        .list_task_items(category)
        .map_err(db("Task item"))?;
    Ok(ListTaskItemsResponse {
        category,
        items: items.iter().map(TaskItemInfo::from).collect(),
    })
}

/// Creates a task item in one category.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the category is unknown,
/// or the name is blank or taken.
pub fn create_task_item(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    category: &str,
    request: NamedRequest,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::require_manager(principal, "create_task_item")?;
    let category: TaskCategory = parse_category(category)?;
    let name: String = request.name;
    validate_name("Task", &name).map_err(translate_domain_error)?;
    let id: i64 = persistence
        .create_task_item(category, name.trim())
        .map_err(db("Task item"))?;
    info!(item_id = id, %category, "Created task item");
    Ok(CreatedResponse {
        id,
        message: format!("Created {category} task '{}'", name.trim()),
    })
}

/// Lists rotations with their days.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_rotations(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
) -> Result<ListRotationsResponse, ApiError> {
    debug!(staff_id = principal.staff_id, "Listing rotations");
    let rotations: Vec<Rotation> = persistence.list_rotations().map_err(db("Rotation"))?;
    Ok(ListRotationsResponse {
        rotations: rotations.iter().map(RotationInfo::from).collect(),
    })
}

/// Fetches one rotation with its days.
///
/// # Errors
///
/// Returns an error if the rotation does not exist.
pub fn get_rotation(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    rotation_id: i64,
) -> Result<RotationInfo, ApiError> {
    debug!(staff_id = principal.staff_id, rotation_id, "Fetching rotation");
    persistence
        .get_rotation(rotation_id)
        .map_err(db("Rotation"))?
        .map(|r| RotationInfo::from(&r))
        .ok_or_else(|| not_found("Rotation", rotation_id))
}

/// Creates a rotation.
///
/// Day numbers must run densely from 1 and fit within the cycle length.
///
/// # Errors
///
/// Returns an error if the caller is not a manager, the rotation is invalid,
/// a shift type does not exist, or the name is taken.
pub fn create_rotation(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    request: CreateRotationRequest,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::require_manager(principal, "create_rotation")?;
    let days: Vec<RotationDay> = request
        .days
        .iter()
        .map(|d| match d.shift_type_id {
            Some(shift_type_id) => RotationDay::work(d.day_number, shift_type_id),
            None => RotationDay::day_off(d.day_number),
        })
        .collect();
    let rotation: Rotation = Rotation::new(request.name.trim(), request.length_in_days, days);
    validate_rotation(&rotation).map_err(translate_domain_error)?;

    let id: i64 = persistence
        .create_rotation(&rotation)
        .map_err(db("Rotation"))?;
    info!(rotation_id = id, name = %rotation.name, days = rotation.days.len(), "Created rotation");
    Ok(CreatedResponse {
        id,
        message: format!("Created rotation '{}'", rotation.name),
    })
}

/// Deletes a rotation and its days.
///
/// # Errors
///
/// Returns an error if the caller is not a manager or the rotation does not
/// exist.
pub fn delete_rotation(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    rotation_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::require_manager(principal, "delete_rotation")?;
    persistence
        .delete_rotation(rotation_id)
        .map_err(db("Rotation"))?;
    info!(rotation_id, "Deleted rotation");
    Ok(MessageResponse {
        message: format!("Deleted rotation {rotation_id}"),
    })
}

/// Lists monthly tasks ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_monthly_tasks(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
) -> Result<ListNamedResponse, ApiError> {
    debug!(staff_id = principal.staff_id, "Listing monthly tasks");
    Ok(ListNamedResponse {
        items: persistence
            .list_monthly_tasks()
            .map_err(db("Monthly task"))?
            .iter()
            .map(NamedInfo::from)
            .collect(),
    })
}

/// Lists assignment groups ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_assignment_groups(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
) -> Result<ListNamedResponse, ApiError> {
    debug!(staff_id = principal.staff_id, "Listing assignment groups");
    Ok(ListNamedResponse {
        items: persistence
            .list_assignment_groups()
            .map_err(db("Assignment group"))?
            .iter()
            .map(NamedInfo::from)
            .collect(),
    })
}

/// Lists committees ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_committees(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
) -> Result<ListNamedResponse, ApiError> {
    debug!(staff_id = principal.staff_id, "Listing committees");
    Ok(ListNamedResponse {
        items: persistence
            .list_committees()
            .map_err(db("Committee"))?
            .iter()
            .map(NamedInfo::from)
            .collect(),
    })
}

/// Which named reference table a create targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedReference {
    MonthlyTask,
    AssignmentGroup,
    Committee,
}

impl NamedReference {
    const fn label(self) -> &'static str {
        match self {
            Self::MonthlyTask => "Monthly task",
            Self::AssignmentGroup => "Assignment group",
            Self::Committee => "Committee",
        }
    }
}

/// Creates a monthly task, assignment group or committee.
///
/// # Errors
///
/// Returns an error if the caller is not a manager or the name is blank or
/// taken.
pub fn create_named_reference(
    persistence: &mut SqlitePersistence,
    principal: &AuthenticatedStaff,
    kind: NamedReference,
    request: NamedRequest,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::require_manager(principal, "create_reference")?;
    let label: &'static str = kind.label();
    let name: String = request.name;
    validate_name(label, &name).map_err(translate_domain_error)?;

    let name: &str = name.trim();
    let id: i64 = match kind {
        NamedReference::MonthlyTask => persistence.create_monthly_task(name),
        NamedReference::AssignmentGroup => persistence.create_assignment_group(name),
        NamedReference::Committee => persistence.create_committee(name),
    }
    .map_err(db(label))?;
    info!(id, kind = label, "Created reference row");
    Ok(CreatedResponse {
        id,
        message: format!("Created {} '{name}'", label.to_lowercase()),
    })
}
