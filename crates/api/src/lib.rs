// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! API boundary for the ward roster.
//!
//! Handlers authenticate the caller, check roles, parse request fields and
//! hand roster commands to the core before persisting the result. Read
//! models are assembled here from persistence queries.

mod auth;
mod capabilities;
mod error;
mod handlers;
mod payload;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedStaff, AuthenticationService, AuthorizationService, can_manage};
pub use capabilities::{compute_capabilities, is_team_leader_on};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    NamedReference, appraisal, assign_day, assign_month, bulk_assign, check_bootstrap_status,
    checklist, create_first_manager, create_monthly_assignment, create_named_reference, create_rotation, create_shift,
    create_shift_type, create_staff, create_task_item, daily_assign_context, daily_detail,
    delete_monthly_assignment, delete_rotation, delete_shift, delete_shift_type, delete_staff,
    get_rotation, get_staff, list_assignment_groups, list_committees, list_monthly_assignments,
    list_monthly_tasks, list_rotations, list_shift_types, list_staff, list_task_items,
    manager_review, monthly_assignments_for_month, monthly_bulk_context, my_schedule,
    roster_grid, staff_analytics, submit_checklist, submit_manager_review, update_monthly_assignment,
    update_shift, update_staff,
};
pub use payload::{
    PayloadError, parse_category, parse_date_field, parse_day, parse_month, parse_optional_date,
    parse_role, parse_status, parse_time_field,
};
pub use request_response::{
    AppraisalRequest, AppraisalResponse, AssignmentResponse, BootstrapStatusResponse,
    BulkAssignRequest, CapabilitiesResponse, ChecklistResponse, CreateFirstManagerRequest,
    CreateRotationRequest, CreateShiftTypeRequest, CreatedResponse, DailyAssignContextResponse,
    DailyDetailResponse, FormEntriesRequest, ListMonthlyAssignmentsResponse, ListNamedResponse,
    ListRotationsResponse, ListShiftTypesResponse, ListStaffResponse, ListTaskItemsResponse,
    ManagerReviewResponse, MessageResponse, MonthRef, MonthlyAssignmentInfo,
    MonthlyAssignmentRequest, MonthlyBulkContextResponse, MyScheduleResponse, NamedInfo,
    NamedRequest, ReviewResponse, RosterGridResponse, RosterRow, RotationDayInfo,
    RotationDayRequest, RotationInfo, ShiftInfo, ShiftRequest, ShiftTypeGroup, ShiftTypeInfo,
    StaffAnalyticsResponse, StaffInfo, StaffRequest, TaskItemInfo,
};
