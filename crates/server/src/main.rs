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

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use ward_roster_api::{
    ApiError, AppraisalRequest, AppraisalResponse, AssignmentResponse, AuthenticatedStaff,
    BootstrapStatusResponse, BulkAssignRequest, CapabilitiesResponse, ChecklistResponse,
    CreateFirstManagerRequest, CreateRotationRequest, CreateShiftTypeRequest, CreatedResponse,
    DailyAssignContextResponse, DailyDetailResponse, FormEntriesRequest,
    ListMonthlyAssignmentsResponse, ListNamedResponse, ListRotationsResponse,
    ListShiftTypesResponse, ListStaffResponse, ListTaskItemsResponse, ManagerReviewResponse,
    MessageResponse, MonthlyAssignmentRequest, MonthlyBulkContextResponse, MyScheduleResponse,
    NamedReference, NamedRequest, ReviewResponse, RosterGridResponse, RotationInfo, ShiftRequest,
    StaffAnalyticsResponse, StaffInfo, StaffRequest, appraisal, assign_day, assign_month,
    bulk_assign, check_bootstrap_status, checklist, compute_capabilities, create_first_manager,
    create_monthly_assignment, create_named_reference, create_rotation, create_shift,
    create_shift_type, create_staff, create_task_item, daily_assign_context, daily_detail,
    delete_monthly_assignment, delete_rotation, delete_shift, delete_shift_type, delete_staff,
    get_rotation, get_staff, list_assignment_groups, list_committees, list_monthly_assignments,
    list_monthly_tasks, list_rotations, list_shift_types, list_staff, list_task_items,
    manager_review, monthly_assignments_for_month, monthly_bulk_context, my_schedule, parse_day,
    parse_optional_date, roster_grid, staff_analytics, submit_checklist, submit_manager_review,
    update_monthly_assignment, update_shift, update_staff,
};
use ward_roster_persistence::SqlitePersistence;

use crate::session::StaffSession;

/// Ward Roster Server - HTTP server for the ward roster system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Log filter used when `RUST_LOG` is not set
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The roster database.
    persistence: Arc<Mutex<SqlitePersistence>>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Error message.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Query carrying the caller's current date.
#[derive(Debug, Default, Deserialize)]
struct TodayQuery {
    /// `YYYY-MM-DD`; the server's UTC date when absent.
    today: Option<String>,
}

/// Query selecting the date under manager review.
#[derive(Debug, Default, Deserialize)]
struct ReviewDateQuery {
    /// `YYYY-MM-DD`; the server's UTC date when absent.
    date: Option<String>,
}

/// Query for listing staff.
#[derive(Debug, Default, Deserialize)]
struct ListStaffQuery {
    /// Include deactivated staff. Honoured for managers only.
    #[serde(default)]
    include_inactive: bool,
}

fn server_today() -> Date {
    OffsetDateTime::now_utc().date()
}

fn resolve_date(field: &'static str, value: Option<&str>) -> Result<Date, HttpError> {
    parse_optional_date(field, value, server_today()).map_err(|e| HttpError::from(ApiError::from(e)))
}

fn resolve_day(year: i32, month: u8, day: u8) -> Result<Date, HttpError> {
    parse_day(year, month, day).map_err(|e| HttpError::from(ApiError::from(e)))
}

// ============================================================================
// Roster views
// ============================================================================

/// Handler for GET `/roster/{year}/{month}`.
async fn handle_roster_grid(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path((year, month)): Path<(i32, u8)>,
) -> Result<Json<RosterGridResponse>, HttpError> {
    info!(staff_id = principal.staff_id, year, month, "Handling roster grid request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RosterGridResponse = roster_grid(&mut persistence, &principal, year, month)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/daily/{year}/{month}/{day}`.
async fn handle_daily_detail(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path((year, month, day)): Path<(i32, u8, u8)>,
) -> Result<Json<DailyDetailResponse>, HttpError> {
    info!(staff_id = principal.staff_id, year, month, day, "Handling daily detail request");
    let date: Date = resolve_day(year, month, day)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: DailyDetailResponse = daily_detail(&mut persistence, &principal, date)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/my-schedule`.
async fn handle_my_schedule(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Query(query): Query<TodayQuery>,
) -> Result<Json<MyScheduleResponse>, HttpError> {
    let today: Date = resolve_date("today", query.today.as_deref())?;
    info!(staff_id = principal.staff_id, %today, "Handling my schedule request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MyScheduleResponse = my_schedule(&mut persistence, &principal, today)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Assignment
// ============================================================================

/// Handler for GET `/daily-assign/{year}/{month}/{day}`.
async fn handle_daily_assign_context(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path((year, month, day)): Path<(i32, u8, u8)>,
) -> Result<Json<DailyAssignContextResponse>, HttpError> {
    info!(staff_id = principal.staff_id, year, month, day, "Handling daily assign form request");
    let date: Date = resolve_day(year, month, day)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: DailyAssignContextResponse =
        daily_assign_context(&mut persistence, &principal, date)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/daily-assign/{year}/{month}/{day}`.
///
/// Replaces every shift on the date.
async fn handle_assign_day(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path((year, month, day)): Path<(i32, u8, u8)>,
    Json(req): Json<FormEntriesRequest>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    info!(
        staff_id = principal.staff_id,
        year,
        month,
        day,
        entries = req.entries.len(),
        "Handling daily assign request"
    );
    let date: Date = resolve_day(year, month, day)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: AssignmentResponse = assign_day(&mut persistence, &principal, date, req)?;
    drop(persistence);

    info!(deleted = response.deleted, created = response.created, "Day assigned");
    Ok(Json(response))
}

/// Handler for POST `/bulk-assign`.
async fn handle_bulk_assign(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Json(req): Json<BulkAssignRequest>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    info!(
        staff_id = principal.staff_id,
        rotation_id = req.rotation_id,
        staff_count = req.staff_ids.len(),
        "Handling bulk assign request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AssignmentResponse = bulk_assign(&mut persistence, &principal, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/shifts`.
async fn handle_create_shift(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Json(req): Json<ShiftRequest>,
) -> Result<Json<CreatedResponse>, HttpError> {
    info!(staff_id = principal.staff_id, target = req.staff_id, date = %req.date, "Handling create shift request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreatedResponse = create_shift(&mut persistence, &principal, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/shifts/{id}`.
async fn handle_update_shift(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(shift_id): Path<i64>,
    Json(req): Json<ShiftRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(staff_id = principal.staff_id, shift_id, "Handling update shift request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = update_shift(&mut persistence, &principal, shift_id, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/shifts/{id}`.
async fn handle_delete_shift(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(shift_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(staff_id = principal.staff_id, shift_id, "Handling delete shift request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = delete_shift(&mut persistence, &principal, shift_id)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Monthly assignments
// ============================================================================

/// Handler for GET `/monthly-assignments/bulk/{year}/{month}`.
async fn handle_monthly_bulk_context(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path((year, month)): Path<(i32, u8)>,
) -> Result<Json<MonthlyBulkContextResponse>, HttpError> {
    info!(staff_id = principal.staff_id, year, month, "Handling monthly bulk form request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MonthlyBulkContextResponse =
        monthly_bulk_context(&mut persistence, &principal, year, month)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/monthly-assignments/bulk/{year}/{month}`.
async fn handle_assign_month(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path((year, month)): Path<(i32, u8)>,
    Json(req): Json<FormEntriesRequest>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    info!(
        staff_id = principal.staff_id,
        year,
        month,
        entries = req.entries.len(),
        "Handling monthly bulk assign request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AssignmentResponse = assign_month(&mut persistence, &principal, year, month, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/monthly-assignments`.
async fn handle_list_monthly_assignments(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
) -> Result<Json<ListMonthlyAssignmentsResponse>, HttpError> {
    info!(staff_id = principal.staff_id, "Handling list monthly assignments request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListMonthlyAssignmentsResponse =
        list_monthly_assignments(&mut persistence, &principal)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/monthly-assignments`.
async fn handle_create_monthly_assignment(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Json(req): Json<MonthlyAssignmentRequest>,
) -> Result<Json<CreatedResponse>, HttpError> {
    info!(staff_id = principal.staff_id, target = req.staff_id, "Handling create monthly assignment request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreatedResponse = create_monthly_assignment(&mut persistence, &principal, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/monthly-assignments/{id}`.
async fn handle_update_monthly_assignment(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(monthly_assignment_id): Path<i64>,
    Json(req): Json<MonthlyAssignmentRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(staff_id = principal.staff_id, monthly_assignment_id, "Handling update monthly assignment request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse =
        update_monthly_assignment(&mut persistence, &principal, monthly_assignment_id, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/monthly-assignments/{id}`.
async fn handle_delete_monthly_assignment(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(monthly_assignment_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(staff_id = principal.staff_id, monthly_assignment_id, "Handling delete monthly assignment request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse =
        delete_monthly_assignment(&mut persistence, &principal, monthly_assignment_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/monthly-assignments/{year}/{month}`.
async fn handle_monthly_assignments_for_month(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path((year, month)): Path<(i32, u8)>,
) -> Result<Json<ListMonthlyAssignmentsResponse>, HttpError> {
    info!(staff_id = principal.staff_id, year, month, "Handling monthly assignments for month request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListMonthlyAssignmentsResponse =
        monthly_assignments_for_month(&mut persistence, &principal, year, month)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Review
// ============================================================================

/// Handler for GET `/checklist`.
async fn handle_checklist(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Query(query): Query<TodayQuery>,
) -> Result<Json<ChecklistResponse>, HttpError> {
    let today: Date = resolve_date("today", query.today.as_deref())?;
    info!(staff_id = principal.staff_id, %today, "Handling checklist request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ChecklistResponse = checklist(&mut persistence, &principal, today)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/checklist`.
async fn handle_submit_checklist(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Query(query): Query<TodayQuery>,
    Json(req): Json<FormEntriesRequest>,
) -> Result<Json<ReviewResponse>, HttpError> {
    let today: Date = resolve_date("today", query.today.as_deref())?;
    info!(staff_id = principal.staff_id, %today, "Handling checklist submission");

    let mut persistence = app_state.persistence.lock().await;
    let response: ReviewResponse = submit_checklist(&mut persistence, &principal, today, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/manager-review`.
async fn handle_manager_review(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Query(query): Query<ReviewDateQuery>,
) -> Result<Json<ManagerReviewResponse>, HttpError> {
    let date: Date = resolve_date("date", query.date.as_deref())?;
    info!(staff_id = principal.staff_id, %date, "Handling manager review request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ManagerReviewResponse = manager_review(&mut persistence, &principal, date)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/manager-review`.
async fn handle_submit_manager_review(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Query(query): Query<ReviewDateQuery>,
    Json(req): Json<FormEntriesRequest>,
) -> Result<Json<ReviewResponse>, HttpError> {
    let date: Date = resolve_date("date", query.date.as_deref())?;
    info!(staff_id = principal.staff_id, %date, "Handling manager review submission");

    let mut persistence = app_state.persistence.lock().await;
    let response: ReviewResponse = submit_manager_review(&mut persistence, &principal, date, req)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Analytics
// ============================================================================

/// Handler for GET `/staff/{id}/analytics/{year}/{month}`.
async fn handle_staff_analytics(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path((staff_id, year, month)): Path<(i64, i32, u8)>,
) -> Result<Json<StaffAnalyticsResponse>, HttpError> {
    info!(caller = principal.staff_id, staff_id, year, month, "Handling staff analytics request");

    let mut persistence = app_state.persistence.lock().await;
    let response: StaffAnalyticsResponse =
        staff_analytics(&mut persistence, &principal, staff_id, year, month)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/appraisal`.
async fn handle_appraisal(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Query(query): Query<AppraisalRequest>,
) -> Result<Json<AppraisalResponse>, HttpError> {
    info!(
        caller = principal.staff_id,
        staff_id = query.staff_id,
        start_date = %query.start_date,
        end_date = %query.end_date,
        "Handling appraisal request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AppraisalResponse = appraisal(&mut persistence, &principal, &query)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Staff registry
// ============================================================================

/// Handler for GET `/staff`.
async fn handle_list_staff(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Query(query): Query<ListStaffQuery>,
) -> Result<Json<ListStaffResponse>, HttpError> {
    info!(staff_id = principal.staff_id, include_inactive = query.include_inactive, "Handling list staff request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListStaffResponse =
        list_staff(&mut persistence, &principal, query.include_inactive)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/staff`.
async fn handle_create_staff(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Json(req): Json<StaffRequest>,
) -> Result<Json<CreatedResponse>, HttpError> {
    info!(staff_id = principal.staff_id, name = %req.display_name, role = %req.role, "Handling create staff request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreatedResponse = create_staff(&mut persistence, &principal, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/staff/{id}`.
async fn handle_get_staff(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(staff_id): Path<i64>,
) -> Result<Json<StaffInfo>, HttpError> {
    info!(caller = principal.staff_id, staff_id, "Handling get staff request");

    let mut persistence = app_state.persistence.lock().await;
    let response: StaffInfo = get_staff(&mut persistence, &principal, staff_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/staff/{id}`.
async fn handle_update_staff(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(staff_id): Path<i64>,
    Json(req): Json<StaffRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(caller = principal.staff_id, staff_id, is_active = req.is_active, "Handling update staff request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = update_staff(&mut persistence, &principal, staff_id, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/staff/{id}`.
async fn handle_delete_staff(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(staff_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(caller = principal.staff_id, staff_id, "Handling delete staff request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = delete_staff(&mut persistence, &principal, staff_id)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Reference data
// ============================================================================

/// Handler for GET `/shift-types`.
async fn handle_list_shift_types(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
) -> Result<Json<ListShiftTypesResponse>, HttpError> {
    info!(staff_id = principal.staff_id, "Handling list shift types request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListShiftTypesResponse = list_shift_types(&mut persistence, &principal)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/shift-types`.
async fn handle_create_shift_type(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Json(req): Json<CreateShiftTypeRequest>,
) -> Result<Json<CreatedResponse>, HttpError> {
    info!(staff_id = principal.staff_id, name = %req.name, "Handling create shift type request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreatedResponse = create_shift_type(&mut persistence, &principal, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/shift-types/{id}`.
async fn handle_delete_shift_type(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(shift_type_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(staff_id = principal.staff_id, shift_type_id, "Handling delete shift type request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = delete_shift_type(&mut persistence, &principal, shift_type_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/tasks/{category}`.
async fn handle_list_task_items(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(category): Path<String>,
) -> Result<Json<ListTaskItemsResponse>, HttpError> {
    info!(staff_id = principal.staff_id, category = %category, "Handling list task items request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListTaskItemsResponse = list_task_items(&mut persistence, &principal, &category)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/tasks/{category}`.
async fn handle_create_task_item(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(category): Path<String>,
    Json(req): Json<NamedRequest>,
) -> Result<Json<CreatedResponse>, HttpError> {
    info!(staff_id = principal.staff_id, category = %category, name = %req.name, "Handling create task item request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreatedResponse =
        create_task_item(&mut persistence, &principal, &category, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/rotations`.
async fn handle_list_rotations(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
) -> Result<Json<ListRotationsResponse>, HttpError> {
    info!(staff_id = principal.staff_id, "Handling list rotations request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListRotationsResponse = list_rotations(&mut persistence, &principal)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/rotations`.
async fn handle_create_rotation(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Json(req): Json<CreateRotationRequest>,
) -> Result<Json<CreatedResponse>, HttpError> {
    info!(staff_id = principal.staff_id, name = %req.name, length_in_days = req.length_in_days, "Handling create rotation request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreatedResponse = create_rotation(&mut persistence, &principal, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/rotations/{id}`.
async fn handle_get_rotation(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(rotation_id): Path<i64>,
) -> Result<Json<RotationInfo>, HttpError> {
    info!(staff_id = principal.staff_id, rotation_id, "Handling get rotation request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RotationInfo = get_rotation(&mut persistence, &principal, rotation_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/rotations/{id}`.
async fn handle_delete_rotation(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Path(rotation_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(staff_id = principal.staff_id, rotation_id, "Handling delete rotation request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = delete_rotation(&mut persistence, &principal, rotation_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/monthly-tasks`.
async fn handle_list_monthly_tasks(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
) -> Result<Json<ListNamedResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListNamedResponse = list_monthly_tasks(&mut persistence, &principal)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/groups`.
async fn handle_list_groups(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
) -> Result<Json<ListNamedResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListNamedResponse = list_assignment_groups(&mut persistence, &principal)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/committees`.
async fn handle_list_committees(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
) -> Result<Json<ListNamedResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListNamedResponse = list_committees(&mut persistence, &principal)?;
    drop(persistence);

    Ok(Json(response))
}

async fn create_reference(
    app_state: &AppState,
    principal: &AuthenticatedStaff,
    kind: NamedReference,
    req: NamedRequest,
) -> Result<Json<CreatedResponse>, HttpError> {
    info!(staff_id = principal.staff_id, kind = ?kind, name = %req.name, "Handling create reference request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreatedResponse = create_named_reference(&mut persistence, principal, kind, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/monthly-tasks`.
async fn handle_create_monthly_task(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Json(req): Json<NamedRequest>,
) -> Result<Json<CreatedResponse>, HttpError> {
    create_reference(&app_state, &principal, NamedReference::MonthlyTask, req).await
}

/// Handler for POST `/groups`.
async fn handle_create_group(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Json(req): Json<NamedRequest>,
) -> Result<Json<CreatedResponse>, HttpError> {
    create_reference(&app_state, &principal, NamedReference::AssignmentGroup, req).await
}

/// Handler for POST `/committees`.
async fn handle_create_committee(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Json(req): Json<NamedRequest>,
) -> Result<Json<CreatedResponse>, HttpError> {
    create_reference(&app_state, &principal, NamedReference::Committee, req).await
}

// ============================================================================
// Bootstrap
// ============================================================================

/// Handler for GET `/bootstrap/status`.
async fn handle_bootstrap_status(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<BootstrapStatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: BootstrapStatusResponse = check_bootstrap_status(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/bootstrap/first-manager`.
///
/// Unauthenticated. Rejected once any staff member exists.
async fn handle_create_first_manager(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateFirstManagerRequest>,
) -> Result<Json<CreatedResponse>, HttpError> {
    info!(name = %req.display_name, "Handling first manager request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreatedResponse = create_first_manager(&mut persistence, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/capabilities`.
async fn handle_capabilities(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(principal): StaffSession,
    Query(query): Query<TodayQuery>,
) -> Result<Json<CapabilitiesResponse>, HttpError> {
    let today: Date = resolve_date("today", query.today.as_deref())?;
    info!(staff_id = principal.staff_id, %today, "Handling capabilities request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CapabilitiesResponse = compute_capabilities(&mut persistence, &principal, today)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/roster/{year}/{month}", get(handle_roster_grid))
        .route("/daily/{year}/{month}/{day}", get(handle_daily_detail))
        .route("/my-schedule", get(handle_my_schedule))
        .route(
            "/daily-assign/{year}/{month}/{day}",
            get(handle_daily_assign_context).post(handle_assign_day),
        )
        .route("/bulk-assign", post(handle_bulk_assign))
        .route("/shifts", post(handle_create_shift))
        .route(
            "/shifts/{id}",
            put(handle_update_shift).delete(handle_delete_shift),
        )
        .route(
            "/monthly-assignments/bulk/{year}/{month}",
            get(handle_monthly_bulk_context).post(handle_assign_month),
        )
        .route(
            "/monthly-assignments",
            get(handle_list_monthly_assignments).post(handle_create_monthly_assignment),
        )
        .route(
            "/monthly-assignments/{id}",
            put(handle_update_monthly_assignment)
                .delete(handle_delete_monthly_assignment),
        )
        .route(
            "/monthly-assignments/{year}/{month}",
            get(handle_monthly_assignments_for_month),
        )
        .route(
            "/checklist",
            get(handle_checklist).post(handle_submit_checklist),
        )
        .route(
            "/manager-review",
            get(handle_manager_review).post(handle_submit_manager_review),
        )
        .route(
            "/staff/{id}/analytics/{year}/{month}",
            get(handle_staff_analytics),
        )
        .route("/appraisal", get(handle_appraisal))
        .route("/staff", get(handle_list_staff).post(handle_create_staff))
        .route(
            "/staff/{id}",
            get(handle_get_staff)
                .put(handle_update_staff)
                .delete(handle_delete_staff),
        )
        .route(
            "/shift-types",
            get(handle_list_shift_types).post(handle_create_shift_type),
        )
        .route("/shift-types/{id}", delete(handle_delete_shift_type))
        .route(
            "/tasks/{category}",
            get(handle_list_task_items).post(handle_create_task_item),
        )
        .route(
            "/rotations",
            get(handle_list_rotations).post(handle_create_rotation),
        )
        .route(
            "/rotations/{id}",
            get(handle_get_rotation).delete(handle_delete_rotation),
        )
        .route(
            "/monthly-tasks",
            get(handle_list_monthly_tasks).post(handle_create_monthly_task),
        )
        .route("/groups", get(handle_list_groups).post(handle_create_group))
        .route(
            "/committees",
            get(handle_list_committees).post(handle_create_committee),
        )
        .route("/capabilities", get(handle_capabilities))
        .route("/bootstrap/status", get(handle_bootstrap_status))
        .route(
            "/bootstrap/first-manager",
            post(handle_create_first_manager),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("Initializing Ward Roster Server");

    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };
    if persistence.count_staff()? == 0 {
        warn!("No staff registered; create the first manager via POST /bootstrap/first-manager");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
