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

mod analytics;
mod daily_assignment;
mod error;
mod monthly_assignment;
mod period;
mod review;
mod rotation;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use analytics::{
    AppraisalSummary, FrequencyTable, ReferenceNames, StaffMonthlySummary, StatusTally,
    appraisal_summary, completion_percent, staff_monthly_summary, tally_statuses,
};
pub use daily_assignment::{
    DailyPosting, HISTORY_WINDOW_DAYS, TaskHistory, group_daily_postings, parse_daily_key,
    parse_daily_postings, plan_daily_assignment, recent_task_history,
};
pub use monthly_assignment::{
    MonthlyBulkEntry, fold_month_assignments, parse_monthly_postings, plan_monthly_bulk,
    validate_monthly_assignment,
};
pub use period::{DateRange, MonthPeriod};
pub use review::{
    ReviewOutcome, ReviewUpdate, Reviewer, TeamLeaderScope, apply_review, ensure_eligible,
    is_team_leader_assignment, parse_review_postings, team_leader_scope,
};
pub use rotation::{expand_rotation, rotation_day_at, validate_rotation};
pub use status::AssignmentStatus;

// Re-export public types
pub use error::DomainError;
pub use types::{
    AssignmentGroup, Committee, MonthlyAssignment, MonthlyAssignmentDraft, MonthlyTask, Rotation,
    RotationDay, RotationSlot, Shift, ShiftDraft, ShiftType, Staff, StaffRole, TaskCategory,
    TaskItem, TaskSet, format_time, parse_date, parse_time,
};
pub use validation::{find_duplicate_slot, validate_name, validate_shift_type, validate_staff};
