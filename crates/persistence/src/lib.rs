// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the ward roster.
//!
//! This crate stores staff, reference data, the shift ledger and the
//! monthly assignment ledger in `SQLite` through Diesel.
//!
//! ## Transactions
//!
//! Every bulk replace runs inside one transaction: the target scope is
//! deleted and the drafts inserted, or nothing changes at all. A collision
//! on `(staff, date, shift type)` surfaces as `PersistenceError::Conflict`.
//!
//! Analytics reads load both ledgers inside one transaction so the counts
//! reflect a single snapshot.
//!
//! ## Delete rules
//!
//! - Deleting a staff member removes their shifts and monthly assignments.
//! - Deleting a shift type is refused while any shift uses it.
//! - Deleting a task item removes it from every shift's task set.
//!
//! ## Testing
//!
//! Tests run against `Persistence::new_in_memory()`, which hands out a fresh
//! shared in-memory database per call.

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

use diesel::SqliteConnection;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, Time};
use ward_roster::TransitionResult;
use ward_roster_domain::{
    AppraisalSummary, AssignmentGroup, Committee, DateRange, MonthPeriod, MonthlyAssignment,
    MonthlyAssignmentDraft, MonthlyTask, Rotation, Shift, ShiftDraft, ShiftType, Staff,
    StaffMonthlySummary, StaffRole, TaskCategory, TaskItem,
};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Binds the item table and the shift membership table of a task category.
///
/// The four categories share one shape: item tables have `(item_id, name)`
/// and membership tables have `(shift_id, item_id)`. Diesel needs concrete
/// tables at compile time, so the body is expanded once per category.
///
/// ```ignore
/// let names: Vec<String> = category_tables!(category, |items, _links| {
///     items::table.select(items::name).load(conn)?
/// });
/// ```
macro_rules! category_tables {
    ($category:expr, |$items:ident, $links:ident| $body:expr) => {
        match $category {
            ward_roster_domain::TaskCategory::Main => {
                #[allow(unused_imports)]
                use $crate::diesel_schema::assignments as $items;
                #[allow(unused_imports)]
                use $crate::diesel_schema::shift_assignments as $links;
                $body
            }
            ward_roster_domain::TaskCategory::Sub => {
                #[allow(unused_imports)]
                use $crate::diesel_schema::sub_assignments as $items;
                #[allow(unused_imports)]
                use $crate::diesel_schema::shift_sub_assignments as $links;
                $body
            }
            ward_roster_domain::TaskCategory::Clinic => {
                #[allow(unused_imports)]
                use $crate::diesel_schema::clinics as $items;
                #[allow(unused_imports)]
                use $crate::diesel_schema::shift_clinics as $links;
                $body
            }
            ward_roster_domain::TaskCategory::Emergency => {
                #[allow(unused_imports)]
                use $crate::diesel_schema::emergency_roles as $items;
                #[allow(unused_imports)]
                use $crate::diesel_schema::shift_emergency_roles as $links;
                $body
            }
        }
    };
}

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::PersistTransitionResult;

use backend::PersistenceBackend;
use backend::sqlite::StorageMode;

/// Type alias kept for callers that name the backend explicitly.
pub type SqlitePersistence = Persistence;

/// Persistence adapter for the roster ledgers and reference data.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_roster_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            backend::sqlite::open(&shared_memory_url, StorageMode::Memory)?;
        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection = backend::sqlite::open(path_str, StorageMode::File)?;
        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Persists a transition result in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails; nothing is written in that case.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        mutations::persist_transition(&mut self.conn, result)
    }

    // ========================================================================
    // Staff
    // ========================================================================

    /// Retrieves a staff member by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_staff(&mut self, staff_id: i64) -> Result<Option<Staff>, PersistenceError> {
        queries::staff::get_staff(&mut self.conn, staff_id)
    }

    /// Lists staff ordered by display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_staff(&mut self, active_only: bool) -> Result<Vec<Staff>, PersistenceError> {
        queries::staff::list_staff(&mut self.conn, active_only)
    }

    /// Counts staff members, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_staff(&mut self) -> Result<i64, PersistenceError> {
        queries::staff::count_staff(&mut self.conn)
    }

    /// Ids of every active staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn active_staff_ids(&mut self) -> Result<Vec<i64>, PersistenceError> {
        queries::staff::active_staff_ids(&mut self.conn)
    }

    /// Creates a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub fn create_staff(
        &mut self,
        display_name: &str,
        role: StaffRole,
        is_active: bool,
    ) -> Result<i64, PersistenceError> {
        mutations::staff::create_staff(&mut self.conn, display_name, role, is_active)
    }

    /// Updates a staff member.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the staff member does not exist.
    pub fn update_staff(&mut self, staff: &Staff) -> Result<(), PersistenceError> {
        mutations::staff::update_staff(
            &mut self.conn,
            staff.staff_id,
            &staff.display_name,
            staff.role,
            staff.is_active,
        )
    }

    /// Deletes a staff member and everything they own.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the staff member does not exist.
    pub fn delete_staff(&mut self, staff_id: i64) -> Result<(), PersistenceError> {
        mutations::staff::delete_staff(&mut self.conn, staff_id)
    }

    // ========================================================================
    // Reference data
    // ========================================================================

    /// Lists shift types ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_shift_types(&mut self) -> Result<Vec<ShiftType>, PersistenceError> {
        queries::reference::list_shift_types(&mut self.conn)
    }

    /// Retrieves a shift type by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_shift_type(
        &mut self,
        shift_type_id: i64,
    ) -> Result<Option<ShiftType>, PersistenceError> {
        queries::reference::get_shift_type(&mut self.conn, shift_type_id)
    }

    /// Creates a shift type.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Conflict` if the name is taken.
    pub fn create_shift_type(
        &mut self,
        name: &str,
        start_time: Time,
        end_time: Time,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::create_shift_type(&mut self.conn, name, start_time, end_time)
    }

    /// Deletes an unused shift type.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Referenced` while shifts use it.
    pub fn delete_shift_type(&mut self, shift_type_id: i64) -> Result<(), PersistenceError> {
        mutations::reference::delete_shift_type(&mut self.conn, shift_type_id)
    }

    /// Lists the items of one task category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_task_items(
        &mut self,
        category: TaskCategory,
    ) -> Result<Vec<TaskItem>, PersistenceError> {
        queries::reference::list_task_items(&mut self.conn, category)
    }

    /// Creates an item in one task category.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Conflict` if the name is taken.
    pub fn create_task_item(
        &mut self,
        category: TaskCategory,
        name: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::create_task_item(&mut self.conn, category, name)
    }

    /// Main assignment ids that mark a team leader.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn team_leader_assignment_ids(&mut self) -> Result<BTreeSet<i64>, PersistenceError> {
        queries::reference::team_leader_assignment_ids(&mut self.conn)
    }

    /// Lists rotations with their days.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_rotations(&mut self) -> Result<Vec<Rotation>, PersistenceError> {
        queries::reference::list_rotations(&mut self.conn)
    }

    /// Retrieves a rotation with its days.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_rotation(&mut self, rotation_id: i64) -> Result<Option<Rotation>, PersistenceError> {
        queries::reference::get_rotation(&mut self.conn, rotation_id)
    }

    /// Creates a rotation with its days.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or a shift type is unknown.
    pub fn create_rotation(&mut self, rotation: &Rotation) -> Result<i64, PersistenceError> {
        mutations::reference::create_rotation(&mut self.conn, rotation)
    }

    /// Deletes a rotation.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the rotation does not exist.
    pub fn delete_rotation(&mut self, rotation_id: i64) -> Result<(), PersistenceError> {
        mutations::reference::delete_rotation(&mut self.conn, rotation_id)
    }

    /// Lists monthly tasks ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_monthly_tasks(&mut self) -> Result<Vec<MonthlyTask>, PersistenceError> {
        queries::reference::list_monthly_tasks(&mut self.conn)
    }

    /// Creates a monthly task.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Conflict` if the name is taken.
    pub fn create_monthly_task(&mut self, name: &str) -> Result<i64, PersistenceError> {
        mutations::reference::create_monthly_task(&mut self.conn, name)
    }

    /// Lists assignment groups ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_assignment_groups(&mut self) -> Result<Vec<AssignmentGroup>, PersistenceError> {
        queries::reference::list_assignment_groups(&mut self.conn)
    }

    /// Creates an assignment group.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Conflict` if the name is taken.
    pub fn create_assignment_group(&mut self, name: &str) -> Result<i64, PersistenceError> {
        mutations::reference::create_assignment_group(&mut self.conn, name)
    }

    /// Lists committees ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_committees(&mut self) -> Result<Vec<Committee>, PersistenceError> {
        queries::reference::list_committees(&mut self.conn)
    }

    /// Creates a committee.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Conflict` if the name is taken.
    pub fn create_committee(&mut self, name: &str) -> Result<i64, PersistenceError> {
        mutations::reference::create_committee(&mut self.conn, name)
    }

    // ========================================================================
    // Shift ledger
    // ========================================================================

    /// Retrieves a shift with its task sets.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_shift(&mut self, shift_id: i64) -> Result<Option<Shift>, PersistenceError> {
        queries::shifts::get_shift(&mut self.conn, shift_id)
    }

    /// Every shift on one date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn shifts_on_date(&mut self, date: Date) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::shifts_on_date(&mut self.conn, date)
    }

    /// Every shift within an inclusive range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn shifts_in_range(&mut self, range: DateRange) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::shifts_in_range(&mut self.conn, range)
    }

    /// One staff member's shifts on or after a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn shifts_for_staff_from(
        &mut self,
        staff_id: i64,
        from: Date,
    ) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::shifts_for_staff_from(&mut self.conn, staff_id, from)
    }

    /// Creates one shift.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Conflict` if the slot is taken.
    pub fn create_shift(&mut self, draft: &ShiftDraft) -> Result<i64, PersistenceError> {
        mutations::shifts::create_shift(&mut self.conn, draft)
    }

    /// Rewrites one shift.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the shift does not exist.
    pub fn update_shift(&mut self, shift_id: i64, draft: &ShiftDraft) -> Result<(), PersistenceError> {
        mutations::shifts::update_shift(&mut self.conn, shift_id, draft)
    }

    /// Deletes one shift.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the shift does not exist.
    pub fn delete_shift(&mut self, shift_id: i64) -> Result<(), PersistenceError> {
        mutations::shifts::delete_shift(&mut self.conn, shift_id)
    }

    // ========================================================================
    // Monthly assignment ledger
    // ========================================================================

    /// Retrieves a monthly assignment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_monthly_assignment(
        &mut self,
        monthly_assignment_id: i64,
    ) -> Result<Option<MonthlyAssignment>, PersistenceError> {
        queries::monthly::get_monthly_assignment(&mut self.conn, monthly_assignment_id)
    }

    /// Every monthly assignment, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_monthly_assignments(&mut self) -> Result<Vec<MonthlyAssignment>, PersistenceError> {
        queries::monthly::list_monthly_assignments(&mut self.conn)
    }

    /// Assignments overlapping a range, ordered by task name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn monthly_assignments_overlapping(
        &mut self,
        range: DateRange,
    ) -> Result<Vec<MonthlyAssignment>, PersistenceError> {
        queries::monthly::monthly_assignments_overlapping(&mut self.conn, range)
    }

    /// Assignments stored for exactly this period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn monthly_assignments_for_period(
        &mut self,
        range: DateRange,
    ) -> Result<Vec<MonthlyAssignment>, PersistenceError> {
        queries::monthly::monthly_assignments_for_period(&mut self.conn, range)
    }

    /// Creates one monthly assignment.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReferenceNotFound` for unknown references.
    pub fn create_monthly_assignment(
        &mut self,
        draft: &MonthlyAssignmentDraft,
    ) -> Result<i64, PersistenceError> {
        mutations::monthly::create_monthly_assignment(&mut self.conn, draft)
    }

    /// Rewrites one monthly assignment.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the assignment does not exist.
    pub fn update_monthly_assignment(
        &mut self,
        monthly_assignment_id: i64,
        draft: &MonthlyAssignmentDraft,
    ) -> Result<(), PersistenceError> {
        mutations::monthly::update_monthly_assignment(&mut self.conn, monthly_assignment_id, draft)
    }

    /// Deletes one monthly assignment.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the assignment does not exist.
    pub fn delete_monthly_assignment(
        &mut self,
        monthly_assignment_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::monthly::delete_monthly_assignment(&mut self.conn, monthly_assignment_id)
    }

    // ========================================================================
    // Analytics
    // ========================================================================

    /// Id to name map for one task category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn task_item_names(
        &mut self,
        category: TaskCategory,
    ) -> Result<BTreeMap<i64, String>, PersistenceError> {
        queries::reference::task_item_names(&mut self.conn, category)
    }

    /// Frequency tables and shift history for one staff member and month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn staff_monthly_summary(
        &mut self,
        staff_id: i64,
        month: MonthPeriod,
    ) -> Result<StaffMonthlySummary, PersistenceError> {
        queries::analytics::staff_monthly_summary_for(&mut self.conn, staff_id, month)
    }

    /// Completion percentages and status tallies over a range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn appraisal_summary(
        &mut self,
        staff_id: i64,
        range: DateRange,
    ) -> Result<AppraisalSummary, PersistenceError> {
        queries::analytics::appraisal_summary_for(&mut self.conn, staff_id, range)
    }
}
