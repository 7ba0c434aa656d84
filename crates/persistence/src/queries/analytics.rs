// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Analytics reads.
//!
//! Each summary loads both ledgers inside one transaction so the counts come
//! from a single snapshot. The aggregation itself is done by the domain.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;
use ward_roster_domain::{
    AppraisalSummary, DateRange, MonthPeriod, ReferenceNames, StaffMonthlySummary, TaskCategory,
    appraisal_summary, staff_monthly_summary,
};

use crate::error::PersistenceError;
use crate::queries::{monthly, reference, shifts};

/// Loads the id to name lookups for shift types, task items and monthly tasks.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn reference_names(conn: &mut SqliteConnection) -> Result<ReferenceNames, PersistenceError> {
    let shift_types: BTreeMap<i64, String> = reference::list_shift_types(conn)?
        .into_iter()
        .map(|t| (t.shift_type_id, t.name))
        .collect();

    let mut task_items = BTreeMap::new();
    for category in TaskCategory::ALL {
        task_items.insert(category, reference::task_item_names(conn, category)?);
    }

    let monthly_tasks: BTreeMap<i64, String> = reference::list_monthly_tasks(conn)?
        .into_iter()
        .map(|t| (t.monthly_task_id, t.name))
        .collect();

    Ok(ReferenceNames {
        shift_types,
        task_items,
        monthly_tasks,
    })
}

/// Per-staff frequency tables and shift history for one month.
///
/// # Errors
///
/// Returns an error if the database query fails or the month is invalid.
pub fn staff_monthly_summary_for(
    conn: &mut SqliteConnection,
    staff_id: i64,
    month: MonthPeriod,
) -> Result<StaffMonthlySummary, PersistenceError> {
    debug!(staff_id, %month, "Computing staff monthly summary");
    let range = month.range()?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let names = reference_names(conn)?;
        let shifts = shifts::shifts_for_staff_in_range(conn, staff_id, range)?;
        let assignments = monthly::monthly_assignments_for_staff(conn, staff_id, range)?;
        Ok(staff_monthly_summary(
            staff_id,
            month,
            &shifts,
            &assignments,
            &names,
        ))
    })
}

/// Completion percentages and status tallies for one staff member over a
/// range.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn appraisal_summary_for(
    conn: &mut SqliteConnection,
    staff_id: i64,
    range: DateRange,
) -> Result<AppraisalSummary, PersistenceError> {
    debug!(staff_id, start = %range.start(), end = %range.end(), "Computing appraisal summary");

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let shifts = shifts::shifts_for_staff_in_range(conn, staff_id, range)?;
        let assignments = monthly::monthly_assignments_for_staff(conn, staff_id, range)?;
        Ok(appraisal_summary(staff_id, range, &shifts, &assignments))
    })
}
