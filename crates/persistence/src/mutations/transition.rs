// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transition persistence.
//!
//! Every transition is written inside one transaction. Bulk replaces delete
//! the whole scope and insert the drafts; any failure, including a
//! uniqueness violation, rolls the scope back to its prior contents.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};
use ward_roster::{Transition, TransitionResult};
use ward_roster_domain::find_duplicate_slot;

use crate::error::PersistenceError;
use crate::mutations::monthly::{
    delete_monthly_for_period, ensure_monthly_draft_references, insert_monthly_assignment,
};
use crate::mutations::shifts::{
    delete_shifts_in_scope, ensure_draft_references, insert_shift, record_review,
};

/// What a persisted transition changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// Rows removed by a bulk replace.
    pub deleted: usize,
    /// Ids of inserted shifts or monthly assignments, in draft order.
    pub inserted_ids: Vec<i64>,
    /// Number of shifts whose review fields were written.
    pub reviewed: usize,
}

/// Persists a transition result in a single transaction.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if two drafts share a slot or a
/// draft collides with a shift outside the replaced scope,
/// `PersistenceError::ReferenceNotFound` for unknown references and
/// `PersistenceError::NotFound` if a reviewed shift vanished.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    info!(action = %result.action, details = %result.details, "Persisting transition");

    let persisted = conn
        .immediate_transaction::<_, PersistenceError, _>(|conn| match &result.transition {
        Transition::ReplaceShifts { scope, drafts } => {
            if let Some(duplicate) = find_duplicate_slot(drafts) {
                return Err(PersistenceError::Conflict(format!(
                    "Staff {} is assigned shift type {} twice on {}",
                    duplicate.staff_id, duplicate.shift_type_id, duplicate.date
                )));
            }
            ensure_draft_references(conn, drafts)?;

            let deleted = delete_shifts_in_scope(conn, scope)?;
            let mut inserted_ids: Vec<i64> = Vec::with_capacity(drafts.len());
            for draft in drafts {
                inserted_ids.push(insert_shift(conn, draft)?);
            }
            Ok(PersistTransitionResult {
                deleted,
                inserted_ids,
                reviewed: 0,
            })
        }
        Transition::ReplaceMonthlyAssignments { range, drafts } => {
            ensure_monthly_draft_references(conn, drafts)?;

            let deleted = delete_monthly_for_period(conn, *range)?;
            let mut inserted_ids: Vec<i64> = Vec::with_capacity(drafts.len());
            for draft in drafts {
                inserted_ids.push(insert_monthly_assignment(conn, draft)?);
            }
            Ok(PersistTransitionResult {
                deleted,
                inserted_ids,
                reviewed: 0,
            })
        }
        Transition::ReviewShifts { outcomes } => {
            for outcome in outcomes {
                record_review(conn, outcome)?;
            }
            Ok(PersistTransitionResult {
                deleted: 0,
                inserted_ids: Vec::new(),
                reviewed: outcomes.len(),
            })
        }
    })?;

    debug!(
        deleted = persisted.deleted,
        inserted = persisted.inserted_ids.len(),
        reviewed = persisted.reviewed,
        "Transition persisted"
    );
    Ok(persisted)
}
