// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;
use time::Date;
use ward_roster_domain::{DateRange, MonthlyAssignmentDraft, ReviewOutcome, Shift, ShiftDraft};

/// The slice of roster state a command is applied against.
///
/// Callers load only what the command needs; unused fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// Ids of active staff members.
    pub active_staff: Vec<i64>,
    /// Every shift on the date a review command targets.
    pub shifts: Vec<Shift>,
    /// Main assignment ids that mark a team leader.
    pub team_leader_assignment_ids: BTreeSet<i64>,
}

impl State {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_active_staff(mut self, active_staff: Vec<i64>) -> Self {
        self.active_staff = active_staff;
        self
    }

    #[must_use]
    pub fn with_shifts(mut self, shifts: Vec<Shift>) -> Self {
        self.shifts = shifts;
        self
    }

    #[must_use]
    pub fn with_team_leader_assignments(mut self, ids: BTreeSet<i64>) -> Self {
        self.team_leader_assignment_ids = ids;
        self
    }

    /// Finds a loaded shift by id.
    #[must_use]
    pub fn shift(&self, shift_id: i64) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.shift_id == shift_id)
    }
}

/// Which existing shifts a replacement removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftScope {
    /// Every shift on one date, whoever holds it.
    Date(Date),
    /// Every shift of the listed staff within the range.
    StaffRange {
        /// Staff whose shifts are replaced.
        staff_ids: Vec<i64>,
        /// The inclusive range.
        range: DateRange,
    },
}

/// A validated change ready to be persisted in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Delete every shift in scope, then insert the drafts.
    ReplaceShifts {
        scope: ShiftScope,
        drafts: Vec<ShiftDraft>,
    },
    /// Delete every monthly assignment with exactly this range, then insert
    /// the drafts.
    ReplaceMonthlyAssignments {
        range: DateRange,
        drafts: Vec<MonthlyAssignmentDraft>,
    },
    /// Write review outcomes onto existing shifts.
    ReviewShifts { outcomes: Vec<ReviewOutcome> },
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The change to persist.
    pub transition: Transition,
    /// The command that produced it.
    pub action: String,
    /// Human-readable summary for logs.
    pub details: String,
}
