// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;
use ward_roster_domain::{DateRange, MonthPeriod, Rotation};

/// A command represents manager or team leader intent as data only.
///
/// Commands are the only way to request roster changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace every shift on one date with the posted task grid.
    AssignDay {
        /// The date being assigned.
        date: Date,
        /// Posted `"{category}_{shift_type_id}_{task_id}" -> staff_id` pairs.
        entries: Vec<(String, String)>,
    },
    /// Replace the listed staff members' shifts over a range with a rotation.
    AssignRotation {
        /// The rotation to expand, with its days loaded.
        rotation: Rotation,
        /// The staff members to assign.
        staff_ids: Vec<i64>,
        /// The inclusive range to cover.
        range: DateRange,
    },
    /// Replace every monthly assignment for one calendar month.
    AssignMonth {
        /// The month being assigned.
        month: MonthPeriod,
        /// Posted `tasks_{id}`, `committees_{id}` and `group_{id}` pairs.
        entries: Vec<(String, String)>,
    },
    /// Record a team leader's checklist for today.
    SubmitChecklist {
        /// The staff member submitting.
        reviewer_staff_id: i64,
        /// The current date.
        today: Date,
        /// Posted `status_{id}` and `notes_{id}` pairs.
        entries: Vec<(String, String)>,
    },
    /// Record a manager's review of one date.
    SubmitManagerReview {
        /// The date under review.
        date: Date,
        /// Posted `status_{id}`, `notes_{id}` and `approve_{id}` pairs.
        entries: Vec<(String, String)>,
    },
}

impl Command {
    /// A short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AssignDay { .. } => "AssignDay",
            Self::AssignRotation { .. } => "AssignRotation",
            Self::AssignMonth { .. } => "AssignMonth",
            Self::SubmitChecklist { .. } => "SubmitChecklist",
            Self::SubmitManagerReview { .. } => "SubmitManagerReview",
        }
    }
}
