// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only aggregation over the shift and monthly assignment ledgers.
//!
//! Nothing here fails: missing data yields empty tables and zero
//! percentages. Callers are expected to load their inputs from a single
//! consistent snapshot.

use crate::period::{DateRange, MonthPeriod};
use crate::status::AssignmentStatus;
use crate::types::{MonthlyAssignment, Shift, TaskCategory};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts keyed by display name.
pub type FrequencyTable = BTreeMap<String, usize>;

/// Counts keyed by reviewed status.
pub type StatusTally = BTreeMap<AssignmentStatus, usize>;

/// Id to name lookups used to label frequency tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceNames {
    pub shift_types: BTreeMap<i64, String>,
    pub task_items: BTreeMap<TaskCategory, BTreeMap<i64, String>>,
    pub monthly_tasks: BTreeMap<i64, String>,
}

impl ReferenceNames {
    fn item_name(&self, category: TaskCategory, item_id: i64) -> Option<&String> {
        self.task_items.get(&category).and_then(|m| m.get(&item_id))
    }
}

/// Completion percentage rounded to one decimal place.
///
/// Exact ties round to the even neighbour, so 1 of 16 is 6.2. Returns `0.0`
/// when `total` is zero.
#[must_use]
pub fn completion_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let completed = completed.to_f64().unwrap_or(0.0);
    let total = total.to_f64().unwrap_or(1.0);
    let percent = completed / total * 100.0;
    (percent * 10.0).round_ties_even() / 10.0
}

/// Tallies reviewed statuses; `Pending` is not counted.
pub fn tally_statuses(statuses: impl IntoIterator<Item = AssignmentStatus>) -> StatusTally {
    let mut tally = StatusTally::new();
    for status in statuses.into_iter().filter(AssignmentStatus::is_reviewed) {
        *tally.entry(status).or_insert(0) += 1;
    }
    tally
}

fn percent_from_tally(tally: &StatusTally) -> f64 {
    let total: usize = tally.values().sum();
    let completed = tally.get(&AssignmentStatus::Completed).copied().unwrap_or(0);
    completion_percent(completed, total)
}

/// Completion figures for one staff member over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppraisalSummary {
    pub daily_completion_percent: f64,
    pub monthly_completion_percent: f64,
    pub daily_status_counts: StatusTally,
    pub monthly_status_counts: StatusTally,
}

/// Computes the appraisal summary for one staff member.
///
/// Shifts count when their date falls in `range`. Monthly assignments count
/// when their own range overlaps `range`. Only reviewed statuses take part.
#[must_use]
pub fn appraisal_summary(
    staff_id: i64,
    range: DateRange,
    shifts: &[Shift],
    assignments: &[MonthlyAssignment],
) -> AppraisalSummary {
    let daily_status_counts = tally_statuses(
        shifts
            .iter()
            .filter(|s| s.staff_id == staff_id && range.contains(s.date))
            .map(|s| s.status),
    );
    let monthly_status_counts = tally_statuses(
        assignments
            .iter()
            .filter(|a| a.staff_id == staff_id && range.overlaps(a.start_date, a.end_date))
            .map(|a| a.status),
    );

    AppraisalSummary {
        daily_completion_percent: percent_from_tally(&daily_status_counts),
        monthly_completion_percent: percent_from_tally(&monthly_status_counts),
        daily_status_counts,
        monthly_status_counts,
    }
}

/// What one staff member did during one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMonthlySummary {
    pub shift_type_counts: FrequencyTable,
    pub assignment_counts: FrequencyTable,
    pub sub_assignment_counts: FrequencyTable,
    pub clinic_counts: FrequencyTable,
    pub emergency_role_counts: FrequencyTable,
    pub monthly_task_counts: FrequencyTable,
    /// Shifts in the month, ordered by date.
    pub shift_history: Vec<Shift>,
}

impl StaffMonthlySummary {
    /// The frequency table for a task category.
    #[must_use]
    pub const fn category_counts(&self, category: TaskCategory) -> &FrequencyTable {
        match category {
            TaskCategory::Main => &self.assignment_counts,
            TaskCategory::Sub => &self.sub_assignment_counts,
            TaskCategory::Clinic => &self.clinic_counts,
            TaskCategory::Emergency => &self.emergency_role_counts,
        }
    }

    const fn category_counts_mut(&mut self, category: TaskCategory) -> &mut FrequencyTable {
        match category {
            TaskCategory::Main => &mut self.assignment_counts,
            TaskCategory::Sub => &mut self.sub_assignment_counts,
            TaskCategory::Clinic => &mut self.clinic_counts,
            TaskCategory::Emergency => &mut self.emergency_role_counts,
        }
    }
}

/// Builds the monthly summary for one staff member.
///
/// Monthly assignments count when their start date falls in the month;
/// task-less assignments are not counted. Ids missing from `names` are
/// skipped.
#[must_use]
pub fn staff_monthly_summary(
    staff_id: i64,
    month: MonthPeriod,
    shifts: &[Shift],
    assignments: &[MonthlyAssignment],
    names: &ReferenceNames,
) -> StaffMonthlySummary {
    let mut summary = StaffMonthlySummary::default();
    let Ok(range) = month.range() else {
        return summary;
    };

    let mut history: Vec<Shift> = shifts
        .iter()
        .filter(|s| s.staff_id == staff_id && range.contains(s.date))
        .cloned()
        .collect();
    history.sort_by_key(|s| (s.date, s.shift_id));

    for shift in &history {
        if let Some(name) = names.shift_types.get(&shift.shift_type_id) {
            *summary.shift_type_counts.entry(name.clone()).or_insert(0) += 1;
        }
        for category in TaskCategory::ALL {
            for item_id in shift.tasks.get(category) {
                if let Some(name) = names.item_name(category, *item_id) {
                    *summary
                        .category_counts_mut(category)
                        .entry(name.clone())
                        .or_insert(0) += 1;
                }
            }
        }
    }

    for assignment in assignments
        .iter()
        .filter(|a| a.staff_id == staff_id && range.contains(a.start_date))
    {
        if let Some(name) = assignment.task_id.and_then(|t| names.monthly_tasks.get(&t)) {
            *summary.monthly_task_counts.entry(name.clone()).or_insert(0) += 1;
        }
    }

    summary.shift_history = history;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskSet;
    use time::Date;
    use time::macros::date;

    fn shift(shift_id: i64, date: Date, shift_type_id: i64, status: AssignmentStatus) -> Shift {
        Shift {
            shift_id,
            staff_id: 1,
            date,
            shift_type_id,
            tasks: TaskSet::new(),
            notes: None,
            status,
            team_leader_notes: None,
            is_approved_by_manager: false,
        }
    }

    fn assignment(task_id: Option<i64>, start: Date, end: Date, status: AssignmentStatus) -> MonthlyAssignment {
        MonthlyAssignment {
            monthly_assignment_id: 0,
            staff_id: 1,
            task_id,
            start_date: start,
            end_date: end,
            group_id: None,
            committee_id: None,
            status,
            notes: String::new(),
        }
    }

    fn march_range() -> DateRange {
        match DateRange::new(date!(2026 - 03 - 01), date!(2026 - 03 - 31)) {
            Ok(r) => r,
            Err(e) => panic!("valid range rejected: {e}"),
        }
    }

    #[test]
    fn test_completion_percent_rounding() {
        assert!((completion_percent(3, 5) - 60.0).abs() < f64::EPSILON);
        assert!((completion_percent(1, 3) - 33.3).abs() < 1e-9);
        assert!((completion_percent(2, 3) - 66.7).abs() < 1e-9);
        assert!(completion_percent(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completion_percent_ties_round_to_even() {
        assert!((completion_percent(1, 16) - 6.2).abs() < 1e-9);
        assert!((completion_percent(5, 16) - 31.2).abs() < 1e-9);
        assert!((completion_percent(3, 16) - 18.8).abs() < 1e-9);
    }

    #[test]
    fn test_appraisal_three_of_five_completed() {
        let shifts = vec![
            shift(1, date!(2026 - 03 - 01), 1, AssignmentStatus::Completed),
            shift(2, date!(2026 - 03 - 02), 1, AssignmentStatus::Completed),
            shift(3, date!(2026 - 03 - 03), 1, AssignmentStatus::Completed),
            shift(4, date!(2026 - 03 - 04), 1, AssignmentStatus::Partial),
            shift(5, date!(2026 - 03 - 05), 1, AssignmentStatus::NotCompleted),
            shift(6, date!(2026 - 03 - 06), 1, AssignmentStatus::Pending),
            shift(7, date!(2026 - 04 - 01), 1, AssignmentStatus::Partial),
        ];
        let summary = appraisal_summary(1, march_range(), &shifts, &[]);

        assert!((summary.daily_completion_percent - 60.0).abs() < f64::EPSILON);
        assert_eq!(summary.daily_status_counts.get(&AssignmentStatus::Completed), Some(&3));
        assert_eq!(summary.daily_status_counts.get(&AssignmentStatus::Pending), None);
        assert!(summary.monthly_completion_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_monthly_assignments_match_by_overlap() {
        let assignments = vec![
            assignment(Some(1), date!(2026 - 02 - 15), date!(2026 - 03 - 01), AssignmentStatus::Completed),
            assignment(Some(1), date!(2026 - 03 - 31), date!(2026 - 04 - 30), AssignmentStatus::NotCompleted),
            assignment(Some(1), date!(2026 - 04 - 01), date!(2026 - 04 - 30), AssignmentStatus::Completed),
        ];
        let summary = appraisal_summary(1, march_range(), &[], &assignments);
        assert!((summary.monthly_completion_percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_monthly_summary_counts_names() {
        let mut morning = shift(1, date!(2026 - 03 - 10), 1, AssignmentStatus::Pending);
        morning.tasks.insert(TaskCategory::Main, 4);
        morning.tasks.insert(TaskCategory::Clinic, 9);
        let night = shift(2, date!(2026 - 03 - 03), 2, AssignmentStatus::Pending);
        let other_month = shift(3, date!(2026 - 04 - 03), 2, AssignmentStatus::Pending);

        let mut names = ReferenceNames::default();
        names.shift_types.insert(1, String::from("Morning"));
        names.shift_types.insert(2, String::from("Night"));
        names
            .task_items
            .entry(TaskCategory::Main)
            .or_default()
            .insert(4, String::from("Team Leader"));
        names
            .task_items
            .entry(TaskCategory::Clinic)
            .or_default()
            .insert(9, String::from("Wound Care"));
        names.monthly_tasks.insert(7, String::from("Inventory"));

        let assignments = vec![
            assignment(Some(7), date!(2026 - 03 - 01), date!(2026 - 03 - 31), AssignmentStatus::Pending),
            assignment(None, date!(2026 - 03 - 01), date!(2026 - 03 - 31), AssignmentStatus::Pending),
            assignment(Some(7), date!(2026 - 02 - 01), date!(2026 - 03 - 31), AssignmentStatus::Pending),
        ];

        let month = MonthPeriod::containing(date!(2026 - 03 - 01));
        let summary = staff_monthly_summary(
            1,
            month,
            &[morning, night, other_month],
            &assignments,
            &names,
        );

        assert_eq!(summary.shift_type_counts.get("Morning"), Some(&1));
        assert_eq!(summary.shift_type_counts.get("Night"), Some(&1));
        assert_eq!(summary.category_counts(TaskCategory::Main).get("Team Leader"), Some(&1));
        assert_eq!(summary.clinic_counts.get("Wound Care"), Some(&1));
        assert!(summary.sub_assignment_counts.is_empty());
        assert_eq!(summary.monthly_task_counts.get("Inventory"), Some(&1));

        let ids: Vec<i64> = summary.shift_history.iter().map(|s| s.shift_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
