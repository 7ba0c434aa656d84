// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly bulk assignment planning.
//!
//! The monthly form posts, per staff member:
//! - `tasks_{staff_id}`: zero or more monthly task ids (repeated key)
//! - `committees_{staff_id}`: zero or more committee ids (repeated key)
//! - `group_{staff_id}`: an optional assignment group id
//!
//! Planning produces the full replacement set for one calendar month. Staff
//! with neither tasks nor committees get nothing. Staff with committees but no
//! tasks get one task-less record. Otherwise one record is created per task.
//! Every record carries the first posted committee and the group.

use crate::error::DomainError;
use crate::period::{DateRange, MonthPeriod};
use crate::status::AssignmentStatus;
use crate::types::{MonthlyAssignment, MonthlyAssignmentDraft};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What one staff member was given for a month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBulkEntry {
    pub task_ids: Vec<i64>,
    pub committee_ids: Vec<i64>,
    pub group_id: Option<i64>,
}

impl MonthlyBulkEntry {
    /// Returns true if the entry would produce no records.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.task_ids.is_empty() && self.committee_ids.is_empty()
    }
}

fn parse_id(key: &str, value: &str) -> Result<i64, DomainError> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::MalformedPayloadValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Parses the posted key/value pairs of the monthly bulk form into entries
/// keyed by staff id.
///
/// Repeated keys accumulate. Blank values are ignored.
///
/// # Errors
///
/// Returns `DomainError::MalformedPayloadKey` for a key that is not one of
/// the three known prefixes followed by an integer staff id, and
/// `DomainError::MalformedPayloadValue` for a non-integer id.
pub fn parse_monthly_postings<K, V>(
    entries: &[(K, V)],
) -> Result<BTreeMap<i64, MonthlyBulkEntry>, DomainError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut parsed: BTreeMap<i64, MonthlyBulkEntry> = BTreeMap::new();

    for (key, value) in entries {
        let key = key.as_ref();
        let value = value.as_ref();

        let Some((prefix, staff)) = key.split_once('_') else {
            return Err(DomainError::MalformedPayloadKey {
                key: key.to_string(),
                reason: String::from("expected '{field}_{staff_id}'"),
            });
        };
        let staff_id: i64 = staff.parse().map_err(|_| DomainError::MalformedPayloadKey {
            key: key.to_string(),
            reason: String::from("staff id is not an integer"),
        })?;

        let entry = parsed.entry(staff_id).or_default();
        if value.trim().is_empty() {
            continue;
        }
        match prefix {
            "tasks" => entry.task_ids.push(parse_id(key, value)?),
            "committees" => entry.committee_ids.push(parse_id(key, value)?),
            "group" => entry.group_id = Some(parse_id(key, value)?),
            _ => {
                return Err(DomainError::MalformedPayloadKey {
                    key: key.to_string(),
                    reason: String::from("unknown field"),
                });
            }
        }
    }

    Ok(parsed)
}

/// Plans the replacement monthly assignments for `month`.
///
/// Only staff listed in `active_staff` are considered; entries for anyone
/// else are ignored. Records are ordered by staff, then by posted task order.
///
/// # Errors
///
/// Returns `DomainError::InvalidMonth` if the month is not a real calendar
/// month.
pub fn plan_monthly_bulk(
    month: MonthPeriod,
    active_staff: &[i64],
    entries: &BTreeMap<i64, MonthlyBulkEntry>,
) -> Result<Vec<MonthlyAssignmentDraft>, DomainError> {
    let range = month.range()?;
    let mut drafts: Vec<MonthlyAssignmentDraft> = Vec::new();

    let mut staff: Vec<i64> = active_staff.to_vec();
    staff.sort_unstable();
    staff.dedup();

    for staff_id in staff {
        let Some(entry) = entries.get(&staff_id) else {
            continue;
        };
        if entry.is_skipped() {
            continue;
        }

        let committee_id = entry.committee_ids.first().copied();
        let draft_for = |task_id: Option<i64>| MonthlyAssignmentDraft {
            staff_id,
            task_id,
            start_date: range.start(),
            end_date: range.end(),
            group_id: entry.group_id,
            committee_id,
            status: AssignmentStatus::Pending,
            notes: String::new(),
        };

        if entry.task_ids.is_empty() {
            drafts.push(draft_for(None));
        } else {
            drafts.extend(entry.task_ids.iter().map(|t| draft_for(Some(*t))));
        }
    }

    Ok(drafts)
}

/// Folds the stored assignments of one month back into per-staff entries,
/// the shape the bulk form is pre-filled from.
#[must_use]
pub fn fold_month_assignments(assignments: &[MonthlyAssignment]) -> BTreeMap<i64, MonthlyBulkEntry> {
    let mut folded: BTreeMap<i64, MonthlyBulkEntry> = BTreeMap::new();
    for assignment in assignments {
        let entry = folded.entry(assignment.staff_id).or_default();
        if let Some(task_id) = assignment.task_id
            && !entry.task_ids.contains(&task_id)
        {
            entry.task_ids.push(task_id);
        }
        if let Some(committee_id) = assignment.committee_id
            && !entry.committee_ids.contains(&committee_id)
        {
            entry.committee_ids.push(committee_id);
        }
        if entry.group_id.is_none() {
            entry.group_id = assignment.group_id;
        }
    }
    folded
}

/// Validates a single monthly assignment before it is created or updated.
///
/// A record with neither task nor committee is accepted.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` if the end date is before the
/// start date.
pub fn validate_monthly_assignment(draft: &MonthlyAssignmentDraft) -> Result<(), DomainError> {
    DateRange::new(draft.start_date, draft.end_date).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn march() -> MonthPeriod {
        match MonthPeriod::new(2026, 3) {
            Ok(m) => m,
            Err(e) => panic!("valid month rejected: {e}"),
        }
    }

    fn postings(pairs: &[(&str, &str)]) -> BTreeMap<i64, MonthlyBulkEntry> {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        match parse_monthly_postings(&owned) {
            Ok(p) => p,
            Err(e) => panic!("payload rejected: {e}"),
        }
    }

    #[test]
    fn test_one_record_per_task_with_first_committee() {
        let entries = postings(&[
            ("tasks_8", "3"),
            ("tasks_8", "4"),
            ("committees_8", "1"),
            ("committees_8", "2"),
        ]);
        let drafts = match plan_monthly_bulk(march(), &[8], &entries) {
            Ok(d) => d,
            Err(e) => panic!("planning failed: {e}"),
        };

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].task_id, Some(3));
        assert_eq!(drafts[1].task_id, Some(4));
        for draft in &drafts {
            assert_eq!(draft.staff_id, 8);
            assert_eq!(draft.committee_id, Some(1));
            assert_eq!(draft.status, AssignmentStatus::Pending);
            assert_eq!(draft.start_date, date!(2026 - 03 - 01));
            assert_eq!(draft.end_date, date!(2026 - 03 - 31));
        }
    }

    #[test]
    fn test_committee_only_creates_taskless_record() {
        let entries = postings(&[("committees_5", "2"), ("group_5", "7")]);
        let drafts = match plan_monthly_bulk(march(), &[5], &entries) {
            Ok(d) => d,
            Err(e) => panic!("planning failed: {e}"),
        };
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].task_id, None);
        assert_eq!(drafts[0].committee_id, Some(2));
        assert_eq!(drafts[0].group_id, Some(7));
    }

    #[test]
    fn test_group_only_staff_is_skipped() {
        let entries = postings(&[("group_5", "7"), ("group_6", "")]);
        let drafts = match plan_monthly_bulk(march(), &[5, 6], &entries) {
            Ok(d) => d,
            Err(e) => panic!("planning failed: {e}"),
        };
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_inactive_staff_entries_ignored() {
        let entries = postings(&[("tasks_9", "1")]);
        let drafts = match plan_monthly_bulk(march(), &[8], &entries) {
            Ok(d) => d,
            Err(e) => panic!("planning failed: {e}"),
        };
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let owned = vec![(String::from("leave_8"), String::from("1"))];
        assert!(matches!(
            parse_monthly_postings(&owned),
            Err(DomainError::MalformedPayloadKey { .. })
        ));
    }

    #[test]
    fn test_fold_round_trips_planned_shape() {
        let stored = vec![
            MonthlyAssignment {
                monthly_assignment_id: 1,
                staff_id: 8,
                task_id: Some(3),
                start_date: date!(2026 - 03 - 01),
                end_date: date!(2026 - 03 - 31),
                group_id: Some(2),
                committee_id: Some(1),
                status: AssignmentStatus::Pending,
                notes: String::new(),
            },
            MonthlyAssignment {
                monthly_assignment_id: 2,
                staff_id: 8,
                task_id: Some(4),
                start_date: date!(2026 - 03 - 01),
                end_date: date!(2026 - 03 - 31),
                group_id: Some(2),
                committee_id: Some(1),
                status: AssignmentStatus::Completed,
                notes: String::new(),
            },
        ];
        let folded = fold_month_assignments(&stored);
        assert_eq!(
            folded.get(&8),
            Some(&MonthlyBulkEntry {
                task_ids: vec![3, 4],
                committee_ids: vec![1],
                group_id: Some(2),
            })
        );
    }

    #[test]
    fn test_single_record_range_validated() {
        let draft = MonthlyAssignmentDraft {
            staff_id: 1,
            task_id: None,
            start_date: date!(2026 - 03 - 10),
            end_date: date!(2026 - 03 - 01),
            group_id: None,
            committee_id: None,
            status: AssignmentStatus::Pending,
            notes: String::new(),
        };
        assert!(matches!(
            validate_monthly_assignment(&draft),
            Err(DomainError::InvalidDateRange { .. })
        ));
    }
}
