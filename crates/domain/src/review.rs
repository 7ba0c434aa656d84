// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Team leader and manager review of shifts.
//!
//! ## Team leader
//!
//! A staff member is team leader on a date if they hold a shift that day
//! whose main assignments include one named like "Team Leader" (case
//! insensitive). Their first such shift decides the shift type they lead.
//! They may review every other shift of that type on that date, except their
//! own.
//!
//! ## Manager
//!
//! A manager may review any shift on a chosen date and may additionally set
//! the approval flag. Approval is never cleared by a review.
//!
//! Status and approval are stored per shift, so two shifts held by the same
//! person on one day are reviewed independently.

use crate::error::DomainError;
use crate::status::AssignmentStatus;
use crate::types::Shift;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use time::Date;

const TEAM_LEADER_MARKER: &str = "team leader";

/// Returns true if a main assignment with this name marks a team leader.
#[must_use]
pub fn is_team_leader_assignment(name: &str) -> bool {
    name.to_lowercase().contains(TEAM_LEADER_MARKER)
}

/// The shifts a team leader may review on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLeaderScope {
    /// The leader's own shift that grants the role.
    pub leader_shift_id: i64,
    pub shift_type_id: i64,
    pub date: Date,
    /// Shift ids open for review, ascending.
    pub eligible_shift_ids: Vec<i64>,
}

/// Works out what `staff_id` may review on `today`.
///
/// `shifts_today` must hold every shift on `today`. `leader_assignment_ids`
/// holds the main assignment ids that mark a team leader.
///
/// Returns `None` when the staff member is not team leader today.
#[must_use]
pub fn team_leader_scope(
    staff_id: i64,
    today: Date,
    shifts_today: &[Shift],
    leader_assignment_ids: &BTreeSet<i64>,
) -> Option<TeamLeaderScope> {
    let leader_shift = shifts_today
        .iter()
        .filter(|s| s.staff_id == staff_id && s.date == today)
        .filter(|s| {
            s.tasks
                .assignments
                .iter()
                .any(|id| leader_assignment_ids.contains(id))
        })
        .min_by_key(|s| s.shift_id)?;

    let mut eligible_shift_ids: Vec<i64> = shifts_today
        .iter()
        .filter(|s| {
            s.date == today
                && s.shift_type_id == leader_shift.shift_type_id
                && s.staff_id != staff_id
        })
        .map(|s| s.shift_id)
        .collect();
    eligible_shift_ids.sort_unstable();

    Some(TeamLeaderScope {
        leader_shift_id: leader_shift.shift_id,
        shift_type_id: leader_shift.shift_type_id,
        date: today,
        eligible_shift_ids,
    })
}

/// One posted review line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewUpdate {
    pub shift_id: i64,
    pub status: AssignmentStatus,
    pub notes: String,
    /// Only honoured for managers.
    pub approve: bool,
}

fn parse_shift_id(key: &str, raw: &str) -> Result<i64, DomainError> {
    raw.parse().map_err(|_| DomainError::MalformedPayloadKey {
        key: key.to_string(),
        reason: String::from("shift id is not an integer"),
    })
}

/// Parses posted `status_{id}`, `notes_{id}` and `approve_{id}` pairs.
///
/// A line is produced for each `status_` key; notes default to empty and
/// approval to false. Notes or approval without a status are ignored.
///
/// # Errors
///
/// Returns an error if a key is not one of the three fields, a shift id is
/// not an integer, or a status value is not recognised.
pub fn parse_review_postings<K, V>(entries: &[(K, V)]) -> Result<Vec<ReviewUpdate>, DomainError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut statuses: BTreeMap<i64, AssignmentStatus> = BTreeMap::new();
    let mut notes: BTreeMap<i64, String> = BTreeMap::new();
    let mut approvals: BTreeSet<i64> = BTreeSet::new();

    for (key, value) in entries {
        let key = key.as_ref();
        let value = value.as_ref();
        let Some((field, raw_id)) = key.split_once('_') else {
            return Err(DomainError::MalformedPayloadKey {
                key: key.to_string(),
                reason: String::from("expected '{field}_{shift_id}'"),
            });
        };
        let shift_id = parse_shift_id(key, raw_id)?;
        match field {
            "status" => {
                statuses.insert(shift_id, value.parse()?);
            }
            "notes" => {
                notes.insert(shift_id, value.to_string());
            }
            "approve" => {
                approvals.insert(shift_id);
            }
            _ => {
                return Err(DomainError::MalformedPayloadKey {
                    key: key.to_string(),
                    reason: String::from("unknown field"),
                });
            }
        }
    }

    Ok(statuses
        .into_iter()
        .map(|(shift_id, status)| ReviewUpdate {
            shift_id,
            status,
            notes: notes.remove(&shift_id).unwrap_or_default(),
            approve: approvals.contains(&shift_id),
        })
        .collect())
}

/// Rejects any update that targets a shift outside `eligible`.
///
/// # Errors
///
/// Returns `DomainError::ShiftNotEligibleForReview` for the first update
/// whose shift is not eligible.
pub fn ensure_eligible(eligible: &[i64], updates: &[ReviewUpdate]) -> Result<(), DomainError> {
    for update in updates {
        if !eligible.contains(&update.shift_id) {
            return Err(DomainError::ShiftNotEligibleForReview {
                shift_id: update.shift_id,
            });
        }
    }
    Ok(())
}

/// Who is submitting a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reviewer {
    TeamLeader,
    Manager,
}

/// The fields of a shift after a review is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub shift_id: i64,
    pub status: AssignmentStatus,
    pub team_leader_notes: String,
    pub is_approved_by_manager: bool,
}

/// Applies one review line to a shift.
///
/// # Errors
///
/// Returns `DomainError::InvalidStatusTransition` if the status change is not
/// allowed.
pub fn apply_review(
    shift: &Shift,
    update: &ReviewUpdate,
    reviewer: Reviewer,
) -> Result<ReviewOutcome, DomainError> {
    shift.status.validate_transition(update.status)?;

    let approve = reviewer == Reviewer::Manager && update.approve;
    Ok(ReviewOutcome {
        shift_id: shift.shift_id,
        status: update.status,
        team_leader_notes: update.notes.clone(),
        is_approved_by_manager: shift.is_approved_by_manager || approve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskCategory, TaskSet};
    use time::macros::date;

    const LEADER_TASK: i64 = 1;

    fn shift(shift_id: i64, staff_id: i64, shift_type_id: i64, main: &[i64]) -> Shift {
        let mut tasks = TaskSet::new();
        tasks.replace(TaskCategory::Main, main.iter().copied());
        Shift {
            shift_id,
            staff_id,
            date: date!(2026 - 03 - 02),
            shift_type_id,
            tasks,
            notes: None,
            status: AssignmentStatus::Pending,
            team_leader_notes: None,
            is_approved_by_manager: false,
        }
    }

    fn update(shift_id: i64, status: AssignmentStatus, approve: bool) -> ReviewUpdate {
        ReviewUpdate {
            shift_id,
            status,
            notes: String::from("ok"),
            approve,
        }
    }

    #[test]
    fn test_team_leader_name_match_is_case_insensitive() {
        assert!(is_team_leader_assignment("Team Leader"));
        assert!(is_team_leader_assignment("night TEAM LEADER"));
        assert!(!is_team_leader_assignment("Leader of team"));
    }

    #[test]
    fn test_scope_covers_same_shift_type_excluding_leader() {
        let shifts = vec![
            shift(10, 1, 2, &[LEADER_TASK]),
            shift(11, 2, 2, &[]),
            shift(12, 3, 2, &[5]),
            shift(13, 4, 3, &[]),
            shift(14, 1, 3, &[]),
        ];
        let leaders = BTreeSet::from([LEADER_TASK]);
        let scope = team_leader_scope(1, date!(2026 - 03 - 02), &shifts, &leaders);

        let Some(scope) = scope else {
            panic!("staff 1 should lead today");
        };
        assert_eq!(scope.leader_shift_id, 10);
        assert_eq!(scope.shift_type_id, 2);
        assert_eq!(scope.eligible_shift_ids, vec![11, 12]);
    }

    #[test]
    fn test_no_leader_shift_means_no_scope() {
        let shifts = vec![shift(10, 1, 2, &[5]), shift(11, 2, 2, &[])];
        let leaders = BTreeSet::from([LEADER_TASK]);
        assert_eq!(
            team_leader_scope(1, date!(2026 - 03 - 02), &shifts, &leaders),
            None
        );
    }

    #[test]
    fn test_parse_review_postings() {
        let entries = vec![
            (String::from("status_11"), String::from("COMPLETED")),
            (String::from("notes_11"), String::from("all done")),
            (String::from("status_12"), String::from("PARTIAL")),
            (String::from("approve_12"), String::from("on")),
            (String::from("notes_99"), String::from("orphan")),
        ];
        let updates = match parse_review_postings(&entries) {
            Ok(u) => u,
            Err(e) => panic!("payload rejected: {e}"),
        };
        assert_eq!(
            updates,
            vec![
                ReviewUpdate {
                    shift_id: 11,
                    status: AssignmentStatus::Completed,
                    notes: String::from("all done"),
                    approve: false,
                },
                ReviewUpdate {
                    shift_id: 12,
                    status: AssignmentStatus::Partial,
                    notes: String::new(),
                    approve: true,
                },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        let entries = vec![(String::from("status_11"), String::from("DONE"))];
        assert_eq!(
            parse_review_postings(&entries),
            Err(DomainError::InvalidStatus(String::from("DONE")))
        );
    }

    #[test]
    fn test_ineligible_shift_rejected() {
        let updates = vec![
            update(11, AssignmentStatus::Completed, false),
            update(10, AssignmentStatus::Completed, false),
        ];
        assert_eq!(
            ensure_eligible(&[11, 12], &updates),
            Err(DomainError::ShiftNotEligibleForReview { shift_id: 10 })
        );
    }

    #[test]
    fn test_team_leader_cannot_approve() {
        let target = shift(11, 2, 2, &[]);
        let outcome = apply_review(
            &target,
            &update(11, AssignmentStatus::Completed, true),
            Reviewer::TeamLeader,
        );
        assert_eq!(outcome.map(|o| o.is_approved_by_manager), Ok(false));
    }

    #[test]
    fn test_manager_approval_is_sticky() {
        let mut target = shift(11, 2, 2, &[]);
        target.status = AssignmentStatus::Completed;
        target.is_approved_by_manager = true;

        let outcome = apply_review(
            &target,
            &update(11, AssignmentStatus::Partial, false),
            Reviewer::Manager,
        );
        match outcome {
            Ok(o) => {
                assert_eq!(o.status, AssignmentStatus::Partial);
                assert!(o.is_approved_by_manager);
            }
            Err(e) => panic!("correction rejected: {e}"),
        }
    }

    #[test]
    fn test_review_cannot_return_to_pending() {
        let mut target = shift(11, 2, 2, &[]);
        target.status = AssignmentStatus::Completed;
        assert!(matches!(
            apply_review(
                &target,
                &update(11, AssignmentStatus::Pending, false),
                Reviewer::Manager
            ),
            Err(DomainError::InvalidStatusTransition { .. })
        ));
    }
}
