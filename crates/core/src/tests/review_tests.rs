// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{TEAM_LEADER_TASK, create_test_shift, entries};
use crate::{Command, CoreError, State, Transition, apply};
use std::collections::BTreeSet;
use time::macros::date;
use ward_roster_domain::{AssignmentStatus, DomainError, Shift};

fn morning_ward() -> State {
    let today = date!(2026 - 03 - 02);
    let shifts: Vec<Shift> = vec![
        create_test_shift(10, 1, today, 2, &[TEAM_LEADER_TASK]),
        create_test_shift(11, 2, today, 2, &[]),
        create_test_shift(12, 3, today, 2, &[]),
        create_test_shift(13, 4, today, 3, &[]),
    ];
    State::new()
        .with_shifts(shifts)
        .with_team_leader_assignments(BTreeSet::from([TEAM_LEADER_TASK]))
}

#[test]
fn test_team_leader_reviews_peers_on_same_shift_type() {
    let command = Command::SubmitChecklist {
        reviewer_staff_id: 1,
        today: date!(2026 - 03 - 02),
        entries: entries(&[
            ("status_11", "COMPLETED"),
            ("notes_11", "good"),
            ("status_12", "PARTIAL"),
            ("approve_12", "on"),
        ]),
    };

    let result = apply(&morning_ward(), command).unwrap();

    let Transition::ReviewShifts { outcomes } = result.transition else {
        panic!("expected review outcomes");
    };
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].status, AssignmentStatus::Completed);
    assert_eq!(outcomes[0].team_leader_notes, "good");
    assert_eq!(outcomes[1].status, AssignmentStatus::Partial);
    assert_eq!(outcomes[1].team_leader_notes, "");
    assert!(outcomes.iter().all(|o| !o.is_approved_by_manager));
}

#[test]
fn test_team_leader_cannot_review_own_or_other_shift_types() {
    for target in ["status_10", "status_13"] {
        let command = Command::SubmitChecklist {
            reviewer_staff_id: 1,
            today: date!(2026 - 03 - 02),
            entries: entries(&[(target, "COMPLETED")]),
        };
        assert!(matches!(
            apply(&morning_ward(), command),
            Err(CoreError::DomainViolation(
                DomainError::ShiftNotEligibleForReview { .. }
            ))
        ));
    }
}

#[test]
fn test_non_leader_has_nothing_to_review() {
    let command = Command::SubmitChecklist {
        reviewer_staff_id: 2,
        today: date!(2026 - 03 - 02),
        entries: entries(&[("status_12", "COMPLETED")]),
    };
    assert_eq!(
        apply(&morning_ward(), command),
        Err(CoreError::DomainViolation(
            DomainError::ShiftNotEligibleForReview { shift_id: 12 }
        ))
    );
}

#[test]
fn test_manager_review_sets_approval() {
    let command = Command::SubmitManagerReview {
        date: date!(2026 - 03 - 02),
        entries: entries(&[
            ("status_10", "COMPLETED"),
            ("approve_10", "on"),
            ("status_13", "NOT_COMPLETED"),
        ]),
    };

    let result = apply(&morning_ward(), command).unwrap();

    let Transition::ReviewShifts { outcomes } = result.transition else {
        panic!("expected review outcomes");
    };
    assert!(outcomes[0].is_approved_by_manager);
    assert!(!outcomes[1].is_approved_by_manager);
    assert_eq!(outcomes[1].status, AssignmentStatus::NotCompleted);
}

#[test]
fn test_manager_review_rejects_shift_from_another_date() {
    let command = Command::SubmitManagerReview {
        date: date!(2026 - 03 - 03),
        entries: entries(&[("status_10", "COMPLETED")]),
    };
    assert_eq!(
        apply(&morning_ward(), command),
        Err(CoreError::DomainViolation(
            DomainError::ShiftNotEligibleForReview { shift_id: 10 }
        ))
    );
}

#[test]
fn test_reviewed_shift_cannot_return_to_pending() {
    let mut state = morning_ward();
    state.shifts[1].status = AssignmentStatus::Completed;
    let command = Command::SubmitManagerReview {
        date: date!(2026 - 03 - 02),
        entries: entries(&[("status_11", "PENDING")]),
    };
    assert!(matches!(
        apply(&state, command),
        Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition { .. }
        ))
    ));
}
