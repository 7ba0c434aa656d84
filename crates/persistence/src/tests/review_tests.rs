// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::SqlitePersistence;
use crate::error::PersistenceError;
use crate::tests::{Fixture, seed};
use time::macros::date;
use ward_roster::{Command, CoreError, State, Transition, TransitionResult, apply};
use ward_roster_domain::{AssignmentStatus, DomainError, ReviewOutcome, ShiftDraft, TaskCategory};

fn roster_with_leader(persistence: &mut SqlitePersistence, f: &Fixture) -> (i64, i64) {
    let day = date!(2026 - 03 - 02);
    let mut leader = ShiftDraft::new(f.nurse, day, f.morning);
    leader.tasks.insert(TaskCategory::Main, f.team_leader);
    persistence.create_shift(&leader).unwrap();

    let peer = persistence
        .create_shift(&ShiftDraft::new(f.second_nurse, day, f.morning))
        .unwrap();
    let night = persistence
        .create_shift(&ShiftDraft::new(f.auxiliary, day, f.night))
        .unwrap();
    (peer, night)
}

fn review_state(persistence: &mut SqlitePersistence) -> State {
    State::new()
        .with_shifts(persistence.shifts_on_date(date!(2026 - 03 - 02)).unwrap())
        .with_team_leader_assignments(persistence.team_leader_assignment_ids().unwrap())
}

#[test]
fn test_team_leader_ids_match_by_name() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let f = seed(&mut persistence);
    persistence
        .create_task_item(TaskCategory::Main, "night team leader")
        .unwrap();

    let ids = persistence.team_leader_assignment_ids().unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&f.team_leader));
    assert!(!ids.contains(&f.medication_round));
}

#[test]
fn test_checklist_records_status_and_notes() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let f = seed(&mut persistence);
    let (peer, _) = roster_with_leader(&mut persistence, &f);

    let state = review_state(&mut persistence);
    let result = apply(
        &state,
        Command::SubmitChecklist {
            reviewer_staff_id: f.nurse,
            today: date!(2026 - 03 - 02),
            entries: vec![
                (format!("status_{peer}"), String::from("PARTIAL")),
                (format!("notes_{peer}"), String::from("Obs missed at 14:00")),
            ],
        },
    )
    .unwrap();
    let persisted = persistence.persist_transition(&result).unwrap();
    assert_eq!(persisted.reviewed, 1);

    let stored = persistence.get_shift(peer).unwrap().unwrap();
    assert_eq!(stored.status, AssignmentStatus::Partial);
    assert_eq!(
        stored.team_leader_notes.as_deref(),
        Some("Obs missed at 14:00")
    );
    assert!(!stored.is_approved_by_manager);
}

#[test]
fn test_checklist_cannot_reach_other_shift_type() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let f = seed(&mut persistence);
    let (_, night) = roster_with_leader(&mut persistence, &f);

    let state = review_state(&mut persistence);
    let result = apply(
        &state,
        Command::SubmitChecklist {
            reviewer_staff_id: f.nurse,
            today: date!(2026 - 03 - 02),
            entries: vec![(format!("status_{night}"), String::from("COMPLETED"))],
        },
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::ShiftNotEligibleForReview { shift_id: night }
        ))
    );
}

#[test]
fn test_manager_approval_persists() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let f = seed(&mut persistence);
    let (peer, night) = roster_with_leader(&mut persistence, &f);

    let state = review_state(&mut persistence);
    let result = apply(
        &state,
        Command::SubmitManagerReview {
            date: date!(2026 - 03 - 02),
            entries: vec![
                (format!("status_{peer}"), String::from("COMPLETED")),
                (format!("approve_{peer}"), String::from("on")),
                (format!("status_{night}"), String::from("NOT_COMPLETED")),
            ],
        },
    )
    .unwrap();
    persistence.persist_transition(&result).unwrap();

    let approved = persistence.get_shift(peer).unwrap().unwrap();
    assert_eq!(approved.status, AssignmentStatus::Completed);
    assert!(approved.is_approved_by_manager);

    let not_done = persistence.get_shift(night).unwrap().unwrap();
    assert_eq!(not_done.status, AssignmentStatus::NotCompleted);
    assert!(!not_done.is_approved_by_manager);
}

#[test]
fn test_review_of_vanished_shift_rolls_back() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let f = seed(&mut persistence);
    let (peer, _) = roster_with_leader(&mut persistence, &f);

    let result = TransitionResult {
        transition: Transition::ReviewShifts {
            outcomes: vec![
                ReviewOutcome {
                    shift_id: peer,
                    status: AssignmentStatus::Completed,
                    team_leader_notes: String::new(),
                    is_approved_by_manager: false,
                },
                ReviewOutcome {
                    shift_id: 9_999,
                    status: AssignmentStatus::Completed,
                    team_leader_notes: String::new(),
                    is_approved_by_manager: false,
                },
            ],
        },
        action: String::from("SubmitManagerReview"),
        details: String::from("stale form"),
    };

    assert!(matches!(
        persistence.persist_transition(&result),
        Err(PersistenceError::NotFound(_))
    ));
    let untouched = persistence.get_shift(peer).unwrap().unwrap();
    assert_eq!(untouched.status, AssignmentStatus::Pending);
}
