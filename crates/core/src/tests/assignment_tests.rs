// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::entries;
use crate::{Command, CoreError, ShiftScope, State, Transition, TransitionResult, apply};
use std::collections::BTreeSet;
use time::macros::date;
use ward_roster_domain::{
    AssignmentStatus, DateRange, DomainError, MonthPeriod, Rotation, RotationDay,
};

#[test]
fn test_assign_day_replaces_whole_date() {
    let command = Command::AssignDay {
        date: date!(2026 - 03 - 02),
        entries: entries(&[("main_2_5", "17"), ("sub_2_9", "17")]),
    };

    let result: TransitionResult = apply(&State::new(), command).unwrap();

    assert_eq!(result.action, "AssignDay");
    let Transition::ReplaceShifts { scope, drafts } = result.transition else {
        panic!("expected a shift replacement");
    };
    assert_eq!(scope, ShiftScope::Date(date!(2026 - 03 - 02)));
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].tasks.assignments, BTreeSet::from([5]));
    assert_eq!(drafts[0].tasks.sub_assignments, BTreeSet::from([9]));
}

#[test]
fn test_assign_day_with_empty_payload_clears_date() {
    let command = Command::AssignDay {
        date: date!(2026 - 03 - 02),
        entries: Vec::new(),
    };
    let result = apply(&State::new(), command).unwrap();
    assert_eq!(
        result.transition,
        Transition::ReplaceShifts {
            scope: ShiftScope::Date(date!(2026 - 03 - 02)),
            drafts: Vec::new(),
        }
    );
}

#[test]
fn test_assign_day_rejects_malformed_key() {
    let command = Command::AssignDay {
        date: date!(2026 - 03 - 02),
        entries: entries(&[("main_x_5", "17")]),
    };
    assert!(matches!(
        apply(&State::new(), command),
        Err(CoreError::DomainViolation(
            DomainError::MalformedPayloadKey { .. }
        ))
    ));
}

#[test]
fn test_assign_rotation_scopes_to_staff_and_range() {
    let rotation = Rotation::new(
        "4 On / 2 Off",
        6,
        vec![
            RotationDay::work(1, 1),
            RotationDay::work(2, 1),
            RotationDay::work(3, 1),
            RotationDay::work(4, 1),
            RotationDay::day_off(5),
            RotationDay::day_off(6),
        ],
    );
    let range = DateRange::new(date!(2026 - 03 - 01), date!(2026 - 03 - 06)).unwrap();
    let command = Command::AssignRotation {
        rotation,
        staff_ids: vec![9, 4, 9],
        range,
    };

    let result = apply(&State::new(), command).unwrap();

    let Transition::ReplaceShifts { scope, drafts } = result.transition else {
        panic!("expected a shift replacement");
    };
    assert_eq!(
        scope,
        ShiftScope::StaffRange {
            staff_ids: vec![4, 9],
            range,
        }
    );
    assert_eq!(drafts.len(), 8);
}

#[test]
fn test_assign_rotation_rejects_empty_rotation() {
    let range = DateRange::new(date!(2026 - 03 - 01), date!(2026 - 03 - 06)).unwrap();
    let command = Command::AssignRotation {
        rotation: Rotation::new("Nothing", 3, Vec::new()),
        staff_ids: vec![1],
        range,
    };
    assert_eq!(
        apply(&State::new(), command),
        Err(CoreError::DomainViolation(DomainError::EmptyRotation {
            rotation: String::from("Nothing"),
        }))
    );
}

#[test]
fn test_assign_month_uses_active_staff_only() {
    let state = State::new().with_active_staff(vec![8]);
    let command = Command::AssignMonth {
        month: MonthPeriod::new(2026, 3).unwrap(),
        entries: entries(&[
            ("tasks_8", "3"),
            ("tasks_8", "4"),
            ("committees_8", "1"),
            ("tasks_99", "3"),
        ]),
    };

    let result = apply(&state, command).unwrap();

    let Transition::ReplaceMonthlyAssignments { range, drafts } = result.transition else {
        panic!("expected a monthly replacement");
    };
    assert_eq!(range.start(), date!(2026 - 03 - 01));
    assert_eq!(range.end(), date!(2026 - 03 - 31));
    assert_eq!(drafts.len(), 2);
    assert!(drafts.iter().all(|d| d.staff_id == 8));
    assert!(drafts.iter().all(|d| d.committee_id == Some(1)));
    assert!(drafts.iter().all(|d| d.status == AssignmentStatus::Pending));
}
