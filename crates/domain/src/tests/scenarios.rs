// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end planning scenarios over the pure domain functions.

use crate::{
    AssignmentStatus, DateRange, MonthPeriod, Rotation, RotationDay, RotationSlot, Shift, TaskSet,
    appraisal_summary, completion_percent, expand_rotation, parse_monthly_postings,
    plan_daily_assignment, plan_monthly_bulk,
};
use std::collections::BTreeSet;
use time::Duration;
use time::macros::date;

#[test]
fn test_four_on_two_off_yields_four_shifts() {
    let rotation = Rotation::new(
        "4-on/2-off",
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

    let drafts = expand_rotation(&rotation, &[42], range).unwrap();

    assert_eq!(drafts.len(), 4);
    assert!(drafts.iter().all(|d| d.date <= date!(2026 - 03 - 04)));
}

#[test]
fn test_rotation_expansion_follows_offset_mod_length() {
    let start = date!(2026 - 01 - 01);
    for length in 1..=7u32 {
        let days: Vec<RotationDay> = (1..=length)
            .map(|n| {
                if n % 3 == 0 {
                    RotationDay::day_off(n)
                } else {
                    RotationDay::work(n, i64::from(n))
                }
            })
            .collect();
        let rotation = Rotation::new("Cycle", length, days);
        let range = DateRange::new(start, start + Duration::days(29)).unwrap();
        let drafts = expand_rotation(&rotation, &[1], range).unwrap();

        for (offset, date) in range.days().enumerate() {
            let expected = rotation.days[offset % rotation.days.len()].slot;
            let found: Vec<_> = drafts.iter().filter(|d| d.date == date).collect();
            match expected {
                RotationSlot::DayOff => assert!(found.is_empty()),
                RotationSlot::Work(shift_type_id) => {
                    assert_eq!(found.len(), 1);
                    assert_eq!(found[0].shift_type_id, shift_type_id);
                }
            }
        }
    }
}

#[test]
fn test_daily_post_groups_tasks_into_one_shift() {
    let entries = vec![
        (String::from("main_2_5"), String::from("17")),
        (String::from("sub_2_9"), String::from("17")),
    ];
    let drafts = plan_daily_assignment(date!(2026 - 03 - 02), &entries).unwrap();

    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].staff_id, 17);
    assert_eq!(drafts[0].shift_type_id, 2);
    assert_eq!(drafts[0].tasks.assignments, BTreeSet::from([5]));
    assert_eq!(drafts[0].tasks.sub_assignments, BTreeSet::from([9]));
}

#[test]
fn test_empty_daily_post_plans_an_empty_day() {
    let entries: Vec<(String, String)> = Vec::new();
    assert!(
        plan_daily_assignment(date!(2026 - 03 - 02), &entries)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_monthly_bulk_two_tasks_one_committee() {
    let entries = parse_monthly_postings(&[
        ("tasks_8", "3"),
        ("tasks_8", "4"),
        ("committees_8", "1"),
    ])
    .unwrap();
    let month = MonthPeriod::new(2026, 3).unwrap();

    let drafts = plan_monthly_bulk(month, &[8], &entries).unwrap();

    assert_eq!(drafts.len(), 2);
    let tasks: Vec<Option<i64>> = drafts.iter().map(|d| d.task_id).collect();
    assert_eq!(tasks, vec![Some(3), Some(4)]);
    assert!(drafts.iter().all(|d| d.committee_id == Some(1)));
    assert!(drafts.iter().all(|d| d.status == AssignmentStatus::Pending));
}

#[test]
fn test_appraisal_sixty_percent() {
    let statuses = [
        AssignmentStatus::Completed,
        AssignmentStatus::Completed,
        AssignmentStatus::Completed,
        AssignmentStatus::Partial,
        AssignmentStatus::NotCompleted,
    ];
    let shifts: Vec<Shift> = statuses
        .iter()
        .zip(0i64..)
        .map(|(status, i)| Shift {
            shift_id: i,
            staff_id: 3,
            date: date!(2026 - 03 - 01) + Duration::days(i),
            shift_type_id: 1,
            tasks: TaskSet::new(),
            notes: None,
            status: *status,
            team_leader_notes: None,
            is_approved_by_manager: false,
        })
        .collect();
    let range = DateRange::new(date!(2026 - 03 - 01), date!(2026 - 03 - 31)).unwrap();

    let summary = appraisal_summary(3, range, &shifts, &[]);

    assert!((summary.daily_completion_percent - 60.0).abs() < f64::EPSILON);
}

#[test]
fn test_completion_percent_matches_definition() {
    let cases: [(usize, usize, f64); 6] = [
        (0, 4, 0.0),
        (1, 4, 25.0),
        (1, 6, 16.7),
        (5, 6, 83.3),
        (7, 8, 87.5),
        (9, 9, 100.0),
    ];
    for (completed, total, expected) in cases {
        assert!((completion_percent(completed, total) - expected).abs() < 1e-9);
    }
    assert!(completion_percent(0, 0).abs() < f64::EPSILON);
}
