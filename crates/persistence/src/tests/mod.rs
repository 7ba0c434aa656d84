// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod review_tests;

use crate::SqlitePersistence;
use time::macros::time;
use ward_roster_domain::{StaffRole, TaskCategory};

/// Ids of the rows created by `seed`.
pub struct Fixture {
    pub nurse: i64,
    pub second_nurse: i64,
    pub auxiliary: i64,
    pub manager: i64,
    pub morning: i64,
    pub night: i64,
    pub team_leader: i64,
    pub medication_round: i64,
    pub wound_care: i64,
    pub diabetes_clinic: i64,
    pub fire_warden: i64,
}

/// Creates a small ward: three staff plus a manager, two shift types and one
/// item in each task category, with a team leader main assignment.
pub fn seed(persistence: &mut SqlitePersistence) -> Fixture {
    let nurse = persistence
        .create_staff("Alice Brown", StaffRole::Nurse, true)
        .unwrap();
    let second_nurse = persistence
        .create_staff("Bea Carter", StaffRole::Nurse, true)
        .unwrap();
    let auxiliary = persistence
        .create_staff("Cal Dunn", StaffRole::AuxiliaryStaff, true)
        .unwrap();
    let manager = persistence
        .create_staff("Dee Evans", StaffRole::Manager, true)
        .unwrap();

    let morning = persistence
        .create_shift_type("Morning", time!(07:00), time!(15:00))
        .unwrap();
    let night = persistence
        .create_shift_type("Night", time!(23:00), time!(07:00))
        .unwrap();

    let team_leader = persistence
        .create_task_item(TaskCategory::Main, "Team Leader")
        .unwrap();
    let medication_round = persistence
        .create_task_item(TaskCategory::Main, "Medication Round")
        .unwrap();
    let wound_care = persistence
        .create_task_item(TaskCategory::Sub, "Wound Care")
        .unwrap();
    let diabetes_clinic = persistence
        .create_task_item(TaskCategory::Clinic, "Diabetes Clinic")
        .unwrap();
    let fire_warden = persistence
        .create_task_item(TaskCategory::Emergency, "Fire Warden")
        .unwrap();

    Fixture {
        nurse,
        second_nurse,
        auxiliary,
        manager,
        morning,
        night,
        team_leader,
        medication_round,
        wound_care,
        diabetes_clinic,
        fire_warden,
    }
}

/// Builds a `"{category}_{shift_type_id}_{task_id}" -> staff_id` pair.
pub fn daily_entry(
    category: TaskCategory,
    shift_type_id: i64,
    task_id: i64,
    staff_id: i64,
) -> (String, String) {
    (
        format!("{category}_{shift_type_id}_{task_id}"),
        staff_id.to_string(),
    )
}
