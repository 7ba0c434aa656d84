// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use time::Date;
use time::macros::{date, time};
use ward_roster_domain::{ShiftDraft, StaffRole, TaskCategory};
use ward_roster_persistence::SqlitePersistence;

use crate::{AuthenticatedStaff, AuthenticationService, FormEntriesRequest};

pub const TODAY: Date = date!(2026 - 03 - 02);

/// A seeded ward with one manager, two nurses and one auxiliary.
pub struct Ward {
    pub persistence: SqlitePersistence,
    pub manager: AuthenticatedStaff,
    pub alice: AuthenticatedStaff,
    pub bob: AuthenticatedStaff,
    pub carol: AuthenticatedStaff,
    pub morning: i64,
    pub night: i64,
    pub team_leader: i64,
    pub medication: i64,
    pub wound_care: i64,
    pub diabetes_clinic: i64,
    pub fire_warden: i64,
    pub audit_task: i64,
    pub infection_committee: i64,
    pub blue_group: i64,
}

fn principal(persistence: &mut SqlitePersistence, name: &str, role: StaffRole) -> AuthenticatedStaff {
    let staff_id = persistence.create_staff(name, role, true).unwrap();
    AuthenticationService::authenticate(persistence, staff_id).unwrap()
}

pub fn create_test_ward() -> Ward {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let manager = principal(&mut persistence, "Mona", StaffRole::Manager);
    let alice = principal(&mut persistence, "Alice", StaffRole::Nurse);
    let bob = principal(&mut persistence, "Bob", StaffRole::Nurse);
    let carol = principal(&mut persistence, "Carol", StaffRole::AuxiliaryStaff);

    let morning = persistence
        .create_shift_type("Morning", time!(07:00), time!(15:00))
        .unwrap();
    let night = persistence
        .create_shift_type("Night", time!(23:00), time!(07:00))
        .unwrap();

    let team_leader = persistence
        .create_task_item(TaskCategory::Main, "Team Leader")
        .unwrap();
    let medication = persistence
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

    let audit_task = persistence.create_monthly_task("Hand Hygiene Audit").unwrap();
    let infection_committee = persistence.create_committee("Infection Control").unwrap();
    let blue_group = persistence.create_assignment_group("Blue").unwrap();

    Ward {
        persistence,
        manager,
        alice,
        bob,
        carol,
        morning,
        night,
        team_leader,
        medication,
        wound_care,
        diabetes_clinic,
        fire_warden,
        audit_task,
        infection_committee,
        blue_group,
    }
}

pub fn form(pairs: &[(&str, &str)]) -> FormEntriesRequest {
    FormEntriesRequest::from_pairs(pairs)
}

/// Inserts a shift directly, bypassing the API.
pub fn seed_shift(
    persistence: &mut SqlitePersistence,
    staff_id: i64,
    date: Date,
    shift_type_id: i64,
    main: &[i64],
) -> i64 {
    let mut draft = ShiftDraft::new(staff_id, date, shift_type_id);
    draft.tasks.replace(TaskCategory::Main, main.iter().copied());
    persistence.create_shift(&draft).unwrap()
}
