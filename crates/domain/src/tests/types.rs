// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, RotationDay, RotationSlot, StaffRole, TaskCategory, TaskSet, format_time,
    parse_date, parse_time,
};
use time::macros::{date, time};

#[test]
fn test_staff_role_round_trips_persisted_form() {
    for role in [StaffRole::Nurse, StaffRole::AuxiliaryStaff, StaffRole::Manager] {
        assert_eq!(role.as_str().parse::<StaffRole>().unwrap(), role);
    }
    assert_eq!(
        "DOCTOR".parse::<StaffRole>(),
        Err(DomainError::InvalidStaffRole(String::from("DOCTOR")))
    );
}

#[test]
fn test_nursing_roles_include_managers() {
    assert!(StaffRole::Nurse.is_nursing());
    assert!(StaffRole::Manager.is_nursing());
    assert!(!StaffRole::AuxiliaryStaff.is_nursing());
}

#[test]
fn test_task_category_prefixes() {
    for category in TaskCategory::ALL {
        assert_eq!(category.as_str().parse::<TaskCategory>().unwrap(), category);
    }
    assert!("lunch".parse::<TaskCategory>().is_err());
}

#[test]
fn test_task_set_replace_discards_previous_members() {
    let mut tasks = TaskSet::new();
    assert!(tasks.is_empty());

    tasks.insert(TaskCategory::Sub, 3);
    tasks.insert(TaskCategory::Sub, 4);
    tasks.replace(TaskCategory::Sub, [9]);

    assert_eq!(tasks.get(TaskCategory::Sub).iter().copied().collect::<Vec<_>>(), vec![9]);
    assert!(tasks.get(TaskCategory::Main).is_empty());
    assert!(!tasks.is_empty());
}

#[test]
fn test_rotation_day_constructors() {
    assert!(RotationDay::day_off(5).is_day_off());
    let day = RotationDay::work(1, 4);
    assert!(!day.is_day_off());
    assert_eq!(day.slot, RotationSlot::Work(4));
}

#[test]
fn test_parse_date_and_time() {
    assert_eq!(parse_date("2026-03-02").unwrap(), date!(2026 - 03 - 02));
    assert!(matches!(
        parse_date("2026-02-30"),
        Err(DomainError::DateParseError { .. })
    ));
    assert_eq!(parse_time("07:30").unwrap(), time!(07:30));
    assert!(parse_time("25:00").is_err());
    assert_eq!(format_time(time!(19:05)), "19:05");
}
