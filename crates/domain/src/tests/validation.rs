// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, ShiftDraft, ShiftType, Staff, StaffRole, find_duplicate_slot, validate_name,
    validate_shift_type, validate_staff,
};
use time::macros::{date, time};

#[test]
fn test_validate_name_rejects_blank() {
    assert!(validate_name("Committee", "Infection Control").is_ok());
    assert_eq!(
        validate_name("Committee", "   "),
        Err(DomainError::InvalidName(String::from(
            "Committee name cannot be empty"
        )))
    );
}

#[test]
fn test_validate_staff() {
    let mut staff = Staff {
        staff_id: 1,
        display_name: String::from("Aisha"),
        role: StaffRole::Nurse,
        is_active: true,
    };
    assert!(validate_staff(&staff).is_ok());
    staff.display_name = String::new();
    assert!(matches!(validate_staff(&staff), Err(DomainError::InvalidName(_))));
}

#[test]
fn test_overnight_shift_type_is_valid() {
    let night = ShiftType {
        shift_type_id: 3,
        name: String::from("Night"),
        start_time: time!(19:00),
        end_time: time!(07:00),
    };
    assert!(validate_shift_type(&night).is_ok());
}

#[test]
fn test_find_duplicate_slot() {
    let drafts = vec![
        ShiftDraft::new(1, date!(2026 - 03 - 02), 1),
        ShiftDraft::new(1, date!(2026 - 03 - 02), 2),
        ShiftDraft::new(2, date!(2026 - 03 - 02), 1),
    ];
    assert!(find_duplicate_slot(&drafts).is_none());

    let mut with_duplicate = drafts;
    with_duplicate.push(ShiftDraft::new(1, date!(2026 - 03 - 02), 2));
    assert_eq!(
        find_duplicate_slot(&with_duplicate).map(ShiftDraft::slot),
        Some((1, date!(2026 - 03 - 02), 2))
    );
}
