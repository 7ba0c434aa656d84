// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{TODAY, create_test_ward, seed_shift};
use crate::{
    ApiError, CreateRotationRequest, CreateShiftTypeRequest, NamedReference, NamedRequest,
    RotationDayRequest, StaffRequest, create_named_reference, create_rotation, create_shift_type,
    create_staff, create_task_item, delete_rotation, delete_shift_type, delete_staff, get_rotation,
    get_staff, list_committees, list_rotations, list_shift_types, list_task_items,
};
use ward_roster_domain::TaskCategory;

fn shift_type_request(name: &str, start: &str, end: &str) -> CreateShiftTypeRequest {
    CreateShiftTypeRequest {
        name: name.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

#[test]
fn test_shift_types_are_ordered_by_start_time() {
    let mut ward = create_test_ward();
    let manager = ward.manager.clone();
    create_shift_type(
        &mut ward.persistence,
        &manager,
        shift_type_request("Late", "15:00", "23:00"),
    )
    .unwrap();

    let listed = list_shift_types(&mut ward.persistence, &manager).unwrap();
    let names: Vec<&str> = listed.shift_types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Morning", "Late", "Night"]);
    assert_eq!(listed.shift_types[1].start_time, "15:00");
}

#[test]
fn test_shift_type_input_errors() {
    let mut ward = create_test_ward();
    let manager = ward.manager.clone();

    let blank = create_shift_type(
        &mut ward.persistence,
        &manager,
        shift_type_request("   ", "07:00", "15:00"),
    );
    assert!(matches!(
        blank,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "name"
    ));

    let bad_time = create_shift_type(
        &mut ward.persistence,
        &manager,
        shift_type_request("Twilight", "7pm", "23:00"),
    );
    assert!(matches!(
        bad_time,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "start_time"
    ));

    let taken = create_shift_type(
        &mut ward.persistence,
        &manager,
        shift_type_request("Morning", "06:00", "14:00"),
    );
    assert!(matches!(taken, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_shift_type_in_use_cannot_be_deleted() {
    let mut ward = create_test_ward();
    let manager = ward.manager.clone();
    seed_shift(&mut ward.persistence, ward.alice.staff_id, TODAY, ward.morning, &[]);

    let in_use = delete_shift_type(&mut ward.persistence, &manager, ward.morning);
    assert!(matches!(
        in_use,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "protected_reference"
    ));

    delete_shift_type(&mut ward.persistence, &manager, ward.night).unwrap();
    let missing = delete_shift_type(&mut ward.persistence, &manager, ward.night);
    assert!(matches!(missing, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_task_items_by_category() {
    let mut ward = create_test_ward();
    let manager = ward.manager.clone();
    create_task_item(
        &mut ward.persistence,
        &manager,
        "main",
        NamedRequest {
            name: String::from("Admissions"),
        },
    )
    .unwrap();

    let main = list_task_items(&mut ward.persistence, &manager, "main").unwrap();
    assert_eq!(main.category, TaskCategory::Main);
    let names: Vec<&str> = main.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Admissions", "Medication Round", "Team Leader"]);

    let unknown = list_task_items(&mut ward.persistence, &manager, "lunch");
    assert!(matches!(
        unknown,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "category"
    ));
}

#[test]
fn test_rotation_validation_and_lifecycle() {
    let mut ward = create_test_ward();
    let manager = ward.manager.clone();

    let gap = create_rotation(
        &mut ward.persistence,
        &manager,
        CreateRotationRequest {
            name: String::from("Gappy"),
            length_in_days: 4,
            days: vec![
                RotationDayRequest {
                    day_number: 1,
                    shift_type_id: Some(ward.morning),
                },
                RotationDayRequest {
                    day_number: 3,
                    shift_type_id: None,
                },
            ],
        },
    );
    assert!(matches!(
        gap,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "day_number"
    ));

    let created = create_rotation(
        &mut ward.persistence,
        &manager,
        CreateRotationRequest {
            name: String::from("Nights"),
            length_in_days: 2,
            days: vec![
                RotationDayRequest {
                    day_number: 2,
                    shift_type_id: None,
                },
                RotationDayRequest {
                    day_number: 1,
                    shift_type_id: Some(ward.night),
                },
            ],
        },
    )
    .unwrap();

    let rotation = get_rotation(&mut ward.persistence, &manager, created.id).unwrap();
    assert_eq!(rotation.days.len(), 2);
    assert_eq!(rotation.days[0].day_number, 1);
    assert_eq!(rotation.days[0].shift_type_id, Some(ward.night));
    assert_eq!(
        list_rotations(&mut ward.persistence, &manager)
            .unwrap()
            .rotations
            .len(),
        1
    );

    delete_rotation(&mut ward.persistence, &manager, created.id).unwrap();
    assert!(matches!(
        get_rotation(&mut ward.persistence, &manager, created.id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_named_references_and_staff_registry() {
    let mut ward = create_test_ward();
    let manager = ward.manager.clone();

    create_named_reference(
        &mut ward.persistence,
        &manager,
        NamedReference::Committee,
        NamedRequest {
            name: String::from("Falls Prevention"),
        },
    )
    .unwrap();
    let committees = list_committees(&mut ward.persistence, &manager).unwrap();
    assert_eq!(committees.items.len(), 2);
    assert_eq!(committees.items[0].name, "Falls Prevention");

    let bad_role = create_staff(
        &mut ward.persistence,
        &manager,
        StaffRequest {
            display_name: String::from("Dave"),
            role: String::from("SURGEON"),
            is_active: true,
        },
    );
    assert!(matches!(
        bad_role,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "role"
    ));

    let dave = create_staff(
        &mut ward.persistence,
        &manager,
        StaffRequest {
            display_name: String::from("  Dave "),
            role: String::from("NURSE"),
            is_active: true,
        },
    )
    .unwrap();
    assert_eq!(
        get_staff(&mut ward.persistence, &manager, dave.id)
            .unwrap()
            .display_name,
        "Dave"
    );

    let shift_id = seed_shift(&mut ward.persistence, dave.id, TODAY, ward.morning, &[]);
    delete_staff(&mut ward.persistence, &manager, dave.id).unwrap();
    assert!(ward.persistence.get_shift(shift_id).unwrap().is_none());
    assert!(matches!(
        get_staff(&mut ward.persistence, &manager, dave.id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}
