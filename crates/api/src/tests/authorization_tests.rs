// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{TODAY, create_test_ward, form};
use crate::{
    ApiError, AppraisalRequest, AuthError, AuthenticatedStaff, AuthenticationService,
    BulkAssignRequest, CreateFirstManagerRequest, StaffRequest, appraisal, assign_day,
    bulk_assign, can_manage, check_bootstrap_status, compute_capabilities,
    create_first_manager, create_staff, daily_assign_context, list_staff, manager_review,
    staff_analytics, update_staff,
};
use ward_roster_domain::StaffRole;
use ward_roster_persistence::SqlitePersistence;

#[test]
fn test_nurse_cannot_run_manager_operations() {
    let mut ward = create_test_ward();
    let nurse = ward.alice.clone();

    let results = [
        daily_assign_context(&mut ward.persistence, &nurse, TODAY).map(|_| ()),
        assign_day(&mut ward.persistence, &nurse, TODAY, form(&[])).map(|_| ()),
        manager_review(&mut ward.persistence, &nurse, TODAY).map(|_| ()),
        bulk_assign(
            &mut ward.persistence,
            &nurse,
            BulkAssignRequest {
                rotation_id: 1,
                staff_ids: vec![nurse.staff_id],
                start_date: String::from("2026-03-01"),
                end_date: String::from("2026-03-07"),
            },
        )
        .map(|_| ()),
        create_staff(
            &mut ward.persistence,
            &nurse,
            StaffRequest {
                display_name: String::from("Dave"),
                role: String::from("NURSE"),
                is_active: true,
            },
        )
        .map(|_| ()),
    ];

    for result in results {
        assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    }
}

#[test]
fn test_inactive_manager_cannot_manage() {
    let manager = AuthenticatedStaff::new(9, String::from("Former"), StaffRole::Manager, false);
    assert!(!can_manage(&manager));
}

#[test]
fn test_authentication_rejects_unknown_and_inactive_staff() {
    let mut ward = create_test_ward();

    assert!(matches!(
        AuthenticationService::authenticate(&mut ward.persistence, 999),
        Err(AuthError::AuthenticationFailed { .. })
    ));

    let bob = ward.bob.clone();
    update_staff(
        &mut ward.persistence,
        &ward.manager,
        bob.staff_id,
        StaffRequest {
            display_name: bob.display_name.clone(),
            role: String::from("NURSE"),
            is_active: false,
        },
    )
    .unwrap();

    assert!(matches!(
        AuthenticationService::authenticate(&mut ward.persistence, bob.staff_id),
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_staff_may_view_only_their_own_analytics() {
    let mut ward = create_test_ward();
    let alice = ward.alice.clone();
    let bob_id = ward.bob.staff_id;

    let own = staff_analytics(&mut ward.persistence, &alice, alice.staff_id, 2026, 3).unwrap();
    assert_eq!(own.staff.staff_id, alice.staff_id);

    let other = staff_analytics(&mut ward.persistence, &alice, bob_id, 2026, 3);
    assert!(matches!(other, Err(ApiError::Unauthorized { .. })));

    let manager = ward.manager.clone();
    assert!(staff_analytics(&mut ward.persistence, &manager, bob_id, 2026, 3).is_ok());
}

#[test]
fn test_inactive_staff_listed_only_for_managers() {
    let mut ward = create_test_ward();
    let manager = ward.manager.clone();
    let carol = ward.carol.clone();
    update_staff(
        &mut ward.persistence,
        &manager,
        carol.staff_id,
        StaffRequest {
            display_name: carol.display_name.clone(),
            role: String::from("MAS"),
            is_active: false,
        },
    )
    .unwrap();

    let as_manager = list_staff(&mut ward.persistence, &manager, true).unwrap();
    assert_eq!(as_manager.staff.len(), 4);

    let alice = ward.alice.clone();
    let as_nurse = list_staff(&mut ward.persistence, &alice, true).unwrap();
    assert_eq!(as_nurse.staff.len(), 3);
    assert!(as_nurse.staff.iter().all(|s| s.staff_id != carol.staff_id));
}

#[test]
fn test_appraisal_is_manager_only() {
    let mut ward = create_test_ward();
    let alice = ward.alice.clone();
    let request = AppraisalRequest {
        staff_id: alice.staff_id,
        start_date: String::from("2026-03-01"),
        end_date: String::from("2026-03-31"),
    };
    assert!(matches!(
        appraisal(&mut ward.persistence, &alice, &request),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_capabilities_reflect_role() {
    let mut ward = create_test_ward();
    let manager = ward.manager.clone();
    let alice = ward.alice.clone();

    let caps = compute_capabilities(&mut ward.persistence, &manager, TODAY).unwrap();
    assert!(caps.can_manage);
    assert_eq!(caps.role, "MANAGER");

    let caps = compute_capabilities(&mut ward.persistence, &alice, TODAY).unwrap();
    assert!(!caps.can_manage);
    assert!(!caps.is_team_leader_today);
}

#[test]
fn test_first_manager_only_while_registry_is_empty() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(check_bootstrap_status(&mut persistence).unwrap().is_bootstrap_mode);

    let blank = create_first_manager(
        &mut persistence,
        CreateFirstManagerRequest {
            display_name: String::from("   "),
        },
    );
    assert!(blank.is_err());

    let created = create_first_manager(
        &mut persistence,
        CreateFirstManagerRequest {
            display_name: String::from(" Mona "),
        },
    )
    .unwrap();
    let principal = AuthenticationService::authenticate(&mut persistence, created.id).unwrap();
    assert_eq!(principal.display_name, "Mona");
    assert!(can_manage(&principal));
    assert!(!check_bootstrap_status(&mut persistence).unwrap().is_bootstrap_mode);

    let second = create_first_manager(
        &mut persistence,
        CreateFirstManagerRequest {
            display_name: String::from("Eve"),
        },
    );
    assert!(matches!(second, Err(ApiError::Unauthorized { .. })));
    assert_eq!(persistence.count_staff().unwrap(), 1);
}
