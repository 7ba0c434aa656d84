// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rotation pattern expansion.
//!
//! A rotation is a cyclic list of days, each either a day off or bound to a
//! shift type. Expanding a rotation over a date range walks the range one day
//! at a time and picks the rotation day at `offset mod cycle`, where the cycle
//! is the list of defined days ordered by day number.
//!
//! ## Invariants
//!
//! - Expansion is pure; nothing is written here
//! - At most one draft is produced per `(staff, date)`
//! - Drafts carry empty task sets and no notes
//! - An empty rotation is rejected before anything is produced

use crate::error::DomainError;
use crate::period::DateRange;
use crate::types::{Rotation, RotationDay, RotationSlot, ShiftDraft};
use std::collections::BTreeSet;

/// Validates a rotation definition before it is stored.
///
/// Day numbers must be unique, start at 1 and have no gaps, and the declared
/// length must cover every defined day.
///
/// # Errors
///
/// Returns an error if:
/// - The name is blank
/// - The length is zero or shorter than the number of defined days
/// - A day number is zero, repeated, beyond the length, or leaves a gap
pub fn validate_rotation(rotation: &Rotation) -> Result<(), DomainError> {
    if rotation.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Rotation name cannot be empty",
        )));
    }

    if rotation.length_in_days == 0 || rotation.days.len() > rotation.length_in_days as usize {
        return Err(DomainError::InvalidRotationLength {
            length_in_days: rotation.length_in_days,
            defined_days: rotation.days.len(),
        });
    }

    let mut seen: BTreeSet<u32> = BTreeSet::new();
    for day in &rotation.days {
        if day.day_number == 0 || day.day_number > rotation.length_in_days {
            return Err(DomainError::InvalidRotationDay {
                day_number: day.day_number,
            });
        }
        if !seen.insert(day.day_number) {
            return Err(DomainError::InvalidRotationDay {
                day_number: day.day_number,
            });
        }
    }

    // Dense: 1..=n with n = number of defined days.
    for (expected, actual) in (1u32..).zip(seen.iter()) {
        if expected != *actual {
            return Err(DomainError::InvalidRotationDay {
                day_number: expected,
            });
        }
    }

    Ok(())
}

/// Returns the rotation day applied on the given zero-based day offset.
///
/// Returns `None` only when the rotation has no days.
#[must_use]
pub fn rotation_day_at(days: &[RotationDay], offset: usize) -> Option<&RotationDay> {
    if days.is_empty() {
        return None;
    }
    days.get(offset % days.len())
}

/// Expands a rotation over an inclusive date range for every listed staff
/// member.
///
/// Each staff member starts at the first rotation day on `range.start()`.
/// Repeated staff ids are expanded once.
///
/// # Errors
///
/// Returns `DomainError::EmptyRotation` if the rotation has no days.
pub fn expand_rotation(
    rotation: &Rotation,
    staff_ids: &[i64],
    range: DateRange,
) -> Result<Vec<ShiftDraft>, DomainError> {
    if rotation.days.is_empty() {
        return Err(DomainError::EmptyRotation {
            rotation: rotation.name.clone(),
        });
    }

    let mut ordered: Vec<RotationDay> = rotation.days.clone();
    ordered.sort_by_key(|d| d.day_number);

    let mut seen: BTreeSet<i64> = BTreeSet::new();
    let mut drafts: Vec<ShiftDraft> = Vec::new();

    for staff_id in staff_ids {
        if !seen.insert(*staff_id) {
            continue;
        }
        for (offset, date) in range.days().enumerate() {
            let Some(day) = rotation_day_at(&ordered, offset) else {
                continue;
            };
            if let RotationSlot::Work(shift_type_id) = day.slot {
                drafts.push(ShiftDraft::new(*staff_id, date, shift_type_id));
            }
        }
    }

    Ok(drafts)
}
