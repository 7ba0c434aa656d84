// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{ShiftDraft, ShiftType, Staff};
use std::collections::BTreeSet;

/// Validates that a reference data name is not blank.
///
/// `kind` names the entity in the error message, e.g. `"Committee"`.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is empty or whitespace.
pub fn validate_name(kind: &str, name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(format!(
            "{kind} name cannot be empty"
        )));
    }
    Ok(())
}

/// Validates the fields of a staff record.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the display name is blank.
pub fn validate_staff(staff: &Staff) -> Result<(), DomainError> {
    validate_name("Staff", &staff.display_name)
}

/// Validates a shift type definition.
///
/// Overnight shifts are allowed, so the end time may precede the start time.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is blank.
pub fn validate_shift_type(shift_type: &ShiftType) -> Result<(), DomainError> {
    validate_name("Shift type", &shift_type.name)
}

/// Returns the first `(staff, date, shift_type)` slot that appears more than
/// once in `drafts`, if any.
#[must_use]
pub fn find_duplicate_slot(drafts: &[ShiftDraft]) -> Option<&ShiftDraft> {
    let mut seen = BTreeSet::new();
    drafts.iter().find(|d| !seen.insert(d.slot()))
}
