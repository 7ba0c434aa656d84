// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `staff`: Staff registry lookups
//! - `reference`: Shift types, task items, rotations, monthly tasks, groups, committees
//! - `shifts`: Shift ledger reads with their task sets
//! - `monthly`: Monthly assignment ledger reads
//! - `analytics`: Snapshot reads feeding the analytics aggregator

pub mod analytics;
pub mod monthly;
pub mod reference;
pub mod shifts;
pub mod staff;

use crate::error::PersistenceError;
use std::collections::BTreeSet;

/// Fails with `ReferenceNotFound` naming the first wanted id that was not found.
pub fn ensure_all_found(
    kind: &str,
    wanted: &BTreeSet<i64>,
    found: &[i64],
) -> Result<(), PersistenceError> {
    let found: BTreeSet<i64> = found.iter().copied().collect();
    match wanted.difference(&found).next() {
        Some(missing) => Err(PersistenceError::ReferenceNotFound(format!(
            "{kind} {missing}"
        ))),
        None => Ok(()),
    }
}
