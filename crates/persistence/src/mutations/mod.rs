// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Mutations use Diesel DSL, with `last_insert_rowid()` reached through the
//! `PersistenceBackend` trait.
//!
//! ## Module Organization
//!
//! - `staff`: Staff registry writes
//! - `reference`: Shift types, task items, rotations and monthly reference data
//! - `shifts`: Single shift writes and scoped deletes
//! - `monthly`: Monthly assignment writes
//! - `transition`: Transactional bulk replace and review persistence

pub mod monthly;
pub mod reference;
pub mod shifts;
pub mod staff;
pub mod transition;

pub use transition::{PersistTransitionResult, persist_transition};
