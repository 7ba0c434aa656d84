// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment status tracking and transition logic.
//!
//! Shifts and monthly assignments share one status vocabulary. A record
//! starts `Pending` and is moved to one of the reviewed outcomes by a team
//! leader or manager. Reviewed outcomes may be corrected to another reviewed
//! outcome at any time, including after manager approval. Approval itself is
//! a separate flag and is not modelled here.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Completion status of a shift or monthly assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    /// Not yet reviewed.
    #[default]
    Pending,
    /// Work was fully completed.
    Completed,
    /// Work was partially completed.
    Partial,
    /// Work was not completed.
    NotCompleted,
}

impl AssignmentStatus {
    /// Every status in display order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Completed,
        Self::Partial,
        Self::NotCompleted,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and form values.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Partial => "PARTIAL",
            Self::NotCompleted => "NOT_COMPLETED",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "PARTIAL" => Ok(Self::Partial),
            "NOT_COMPLETED" => Ok(Self::NotCompleted),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }

    /// Returns true if this status is a review outcome.
    ///
    /// Only reviewed statuses count towards completion percentages.
    #[must_use]
    pub const fn is_reviewed(&self) -> bool {
        matches!(self, Self::Completed | Self::Partial | Self::NotCompleted)
    }

    /// Validates a status change requested by a reviewer.
    ///
    /// - `Pending` may move to any reviewed outcome, or stay `Pending`.
    /// - A reviewed outcome may be corrected to any reviewed outcome.
    /// - A reviewed outcome may not go back to `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if a reviewed record is
    /// moved back to `Pending`.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_reviewed() && !new_status.is_reviewed() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
            });
        }
        Ok(())
    }
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
