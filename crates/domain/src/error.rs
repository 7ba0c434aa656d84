// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A rotation has no days defined, so it cannot be expanded.
    EmptyRotation {
        /// The rotation name.
        rotation: String,
    },
    /// The end of a date range falls before its start.
    InvalidDateRange {
        /// The requested start date.
        start: Date,
        /// The requested end date.
        end: Date,
    },
    /// A posted form key does not have the expected shape.
    MalformedPayloadKey {
        /// The offending key.
        key: String,
        /// Why the key was rejected.
        reason: String,
    },
    /// A posted form value could not be interpreted.
    MalformedPayloadValue {
        /// The key the value was posted under.
        key: String,
        /// The offending value.
        value: String,
    },
    /// A task category prefix is not recognised.
    InvalidTaskCategory(String),
    /// A staff role string is not recognised.
    InvalidStaffRole(String),
    /// An assignment status string is not recognised.
    InvalidStatus(String),
    /// A status change is not permitted by the review lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// A shift was submitted for review by someone not entitled to review it.
    ShiftNotEligibleForReview {
        /// The shift identifier.
        shift_id: i64,
    },
    /// A name field is empty.
    InvalidName(String),
    /// A time of day could not be parsed.
    InvalidTime(String),
    /// A date could not be parsed.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A calendar month is out of range.
    InvalidMonth {
        /// The year.
        year: i32,
        /// The month number.
        month: u8,
    },
    /// A rotation length is zero or does not cover its days.
    InvalidRotationLength {
        /// The declared length.
        length_in_days: u32,
        /// The number of days defined.
        defined_days: usize,
    },
    /// A rotation day number is zero or repeated.
    InvalidRotationDay {
        /// The offending day number.
        day_number: u32,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRotation { rotation } => {
                write!(f, "Rotation '{rotation}' has no days defined")
            }
            Self::InvalidDateRange { start, end } => {
                write!(f, "Invalid date range: end date {end} is before start date {start}")
            }
            Self::MalformedPayloadKey { key, reason } => {
                write!(f, "Malformed payload key '{key}': {reason}")
            }
            Self::MalformedPayloadValue { key, value } => {
                write!(f, "Malformed value '{value}' for payload key '{key}'")
            }
            Self::InvalidTaskCategory(msg) => write!(f, "Invalid task category: {msg}"),
            Self::InvalidStaffRole(msg) => write!(f, "Invalid staff role: {msg}"),
            Self::InvalidStatus(msg) => write!(f, "Invalid status: {msg}"),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Invalid status transition from {from} to {to}")
            }
            Self::ShiftNotEligibleForReview { shift_id } => {
                write!(f, "Shift {shift_id} is not eligible for review by this reviewer")
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidTime(msg) => write!(f, "Invalid time: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidMonth { year, month } => {
                write!(f, "Invalid month {month} for year {year}")
            }
            Self::InvalidRotationLength {
                length_in_days,
                defined_days,
            } => {
                write!(
                    f,
                    "Invalid rotation length {length_in_days}: {defined_days} days are defined"
                )
            }
            Self::InvalidRotationDay { day_number } => {
                write!(f, "Invalid rotation day number: {day_number}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
