// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parsing of primitive request fields.
//!
//! Requests carry dates as `YYYY-MM-DD`, times as `HH:MM` and enumerations as
//! their wire strings. Each helper names the field it parsed so the caller can
//! report exactly which input was rejected.

use std::str::FromStr;
use thiserror::Error;
use time::{Date, Month, Time};
use ward_roster_domain::{
    AssignmentStatus, MonthPeriod, StaffRole, TaskCategory, parse_date, parse_time,
};

/// Request field errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// A date field is not a valid `YYYY-MM-DD` date.
    #[error("'{value}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    /// A time field is not a valid `HH:MM` time.
    #[error("'{value}' is not a valid time (expected HH:MM)")]
    InvalidTime { field: &'static str, value: String },

    /// A year/month pair is not a calendar month.
    #[error("{year}-{month} is not a valid month")]
    InvalidMonth { year: i32, month: u8 },

    /// A year/month/day triple is not a calendar date.
    #[error("{year}-{month}-{day} is not a valid date")]
    InvalidDay { year: i32, month: u8, day: u8 },

    /// A task category is not one of main, sub, clinic or emergency.
    #[error("'{0}' is not a task category")]
    InvalidCategory(String),

    /// A staff role is not one of NURSE, MAS or MANAGER.
    #[error("'{0}' is not a staff role")]
    InvalidRole(String),

    /// An assignment status is not recognised.
    #[error("'{0}' is not an assignment status")]
    InvalidStatus(String),
}

impl PayloadError {
    /// The request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidDate { field, .. } | Self::InvalidTime { field, .. } => field,
            Self::InvalidMonth { .. } => "month",
            Self::InvalidDay { .. } => "day",
            Self::InvalidCategory(_) => "category",
            Self::InvalidRole(_) => "role",
            Self::InvalidStatus(_) => "status",
        }
    }
}

/// Parses a `YYYY-MM-DD` field.
///
/// # Errors
///
/// Returns `PayloadError::InvalidDate` if the value is not a date.
pub fn parse_date_field(field: &'static str, value: &str) -> Result<Date, PayloadError> {
    parse_date(value.trim()).map_err(|_| PayloadError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Parses an optional `YYYY-MM-DD` field, falling back to `default`.
///
/// # Errors
///
/// Returns `PayloadError::InvalidDate` if a value is present but not a date.
pub fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
    default: Date,
) -> Result<Date, PayloadError> {
    match value {
        Some(v) if !v.trim().is_empty() => parse_date_field(field, v),
        _ => Ok(default),
    }
}

/// Parses an `HH:MM` field.
///
/// # Errors
///
/// Returns `PayloadError::InvalidTime` if the value is not a time.
pub fn parse_time_field(field: &'static str, value: &str) -> Result<Time, PayloadError> {
    parse_time(value.trim()).map_err(|_| PayloadError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

/// Builds a month period from path segments.
///
/// # Errors
///
/// Returns `PayloadError::InvalidMonth` if the month is not 1 to 12.
pub fn parse_month(year: i32, month: u8) -> Result<MonthPeriod, PayloadError> {
    MonthPeriod::new(year, month).map_err(|_| PayloadError::InvalidMonth { year, month })
}

/// Builds a date from path segments.
///
/// # Errors
///
/// Returns `PayloadError::InvalidDay` if the triple is not a calendar date.
pub fn parse_day(year: i32, month: u8, day: u8) -> Result<Date, PayloadError> {
    Month::try_from(month)
        .ok()
        .and_then(|m| Date::from_calendar_date(year, m, day).ok())
        .ok_or(PayloadError::InvalidDay { year, month, day })
}

/// Parses a task category path segment.
///
/// # Errors
///
/// Returns `PayloadError::InvalidCategory` for an unknown category.
pub fn parse_category(value: &str) -> Result<TaskCategory, PayloadError> {
    TaskCategory::from_str(value).map_err(|_| PayloadError::InvalidCategory(value.to_string()))
}

/// Parses a staff role.
///
/// # Errors
///
/// Returns `PayloadError::InvalidRole` for an unknown role.
pub fn parse_role(value: &str) -> Result<StaffRole, PayloadError> {
    StaffRole::from_str(value).map_err(|_| PayloadError::InvalidRole(value.to_string()))
}

/// Parses an assignment status, defaulting to pending when absent.
///
/// # Errors
///
/// Returns `PayloadError::InvalidStatus` for an unknown status.
pub fn parse_status(value: Option<&str>) -> Result<AssignmentStatus, PayloadError> {
    match value {
        None => Ok(AssignmentStatus::Pending),
        Some(v) => {
            AssignmentStatus::from_str(v).map_err(|_| PayloadError::InvalidStatus(v.to_string()))
        }
    }
}
