// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inclusive date ranges and calendar months.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

/// An inclusive range of calendar dates.
///
/// Construction guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Creates a new inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `end` is before `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering a single day.
    #[must_use]
    pub const fn single(date: Date) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns true if `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns true if the inclusive range `[start, end]` overlaps this one.
    #[must_use]
    pub fn overlaps(&self, start: Date, end: Date) -> bool {
        end >= self.start && start <= self.end
    }

    /// Iterates every date in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = Date> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |d| {
            d.next_day().filter(|next| *next <= end)
        })
    }

    /// Number of days in the range.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from((self.end - self.start).whole_days()).map_or(0, |d| d + 1)
    }

    /// Always false; a range holds at least one day.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// A calendar month, e.g. March 2026.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthPeriod {
    year: i32,
    month: u8,
}

impl MonthPeriod {
    /// Creates a month period.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMonth` if the month is not 1..=12 or the
    /// year is outside the supported calendar.
    pub fn new(year: i32, month: u8) -> Result<Self, DomainError> {
        let period = Self { year, month };
        period.first_day()?;
        period.following().first_day()?;
        Ok(period)
    }

    /// The month containing `date`.
    #[must_use]
    pub fn containing(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// The first day of the month.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMonth` if the period does not name a real
    /// calendar month.
    pub fn first_day(&self) -> Result<Date, DomainError> {
        let invalid = || DomainError::InvalidMonth {
            year: self.year,
            month: self.month,
        };
        let month = Month::try_from(self.month).map_err(|_| invalid())?;
        Date::from_calendar_date(self.year, month, 1).map_err(|_| invalid())
    }

    /// The last day of the month.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMonth` if the period does not name a real
    /// calendar month.
    pub fn last_day(&self) -> Result<Date, DomainError> {
        let next_first = self.following().first_day()?;
        next_first.previous_day().ok_or(DomainError::InvalidMonth {
            year: self.year,
            month: self.month,
        })
    }

    /// The inclusive range of the whole month.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMonth` if the period does not name a real
    /// calendar month.
    pub fn range(&self) -> Result<DateRange, DomainError> {
        DateRange::new(self.first_day()?, self.last_day()?)
    }

    /// The month before this one.
    #[must_use]
    pub const fn previous(&self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after this one.
    #[must_use]
    pub const fn following(&self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl std::fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
