// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Daily multi-task assignment planning.
//!
//! The daily form posts one entry per selected task slot, keyed as
//! `"{category}_{shift_type_id}_{task_id}"` with the chosen staff id as the
//! value. Entries are folded into one draft per `(staff, shift_type)` with
//! every posted task id placed in its category set.
//!
//! The whole payload is parsed before anything is produced, so a single
//! malformed key rejects the request.

use crate::error::DomainError;
use crate::types::{Shift, ShiftDraft, TaskCategory, TaskSet};
use std::collections::BTreeMap;
use time::Date;

/// Number of days before the target date scanned for recent task history.
pub const HISTORY_WINDOW_DAYS: i64 = 5;

/// One parsed entry of the daily assignment payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyPosting {
    pub category: TaskCategory,
    pub shift_type_id: i64,
    pub task_id: i64,
    pub staff_id: i64,
}

/// Parses a daily assignment key of the form `"{category}_{shift_type_id}_{task_id}"`.
///
/// # Errors
///
/// Returns `DomainError::MalformedPayloadKey` if the key does not have exactly
/// three parts, the category is unknown, or either id is not an integer.
pub fn parse_daily_key(key: &str) -> Result<(TaskCategory, i64, i64), DomainError> {
    let malformed = |reason: &str| DomainError::MalformedPayloadKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = key.split('_').collect();
    let [category, shift_type_id, task_id] = parts.as_slice() else {
        return Err(malformed(
            "expected '{category}_{shift_type_id}_{task_id}'",
        ));
    };

    let category: TaskCategory = category
        .parse()
        .map_err(|_| malformed("unknown task category"))?;
    let shift_type_id: i64 = shift_type_id
        .parse()
        .map_err(|_| malformed("shift type id is not an integer"))?;
    let task_id: i64 = task_id
        .parse()
        .map_err(|_| malformed("task id is not an integer"))?;

    Ok((category, shift_type_id, task_id))
}

/// Parses the posted key/value pairs of a daily assignment form.
///
/// Entries with a blank value are unassigned slots and are skipped.
///
/// # Errors
///
/// Returns `DomainError::MalformedPayloadKey` for a malformed key and
/// `DomainError::MalformedPayloadValue` for a non-integer staff id.
pub fn parse_daily_postings<K, V>(entries: &[(K, V)]) -> Result<Vec<DailyPosting>, DomainError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut postings: Vec<DailyPosting> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let key = key.as_ref();
        let value = value.as_ref().trim();
        if value.is_empty() {
            continue;
        }
        let (category, shift_type_id, task_id) = parse_daily_key(key)?;
        let staff_id: i64 = value
            .parse()
            .map_err(|_| DomainError::MalformedPayloadValue {
                key: key.to_string(),
                value: value.to_string(),
            })?;
        postings.push(DailyPosting {
            category,
            shift_type_id,
            task_id,
            staff_id,
        });
    }
    Ok(postings)
}

/// Groups postings into one shift draft per `(staff, shift_type)` for `date`.
///
/// Drafts are returned ordered by staff id, then shift type id.
#[must_use]
pub fn group_daily_postings(date: Date, postings: &[DailyPosting]) -> Vec<ShiftDraft> {
    let mut grouped: BTreeMap<(i64, i64), TaskSet> = BTreeMap::new();
    for posting in postings {
        grouped
            .entry((posting.staff_id, posting.shift_type_id))
            .or_default()
            .insert(posting.category, posting.task_id);
    }

    grouped
        .into_iter()
        .map(|((staff_id, shift_type_id), tasks)| ShiftDraft {
            staff_id,
            date,
            shift_type_id,
            tasks,
            notes: None,
        })
        .collect()
}

/// Parses and groups a daily assignment payload in one step.
///
/// An empty payload yields no drafts, which clears the day when applied.
///
/// # Errors
///
/// Returns an error if any key or value is malformed.
pub fn plan_daily_assignment<K, V>(
    date: Date,
    entries: &[(K, V)],
) -> Result<Vec<ShiftDraft>, DomainError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let postings = parse_daily_postings(entries)?;
    Ok(group_daily_postings(date, &postings))
}

/// Recent task history: staff id, then category, then task id, to the most
/// recent date on which that task was held.
pub type TaskHistory = BTreeMap<i64, BTreeMap<TaskCategory, BTreeMap<i64, Date>>>;

/// Builds the task history for the days leading up to `date`.
///
/// Only shifts in the `HISTORY_WINDOW_DAYS` days strictly before `date` are
/// considered; other shifts in the input are ignored.
#[must_use]
pub fn recent_task_history(date: Date, shifts: &[Shift]) -> TaskHistory {
    let window_start = date - time::Duration::days(HISTORY_WINDOW_DAYS);
    let mut history: TaskHistory = BTreeMap::new();

    for shift in shifts {
        if shift.date < window_start || shift.date >= date {
            continue;
        }
        let per_staff = history.entry(shift.staff_id).or_default();
        for category in TaskCategory::ALL {
            let per_category = per_staff.entry(category).or_default();
            for task_id in shift.tasks.get(category) {
                let latest = per_category.entry(*task_id).or_insert(shift.date);
                if shift.date > *latest {
                    *latest = shift.date;
                }
            }
        }
    }

    history
}
