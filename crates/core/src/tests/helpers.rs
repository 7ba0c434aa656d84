// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;
use ward_roster_domain::{AssignmentStatus, Shift, TaskCategory, TaskSet};

pub const TEAM_LEADER_TASK: i64 = 1;

pub fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn create_test_shift(
    shift_id: i64,
    staff_id: i64,
    date: Date,
    shift_type_id: i64,
    main: &[i64],
) -> Shift {
    let mut tasks = TaskSet::new();
    tasks.replace(TaskCategory::Main, main.iter().copied());
    Shift {
        shift_id,
        staff_id,
        date,
        shift_type_id,
        tasks,
        notes: None,
        status: AssignmentStatus::Pending,
        team_leader_notes: None,
        is_approved_by_manager: false,
    }
}
