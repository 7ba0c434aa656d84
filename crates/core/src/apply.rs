// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{ShiftScope, State, Transition, TransitionResult};
use ward_roster_domain::{
    DomainError, ReviewOutcome, ReviewUpdate, Reviewer, apply_review, ensure_eligible,
    expand_rotation, parse_monthly_postings, parse_review_postings, plan_daily_assignment,
    plan_monthly_bulk, team_leader_scope,
};

fn review_outcomes(
    state: &State,
    updates: &[ReviewUpdate],
    reviewer: Reviewer,
) -> Result<Vec<ReviewOutcome>, CoreError> {
    let mut outcomes: Vec<ReviewOutcome> = Vec::with_capacity(updates.len());
    for update in updates {
        let shift = state
            .shift(update.shift_id)
            .ok_or(DomainError::ShiftNotEligibleForReview {
                shift_id: update.shift_id,
            })?;
        outcomes.push(apply_review(shift, update, reviewer)?);
    }
    Ok(outcomes)
}

/// Applies a command to the loaded state, producing the transition to persist.
///
/// Nothing is written here. Every input is parsed and validated before a
/// transition is returned, so a rejected command leaves no trace.
///
/// # Arguments
///
/// * `state` - The roster state the command needs (immutable)
/// * `command` - The command to apply
///
/// # Errors
///
/// Returns an error if:
/// - A posted payload key or value is malformed
/// - The rotation has no days
/// - A review targets a shift the reviewer may not review
/// - A review moves a reviewed shift back to pending
pub fn apply(state: &State, command: Command) -> Result<TransitionResult, CoreError> {
    let action = String::from(command.name());
    match command {
        Command::AssignDay { date, entries } => {
            let drafts = plan_daily_assignment(date, &entries)?;
            let details = format!("Assigned {} shifts on {date}", drafts.len());
            Ok(TransitionResult {
                transition: Transition::ReplaceShifts {
                    scope: ShiftScope::Date(date),
                    drafts,
                },
                action,
                details,
            })
        }
        Command::AssignRotation {
            rotation,
            staff_ids,
            range,
        } => {
            let drafts = expand_rotation(&rotation, &staff_ids, range)?;

            let mut staff_ids = staff_ids;
            staff_ids.sort_unstable();
            staff_ids.dedup();

            let details = format!(
                "Rotation '{}' assigned to {} staff from {} to {}: {} shifts",
                rotation.name,
                staff_ids.len(),
                range.start(),
                range.end(),
                drafts.len()
            );
            Ok(TransitionResult {
                transition: Transition::ReplaceShifts {
                    scope: ShiftScope::StaffRange { staff_ids, range },
                    drafts,
                },
                action,
                details,
            })
        }
        Command::AssignMonth { month, entries } => {
            let parsed = parse_monthly_postings(&entries)?;
            let drafts = plan_monthly_bulk(month, &state.active_staff, &parsed)?;
            let range = month.range()?;
            let details = format!("Assigned {} monthly records for {month}", drafts.len());
            Ok(TransitionResult {
                transition: Transition::ReplaceMonthlyAssignments { range, drafts },
                action,
                details,
            })
        }
        Command::SubmitChecklist {
            reviewer_staff_id,
            today,
            entries,
        } => {
            let updates = parse_review_postings(&entries)?;
            let eligible = team_leader_scope(
                reviewer_staff_id,
                today,
                &state.shifts,
                &state.team_leader_assignment_ids,
            )
            .map(|scope| scope.eligible_shift_ids)
            .unwrap_or_default();
            ensure_eligible(&eligible, &updates)?;

            let outcomes = review_outcomes(state, &updates, Reviewer::TeamLeader)?;
            let details = format!(
                "Staff {reviewer_staff_id} reviewed {} shifts on {today}",
                outcomes.len()
            );
            Ok(TransitionResult {
                transition: Transition::ReviewShifts { outcomes },
                action,
                details,
            })
        }
        Command::SubmitManagerReview { date, entries } => {
            let updates = parse_review_postings(&entries)?;
            let eligible: Vec<i64> = state
                .shifts
                .iter()
                .filter(|s| s.date == date)
                .map(|s| s.shift_id)
                .collect();
            ensure_eligible(&eligible, &updates)?;

            let outcomes = review_outcomes(state, &updates, Reviewer::Manager)?;
            let details = format!("Manager reviewed {} shifts on {date}", outcomes.len());
            Ok(TransitionResult {
                transition: Transition::ReviewShifts { outcomes },
                action,
                details,
            })
        }
    }
}
