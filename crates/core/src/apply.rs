// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::plan::{ExternalCommand, Plan};
use crate::state::{ScheduleBook, TransitionResult};
use slotshift_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use slotshift_domain::{
    DomainError, PractitionerId, Schedule, ScheduleId, ShiftMode, ShiftRequest, SlotId, apply_transfer,
    shift_schedules,
};

/// Applies a plan to the book, producing the optimistic book, the external
/// commands to issue and an audit event.
///
/// The plan is re-checked against `book`, so a plan computed against an
/// older book fails instead of being half-applied.
///
/// # Arguments
///
/// * `book` - The current book (immutable)
/// * `plan` - The plan to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - A schedule or slot named by the plan is no longer in the book
/// - A transfer's source is no longer occupied or its target no longer free
/// - A shift overflows the representable date range
pub fn apply(
    book: &ScheduleBook,
    plan: &Plan,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let mut new_book: ScheduleBook = book.clone();

    let (external_commands, details): (Vec<ExternalCommand>, String) = match plan {
        Plan::Transfer { transfer } => {
            apply_transfer(new_book.schedules_mut(), transfer)?;
            let command: ExternalCommand = ExternalCommand::CommitTransfer {
                appointment_id: transfer.appointment_id.clone(),
                new_slot_id: transfer.target.slot_id.clone(),
            };
            let details: String = format!(
                "Moved appointment {} from {} to {} ({})",
                transfer.appointment_id, transfer.source, transfer.target, transfer.resolution
            );
            (vec![command], details)
        }
        Plan::Shift { request, .. } => {
            // Recomputed from the book rather than trusting the preview
            let shifted: Vec<Schedule> = shift_schedules(book.schedules(), request)?;
            for replacement in shifted {
                if let Some(existing) = new_book
                    .schedules_mut()
                    .iter_mut()
                    .find(|schedule| schedule.id == replacement.id)
                {
                    *existing = replacement;
                }
            }
            let details: String = format!(
                "Shifted {} schedule(s) by {} {}: {}",
                request.schedule_ids.len(),
                request.magnitude,
                request.mode.unit(),
                request.reason
            );
            (shift_commands(request), details)
        }
        Plan::DeleteSchedules { deletion } => {
            let ids: Vec<ScheduleId> = deletion.schedule_ids();
            if let Some(missing) = ids.iter().find(|id| book.find_schedule(id).is_none()) {
                return Err(DomainError::ScheduleNotFound(missing.clone()).into());
            }
            new_book
                .schedules_mut()
                .retain(|schedule| !ids.contains(&schedule.id));
            let details: String = format!(
                "Deleted {} schedule(s) with {} slot(s), {} occupied",
                deletion.schedule_count, deletion.slot_count, deletion.occupied_count
            );
            (
                vec![ExternalCommand::CommitScheduleDeletion { schedule_ids: ids }],
                details,
            )
        }
        Plan::DeleteSlots { deletion, .. } => {
            let ids: Vec<SlotId> = deletion.slot_ids();
            let schedule: &mut Schedule = new_book
                .schedules_mut()
                .iter_mut()
                .find(|schedule| schedule.id == deletion.schedule_id)
                .ok_or_else(|| DomainError::ScheduleNotFound(deletion.schedule_id.clone()))?;
            if let Some(missing) = ids.iter().find(|id| schedule.find_slot(id).is_none()) {
                return Err(DomainError::SlotNotFound {
                    schedule: deletion.schedule_id.clone(),
                    slot: missing.clone(),
                }
                .into());
            }
            schedule.slots.retain(|slot| !ids.contains(&slot.id));
            let details: String = format!(
                "Deleted {} slot(s) from schedule '{}', {} occupied",
                deletion.slot_count, deletion.schedule_id, deletion.occupied_count
            );
            (
                vec![ExternalCommand::CommitSlotDeletion { slot_ids: ids }],
                details,
            )
        }
    };

    let before: StateSnapshot = book.to_snapshot();
    let after: StateSnapshot = new_book.to_snapshot();
    let action: Action = Action::new(String::from(plan.name()), Some(details));
    let practitioners: Vec<PractitionerId> = plan.practitioners();
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        practitioners.clone(),
    );

    Ok(TransitionResult {
        new_book,
        external_commands,
        practitioners,
        audit_event,
    })
}

fn shift_commands(request: &ShiftRequest) -> Vec<ExternalCommand> {
    request
        .schedule_ids
        .iter()
        .map(|schedule_id| match request.mode {
            ShiftMode::Time => ExternalCommand::CommitMinuteShift {
                schedule_id: schedule_id.clone(),
                minutes: request.magnitude,
                reason: request.reason.clone(),
                actor_id: request.actor_id.clone(),
            },
            ShiftMode::Day => ExternalCommand::CommitDayShift {
                schedule_id: schedule_id.clone(),
                days: request.magnitude,
                reason: request.reason.clone(),
                actor_id: request.actor_id.clone(),
            },
        })
        .collect()
}
