// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Feasibility checks that turn a [`Command`] into a [`Plan`].
//!
//! Planning is read-only. A plan records everything the caller needs to
//! confirm the action (the resolved appointment, a shifted preview, the
//! deletion warning counts) and everything [`crate::apply`] needs to
//! perform it.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::ScheduleBook;
use serde::{Deserialize, Serialize};
use slotshift_domain::{
    AppointmentId, DomainError, LinkPolicy, PractitionerId, Schedule, ScheduleDeletionPlan,
    ScheduleId, ShiftMode, ShiftRequest, SlotContext, SlotDeletionPlan, SlotId, SlotKey,
    TransferPlan, check_link_policy, plan_schedule_deletion, plan_slot_deletion,
    shift_schedules, validate_transfer,
};

/// An accepted command, ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Plan {
    /// A validated slot-to-slot transfer.
    Transfer {
        /// The transfer details.
        transfer: TransferPlan,
    },
    /// A validated shift with a preview of the shifted schedules.
    Shift {
        /// The request as submitted.
        request: ShiftRequest,
        /// The named schedules after shifting, for confirmation.
        preview: Vec<Schedule>,
    },
    /// Schedules selected for deletion.
    DeleteSchedules {
        /// The selection and its warning counts.
        deletion: ScheduleDeletionPlan,
    },
    /// Slots selected for deletion inside one schedule.
    DeleteSlots {
        /// Owner of the schedule.
        practitioner_id: PractitionerId,
        /// The selection and its warning counts.
        deletion: SlotDeletionPlan,
    },
}

impl Plan {
    /// Practitioners whose schedules the plan touches, without duplicates,
    /// in first-seen order.
    #[must_use]
    pub fn practitioners(&self) -> Vec<PractitionerId> {
        let candidates: Vec<PractitionerId> = match self {
            Self::Transfer { transfer } => vec![
                transfer.source.practitioner_id.clone(),
                transfer.target.practitioner_id.clone(),
            ],
            Self::Shift { preview, .. } => preview
                .iter()
                .map(|schedule| schedule.practitioner_id.clone())
                .collect(),
            Self::DeleteSchedules { deletion } => deletion
                .to_delete
                .iter()
                .map(|schedule| schedule.practitioner_id.clone())
                .collect(),
            Self::DeleteSlots {
                practitioner_id, ..
            } => vec![practitioner_id.clone()],
        };

        let mut unique: Vec<PractitionerId> = Vec::with_capacity(candidates.len());
        for practitioner in candidates {
            if !unique.contains(&practitioner) {
                unique.push(practitioner);
            }
        }
        unique
    }

    /// Short action name for audit records and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "TransferAppointment",
            Self::Shift { request, .. } => match request.mode {
                ShiftMode::Time => "ShiftMinutes",
                ShiftMode::Day => "ShiftDays",
            },
            Self::DeleteSchedules { .. } => "DeleteSchedules",
            Self::DeleteSlots { .. } => "DeleteSlots",
        }
    }
}

/// A single call the persistence service must execute to make a plan real.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExternalCommand {
    /// Move an appointment to a new slot.
    CommitTransfer {
        /// The appointment being moved.
        appointment_id: AppointmentId,
        /// Its new slot.
        new_slot_id: SlotId,
    },
    /// Shift one schedule by minutes.
    CommitMinuteShift {
        /// The schedule to shift.
        schedule_id: ScheduleId,
        /// Shift magnitude.
        minutes: i64,
        /// Why the schedule is shifted.
        reason: String,
        /// Who shifts it.
        actor_id: String,
    },
    /// Shift one schedule by whole days.
    CommitDayShift {
        /// The schedule to shift.
        schedule_id: ScheduleId,
        /// Shift magnitude.
        days: i64,
        /// Why the schedule is shifted.
        reason: String,
        /// Who shifts it.
        actor_id: String,
    },
    /// Delete whole schedules.
    CommitScheduleDeletion {
        /// Schedules to delete.
        schedule_ids: Vec<ScheduleId>,
    },
    /// Delete individual slots.
    CommitSlotDeletion {
        /// Slots to delete.
        slot_ids: Vec<SlotId>,
    },
}

/// Checks a command against the current book and produces a plan.
///
/// # Arguments
///
/// * `book` - The cached schedules (immutable)
/// * `command` - The command to check
/// * `policy` - How strictly a transfer must confirm its appointment link
///
/// # Errors
///
/// Returns an error if:
/// - A slot key or schedule id does not exist in the book
/// - The transfer is illegal or its appointment link is forbidden by `policy`
/// - The shift request is invalid or its mode disagrees with the command
/// - A deletion selection is malformed or matches nothing
pub fn plan(book: &ScheduleBook, command: &Command, policy: LinkPolicy) -> Result<Plan, CoreError> {
    match command {
        Command::Transfer { source, target } => {
            let source_ctx: SlotContext<'_> = lookup(book, source)?;
            let target_ctx: SlotContext<'_> = lookup(book, target)?;
            let transfer: TransferPlan = validate_transfer(source_ctx, target_ctx)?;
            check_link_policy(&transfer, policy)?;
            Ok(Plan::Transfer { transfer })
        }
        Command::ShiftMinutes { request } => plan_shift(book, request, ShiftMode::Time),
        Command::ShiftDays { request } => plan_shift(book, request, ShiftMode::Day),
        Command::DeleteSchedules { selection } => {
            let deletion: ScheduleDeletionPlan =
                plan_schedule_deletion(book.schedules(), selection)?;
            // Rule: an unknown id is reported, not silently dropped
            if let Some(missing) = deletion.unmatched_ids.first() {
                return Err(DomainError::ScheduleNotFound(missing.clone()).into());
            }
            if deletion.schedule_count == 0 {
                return Err(CoreError::EmptySelection {
                    target: "schedules",
                });
            }
            Ok(Plan::DeleteSchedules { deletion })
        }
        Command::DeleteSlots {
            schedule_id,
            selection,
        } => {
            let schedule: &Schedule = book
                .find_schedule(schedule_id)
                .ok_or_else(|| DomainError::ScheduleNotFound(schedule_id.clone()))?;
            let deletion: SlotDeletionPlan = plan_slot_deletion(schedule, selection)?;
            if let Some(missing) = deletion.unmatched_ids.first() {
                return Err(DomainError::SlotNotFound {
                    schedule: schedule_id.clone(),
                    slot: missing.clone(),
                }
                .into());
            }
            if deletion.slot_count == 0 {
                return Err(CoreError::EmptySelection { target: "slots" });
            }
            Ok(Plan::DeleteSlots {
                practitioner_id: schedule.practitioner_id.clone(),
                deletion,
            })
        }
    }
}

fn plan_shift(
    book: &ScheduleBook,
    request: &ShiftRequest,
    expected: ShiftMode,
) -> Result<Plan, CoreError> {
    if request.mode != expected {
        return Err(CoreError::ShiftModeMismatch {
            command: expected,
            request: request.mode,
        });
    }
    let preview: Vec<Schedule> = shift_schedules(book.schedules(), request)?;
    Ok(Plan::Shift {
        request: request.clone(),
        preview,
    })
}

fn lookup<'a>(book: &'a ScheduleBook, key: &SlotKey) -> Result<SlotContext<'a>, DomainError> {
    book.find_slot(key).ok_or_else(|| {
        if book.find_schedule(&key.schedule_id).is_none() {
            DomainError::ScheduleNotFound(key.schedule_id.clone())
        } else {
            DomainError::SlotNotFound {
                schedule: key.schedule_id.clone(),
                slot: key.slot_id.clone(),
            }
        }
    })
}
