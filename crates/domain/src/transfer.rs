// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot-to-slot appointment transfers.
//!
//! A transfer moves the appointment held by an occupied source slot onto a
//! free target slot. The two slots may belong to different practitioners
//! and different days; neither affects legality.

use crate::appointment_ref::{Resolution, resolve_appointment_id};
use crate::error::DomainError;
use crate::schedule::{Schedule, Slot};
use crate::types::{AppointmentId, SlotKey};
use serde::{Deserialize, Serialize};

/// A slot together with the schedule that owns it.
#[derive(Debug, Clone, Copy)]
pub struct SlotContext<'a> {
    /// Owning schedule.
    pub schedule: &'a Schedule,
    /// The slot.
    pub slot: &'a Slot,
}

impl<'a> SlotContext<'a> {
    /// Pairs a slot with its schedule.
    #[must_use]
    pub const fn new(schedule: &'a Schedule, slot: &'a Slot) -> Self {
        Self { schedule, slot }
    }

    /// Structured key of the slot.
    #[must_use]
    pub fn key(&self) -> SlotKey {
        SlotKey::new(
            self.schedule.practitioner_id.clone(),
            self.schedule.id.clone(),
            self.slot.id.clone(),
        )
    }
}

/// An accepted transfer, ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPlan {
    /// Slot that will be freed.
    pub source: SlotKey,
    /// Slot that will be occupied.
    pub target: SlotKey,
    /// The appointment being moved.
    pub appointment_id: AppointmentId,
    /// How `appointment_id` was obtained.
    pub resolution: Resolution,
    /// Display name of the source practitioner.
    pub source_practitioner: String,
    /// Display name of the target practitioner.
    pub target_practitioner: String,
    /// Whether both slots fall on the same calendar date.
    pub same_day: bool,
}

impl TransferPlan {
    /// The appointment link could not be found at all and the slot id was
    /// used instead.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.resolution == Resolution::SlotIdFallback
    }

    /// Whether the appointment changes practitioner.
    #[must_use]
    pub fn is_cross_practitioner(&self) -> bool {
        self.source.practitioner_id != self.target.practitioner_id
    }

    /// Human-readable confirmation prompt for this transfer.
    #[must_use]
    pub fn confirmation_message(&self) -> String {
        let who: String = if self.is_cross_practitioner() {
            format!(
                " from {} to {}",
                self.source_practitioner, self.target_practitioner
            )
        } else {
            String::new()
        };
        let when: &str = if self.same_day {
            "on the same day"
        } else {
            "to a different day"
        };
        format!(
            "Move appointment {}{who} {when}?",
            self.appointment_id
        )
    }
}

/// How strictly transfers must be able to confirm the appointment link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPolicy {
    /// Accept every resolution, including the slot id fallback.
    #[default]
    Proceed,
    /// Reject transfers that fall back to the slot id.
    RejectSlotIdFallback,
    /// Only accept structured appointment links.
    RequireStructured,
}

/// Checks a transfer's appointment-link resolution against `policy`.
///
/// # Errors
///
/// Returns `DomainError::UnconfirmedAppointmentLink` when the policy
/// forbids the plan's resolution.
pub fn check_link_policy(plan: &TransferPlan, policy: LinkPolicy) -> Result<(), DomainError> {
    let rejected: bool = match policy {
        LinkPolicy::Proceed => false,
        LinkPolicy::RejectSlotIdFallback => plan.is_degraded(),
        LinkPolicy::RequireStructured => plan.resolution.is_fallback(),
    };
    if rejected {
        return Err(DomainError::UnconfirmedAppointmentLink {
            slot: plan.source.slot_id.clone(),
            resolution: plan.resolution,
        });
    }
    Ok(())
}

/// Validates a transfer from `source` to `target`.
///
/// Rules are applied in order:
/// 1. dropping a slot onto itself is a no-op
/// 2. the target must be free
/// 3. the source must be occupied
///
/// # Errors
///
/// Returns `NoOpTransfer`, `TargetOccupied` or `SourceNotMovable` for the
/// first rule that fails.
pub fn validate_transfer(
    source: SlotContext<'_>,
    target: SlotContext<'_>,
) -> Result<TransferPlan, DomainError> {
    let source_key: SlotKey = source.key();
    let target_key: SlotKey = target.key();

    // Rule: a slot cannot be moved onto itself
    if source_key.schedule_id == target_key.schedule_id
        && source_key.slot_id == target_key.slot_id
    {
        return Err(DomainError::NoOpTransfer {
            slot: source_key.slot_id,
        });
    }

    // Rule: only free slots accept a drop
    if !target.slot.is_drop_target() {
        return Err(DomainError::TargetOccupied {
            slot: target_key.slot_id,
        });
    }

    // Rule: only occupied slots carry something to move
    if !source.slot.is_movable() {
        return Err(DomainError::SourceNotMovable {
            slot: source_key.slot_id,
        });
    }

    let resolved = resolve_appointment_id(source.slot);

    Ok(TransferPlan {
        source: source_key,
        target: target_key,
        appointment_id: resolved.id,
        resolution: resolved.resolution,
        source_practitioner: source.schedule.practitioner_name.clone(),
        target_practitioner: target.schedule.practitioner_name.clone(),
        same_day: source.slot.start.date() == target.slot.start.date(),
    })
}

/// Applies a transfer plan to `schedules` in place.
///
/// The slots are re-validated against the schedules the plan is applied to,
/// so a plan computed against an older snapshot is rejected instead of
/// producing a half-applied move.
///
/// # Errors
///
/// Returns an error if either slot is missing, or if the target is now
/// occupied or the source now free. Nothing is modified on error.
pub fn apply_transfer(schedules: &mut [Schedule], plan: &TransferPlan) -> Result<(), DomainError> {
    if plan.source.schedule_id == plan.target.schedule_id
        && plan.source.slot_id == plan.target.slot_id
    {
        return Err(DomainError::NoOpTransfer {
            slot: plan.source.slot_id.clone(),
        });
    }

    {
        let source: &Slot = locate(schedules, &plan.source)?;
        let target: &Slot = locate(schedules, &plan.target)?;
        if !target.is_drop_target() {
            return Err(DomainError::TargetOccupied {
                slot: plan.target.slot_id.clone(),
            });
        }
        if !source.is_movable() {
            return Err(DomainError::SourceNotMovable {
                slot: plan.source.slot_id.clone(),
            });
        }
    }

    if let Some(slot) = locate_mut(schedules, &plan.source) {
        slot.release();
    }
    if let Some(slot) = locate_mut(schedules, &plan.target) {
        slot.occupy(plan.appointment_id.clone());
    }
    Ok(())
}

fn locate<'a>(schedules: &'a [Schedule], key: &SlotKey) -> Result<&'a Slot, DomainError> {
    schedules
        .iter()
        .find(|schedule| schedule.id == key.schedule_id)
        .ok_or_else(|| DomainError::ScheduleNotFound(key.schedule_id.clone()))?
        .find_slot(&key.slot_id)
        .ok_or_else(|| DomainError::SlotNotFound {
            schedule: key.schedule_id.clone(),
            slot: key.slot_id.clone(),
        })
}

fn locate_mut<'a>(schedules: &'a mut [Schedule], key: &SlotKey) -> Option<&'a mut Slot> {
    schedules
        .iter_mut()
        .find(|schedule| schedule.id == key.schedule_id)
        .and_then(|schedule| schedule.find_slot_mut(&key.slot_id))
}
