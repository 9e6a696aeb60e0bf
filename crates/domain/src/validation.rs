// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::schedule::{Schedule, Slot};

/// Validates the structural invariants of a schedule.
///
/// This function is pure and checks, in order:
/// - the planning window is not inverted
/// - every slot ends after it starts
/// - every slot lies within the planning window
/// - slots are sorted by start time
/// - no two slots overlap
///
/// An empty slot list is valid.
///
/// # Errors
///
/// Returns the first violated invariant.
pub fn validate_schedule(schedule: &Schedule) -> Result<(), DomainError> {
    // Rule: planning window must not be inverted
    if schedule.planning_end < schedule.planning_start {
        return Err(DomainError::InvalidPlanningWindow {
            schedule: schedule.id.clone(),
        });
    }

    for slot in &schedule.slots {
        validate_slot_range(slot)?;

        // Rule: slots must lie inside [planning_start, planning_end]
        if slot.start < schedule.planning_start || slot.end > schedule.planning_end {
            return Err(DomainError::SlotOutOfBounds {
                schedule: schedule.id.clone(),
                slot: slot.id.clone(),
            });
        }
    }

    for pair in schedule.slots.windows(2) {
        let [previous, current] = pair else {
            continue;
        };

        // Rule: slots are ordered by start
        if current.start < previous.start {
            return Err(DomainError::SlotsOutOfOrder {
                schedule: schedule.id.clone(),
                slot: current.id.clone(),
            });
        }

        // Rule: [start, end) intervals are pairwise disjoint. With sorted
        // input, checking neighbours is sufficient.
        if current.start < previous.end {
            return Err(DomainError::OverlappingSlots {
                schedule: schedule.id.clone(),
                first: previous.id.clone(),
                second: current.id.clone(),
            });
        }
    }

    Ok(())
}

/// Validates that a slot ends strictly after it starts.
///
/// # Errors
///
/// Returns `DomainError::InvalidSlotRange` when `end <= start`.
pub fn validate_slot_range(slot: &Slot) -> Result<(), DomainError> {
    if slot.end <= slot.start {
        return Err(DomainError::InvalidSlotRange {
            slot: slot.id.clone(),
        });
    }
    Ok(())
}
