// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::appointment_ref::Resolution;
use crate::types::{ScheduleId, SlotId};

/// Errors that can occur during domain validation and planning.
///
/// Every variant is detected before any mutation takes place, so a returned
/// error always means nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Source and target of a transfer are the same slot.
    NoOpTransfer {
        /// The slot that was dropped onto itself.
        slot: SlotId,
    },
    /// The transfer target already holds an appointment.
    TargetOccupied {
        /// The occupied target slot.
        slot: SlotId,
    },
    /// The transfer source is free and carries nothing to move.
    SourceNotMovable {
        /// The free source slot.
        slot: SlotId,
    },
    /// The appointment link was resolved by a fallback the active policy forbids.
    UnconfirmedAppointmentLink {
        /// The source slot whose link could not be confirmed.
        slot: SlotId,
        /// How the appointment id was obtained.
        resolution: Resolution,
    },
    /// A shift magnitude was zero or negative.
    InvalidMagnitude {
        /// The rejected magnitude.
        magnitude: i64,
    },
    /// A shift was requested without a reason.
    MissingReason,
    /// A shift was requested without an acting user.
    MissingActor,
    /// A referenced schedule does not exist.
    ScheduleNotFound(ScheduleId),
    /// A referenced slot does not exist in its schedule.
    SlotNotFound {
        /// The schedule that was searched.
        schedule: ScheduleId,
        /// The missing slot.
        slot: SlotId,
    },
    /// A UI slot key could not be decoded.
    InvalidSlotKey(String),
    /// A deletion date range ends before it starts.
    InvalidDateRange {
        /// Range start (inclusive).
        from: time::Date,
        /// Range end (inclusive).
        to: time::Date,
    },
    /// A deletion time window is empty or inverted.
    InvalidTimeRange {
        /// Window start.
        start: time::Time,
        /// Window end.
        end: time::Time,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// A slot ends at or before its start.
    InvalidSlotRange {
        /// The malformed slot.
        slot: SlotId,
    },
    /// A schedule's planning window ends before it starts.
    InvalidPlanningWindow {
        /// The malformed schedule.
        schedule: ScheduleId,
    },
    /// A slot lies outside its schedule's planning window.
    SlotOutOfBounds {
        /// The schedule.
        schedule: ScheduleId,
        /// The offending slot.
        slot: SlotId,
    },
    /// Two slots of one schedule overlap.
    OverlappingSlots {
        /// The schedule.
        schedule: ScheduleId,
        /// The earlier slot.
        first: SlotId,
        /// The slot overlapping it.
        second: SlotId,
    },
    /// Slots are not ordered by start time.
    SlotsOutOfOrder {
        /// The schedule.
        schedule: ScheduleId,
        /// The first slot found out of order.
        slot: SlotId,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoOpTransfer { slot } => {
                write!(f, "Slot '{slot}' cannot be transferred onto itself")
            }
            Self::TargetOccupied { slot } => {
                write!(f, "Cannot drop on an occupied slot ('{slot}')")
            }
            Self::SourceNotMovable { slot } => {
                write!(f, "Slot '{slot}' is free and has no appointment to move")
            }
            Self::UnconfirmedAppointmentLink { slot, resolution } => {
                write!(
                    f,
                    "Appointment link for slot '{slot}' could not be confirmed (resolved via {resolution})"
                )
            }
            Self::InvalidMagnitude { magnitude } => {
                write!(
                    f,
                    "Invalid shift magnitude: {magnitude}. Must be greater than 0"
                )
            }
            Self::MissingReason => write!(f, "A reason is required for schedule shifts"),
            Self::MissingActor => write!(f, "An acting user is required for schedule shifts"),
            Self::ScheduleNotFound(id) => write!(f, "Schedule '{id}' not found"),
            Self::SlotNotFound { schedule, slot } => {
                write!(f, "Slot '{slot}' not found in schedule '{schedule}'")
            }
            Self::InvalidSlotKey(key) => {
                write!(
                    f,
                    "Invalid slot key '{key}': expected practitioner:schedule:slot"
                )
            }
            Self::InvalidDateRange { from, to } => {
                write!(f, "Invalid date range: {from} is after {to}")
            }
            Self::InvalidTimeRange { start, end } => {
                write!(f, "Invalid time window: {end} is not after {start}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidSlotRange { slot } => {
                write!(f, "Slot '{slot}' must end after it starts")
            }
            Self::InvalidPlanningWindow { schedule } => {
                write!(
                    f,
                    "Schedule '{schedule}' planning window ends before it starts"
                )
            }
            Self::SlotOutOfBounds { schedule, slot } => {
                write!(
                    f,
                    "Slot '{slot}' lies outside the planning window of schedule '{schedule}'"
                )
            }
            Self::OverlappingSlots {
                schedule,
                first,
                second,
            } => {
                write!(
                    f,
                    "Slots '{first}' and '{second}' overlap in schedule '{schedule}'"
                )
            }
            Self::SlotsOutOfOrder { schedule, slot } => {
                write!(
                    f,
                    "Slot '{slot}' is out of start-time order in schedule '{schedule}'"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
