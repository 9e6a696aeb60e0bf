// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod appointment_ref;
mod deletion;
mod error;
mod schedule;
mod shift;
mod transfer;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use appointment_ref::{Resolution, ResolvedAppointment, resolve_appointment_id};
pub use deletion::{
    ScheduleDeletionPlan, ScheduleSelection, SlotDeletionPlan, SlotSelection,
    plan_schedule_deletion, plan_slot_deletion,
};
pub use schedule::{
    Schedule, Slot, group_by_date, schedule_ids_on_date, slots_on_date, total_available,
    total_occupied,
};
pub use shift::{
    ShiftMode, ShiftRequest, shift_by_days, shift_by_minutes, shift_schedules, translate,
};
pub use transfer::{
    LinkPolicy, SlotContext, TransferPlan, apply_transfer, check_link_policy, validate_transfer,
};

// Re-export public types
pub use error::DomainError;
pub use types::{AppointmentId, AppointmentLink, PractitionerId, ScheduleId, SlotId, SlotKey};
pub use validation::{validate_schedule, validate_slot_range};
