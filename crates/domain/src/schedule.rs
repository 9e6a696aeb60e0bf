// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Practitioner schedules and their bookable slots.
//!
//! A [`Schedule`] is one practitioner's working block on one calendar day.
//! It owns an ordered sequence of [`Slot`]s. The calendar date of a schedule
//! is the date of its `planning_start` in the offset carried by that
//! timestamp, which is the practitioner's local offset.
//!
//! ## Invariants
//!
//! - Slots are ordered by `start` ascending
//! - Every slot `[start, end)` lies inside `[planning_start, planning_end]`
//! - Slots never overlap
//!
//! See [`crate::validate_schedule`] for the checks.

use crate::types::{AppointmentId, AppointmentLink, PractitionerId, ScheduleId, SlotId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{Date, Duration, OffsetDateTime};

/// One bookable unit of time within a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot identifier, stable across shifts.
    pub id: SlotId,
    /// Slot start.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// Slot end (exclusive).
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
    /// `true` when the slot is occupied by an appointment.
    ///
    /// Occupied slots are the only ones that can be dragged; free slots are
    /// the only valid drop targets.
    #[serde(default)]
    pub overbooked: bool,
    /// Free-text annotation. Legacy data stores appointment references here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Structured appointment links, when the service provides them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointments: Option<Vec<AppointmentLink>>,
}

impl Slot {
    /// Creates a free slot.
    #[must_use]
    pub const fn free(id: SlotId, start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self {
            id,
            start,
            end,
            overbooked: false,
            comment: None,
            appointments: None,
        }
    }

    /// Creates an occupied slot linked to `appointment`.
    #[must_use]
    pub fn occupied(
        id: SlotId,
        start: OffsetDateTime,
        end: OffsetDateTime,
        appointment: AppointmentId,
    ) -> Self {
        Self {
            id,
            start,
            end,
            overbooked: true,
            comment: None,
            appointments: Some(vec![AppointmentLink::new(appointment)]),
        }
    }

    /// Returns this slot with the given comment.
    #[must_use]
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Slot length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether the slot carries an appointment that can be moved elsewhere.
    #[must_use]
    pub const fn is_movable(&self) -> bool {
        self.overbooked
    }

    /// Whether an appointment can be dropped onto this slot.
    #[must_use]
    pub const fn is_drop_target(&self) -> bool {
        !self.overbooked
    }

    /// The first structured appointment link, if any.
    #[must_use]
    pub fn linked_appointment(&self) -> Option<&AppointmentId> {
        self.appointments
            .as_ref()
            .and_then(|links| links.first())
            .map(|link| &link.id)
    }

    /// Frees the slot and drops every appointment reference it carried.
    pub fn release(&mut self) {
        self.overbooked = false;
        self.appointments = None;
        self.comment = None;
    }

    /// Occupies the slot with `appointment`.
    pub fn occupy(&mut self, appointment: AppointmentId) {
        self.overbooked = true;
        self.appointments = Some(vec![AppointmentLink::new(appointment)]);
    }
}

/// One practitioner's working block on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Schedule identifier.
    pub id: ScheduleId,
    /// Owner of the schedule.
    pub practitioner_id: PractitionerId,
    /// Display name of the owner, shown when confirming cross-practitioner moves.
    #[serde(default)]
    pub practitioner_name: String,
    /// Start of the working block.
    #[serde(with = "time::serde::rfc3339")]
    pub planning_start: OffsetDateTime,
    /// End of the working block.
    #[serde(with = "time::serde::rfc3339")]
    pub planning_end: OffsetDateTime,
    /// Slots ordered by start time. May be empty after deletions.
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl Schedule {
    /// Creates a schedule without slots.
    #[must_use]
    pub fn new(
        id: ScheduleId,
        practitioner_id: PractitionerId,
        practitioner_name: &str,
        planning_start: OffsetDateTime,
        planning_end: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            practitioner_id,
            practitioner_name: practitioner_name.to_string(),
            planning_start,
            planning_end,
            slots: Vec::new(),
        }
    }

    /// Returns this schedule with the given slots, sorted by start time.
    #[must_use]
    pub fn with_slots(mut self, mut slots: Vec<Slot>) -> Self {
        slots.sort_by_key(|slot| slot.start);
        self.slots = slots;
        self
    }

    /// Calendar date of the schedule in the practitioner's local offset.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.planning_start.date()
    }

    /// Looks up a slot by id.
    #[must_use]
    pub fn find_slot(&self, slot_id: &SlotId) -> Option<&Slot> {
        self.slots.iter().find(|slot| &slot.id == slot_id)
    }

    /// Looks up a slot by id for mutation.
    pub fn find_slot_mut(&mut self, slot_id: &SlotId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|slot| &slot.id == slot_id)
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.overbooked).count()
    }

    /// Number of free slots.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.slots.len() - self.occupied_count()
    }

    /// Occupied slots, which are the only ones a transfer can start from.
    pub fn movable_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|slot| slot.is_movable())
    }

    /// Free slots, which are the only valid transfer targets.
    pub fn drop_targets(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|slot| slot.is_drop_target())
    }
}

/// Returns the schedules whose planning start falls on `date`.
#[must_use]
pub fn slots_on_date(schedules: &[Schedule], date: Date) -> Vec<&Schedule> {
    schedules
        .iter()
        .filter(|schedule| schedule.date() == date)
        .collect()
}

/// Ids of the schedules on `date`, in input order.
///
/// This is the scope of a per-date shift action.
#[must_use]
pub fn schedule_ids_on_date(schedules: &[Schedule], date: Date) -> Vec<ScheduleId> {
    slots_on_date(schedules, date)
        .into_iter()
        .map(|schedule| schedule.id.clone())
        .collect()
}

/// Groups schedules by calendar date, earliest date first.
#[must_use]
pub fn group_by_date(schedules: &[Schedule]) -> BTreeMap<Date, Vec<&Schedule>> {
    let mut groups: BTreeMap<Date, Vec<&Schedule>> = BTreeMap::new();
    for schedule in schedules {
        groups.entry(schedule.date()).or_default().push(schedule);
    }
    groups
}

/// Total occupied slots across all schedules.
#[must_use]
pub fn total_occupied(schedules: &[Schedule]) -> usize {
    schedules.iter().map(Schedule::occupied_count).sum()
}

/// Total free slots across all schedules.
#[must_use]
pub fn total_available(schedules: &[Schedule]) -> usize {
    schedules.iter().map(Schedule::available_count).sum()
}
