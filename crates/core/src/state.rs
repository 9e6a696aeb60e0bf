// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::plan::ExternalCommand;
use serde::{Deserialize, Serialize};
use slotshift_audit::{AuditEvent, StateSnapshot};
use slotshift_domain::{
    PractitionerId, Schedule, ScheduleId, SlotContext, SlotKey, total_available, total_occupied,
};
use std::collections::BTreeSet;

/// The cached schedules of every loaded practitioner.
///
/// The book is a plain value: transitions never mutate it in place but
/// return a new book. The persistence service owns the real data; a book is
/// only ever a cache of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBook {
    schedules: Vec<Schedule>,
}

impl ScheduleBook {
    /// Creates an empty book.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            schedules: Vec::new(),
        }
    }

    /// Creates a book holding `schedules` in the given order.
    #[must_use]
    pub const fn from_schedules(schedules: Vec<Schedule>) -> Self {
        Self { schedules }
    }

    /// All cached schedules.
    #[must_use]
    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Mutable access for transitions inside this crate.
    pub(crate) const fn schedules_mut(&mut self) -> &mut Vec<Schedule> {
        &mut self.schedules
    }

    /// Number of cached schedules.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.schedules.len()
    }

    /// Whether no schedules are cached.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Practitioners with at least one cached schedule.
    #[must_use]
    pub fn practitioners(&self) -> BTreeSet<PractitionerId> {
        self.schedules
            .iter()
            .map(|schedule| schedule.practitioner_id.clone())
            .collect()
    }

    /// Schedules belonging to `practitioner`, in book order.
    #[must_use]
    pub fn schedules_for(&self, practitioner: &PractitionerId) -> Vec<&Schedule> {
        self.schedules
            .iter()
            .filter(|schedule| &schedule.practitioner_id == practitioner)
            .collect()
    }

    /// Looks up a schedule by id.
    #[must_use]
    pub fn find_schedule(&self, schedule_id: &ScheduleId) -> Option<&Schedule> {
        self.schedules
            .iter()
            .find(|schedule| &schedule.id == schedule_id)
    }

    /// Looks up the slot a key points at.
    ///
    /// The key's practitioner must own the schedule; a key naming the wrong
    /// practitioner finds nothing.
    #[must_use]
    pub fn find_slot(&self, key: &SlotKey) -> Option<SlotContext<'_>> {
        let schedule: &Schedule = self
            .find_schedule(&key.schedule_id)
            .filter(|schedule| schedule.practitioner_id == key.practitioner_id)?;
        schedule
            .find_slot(&key.slot_id)
            .map(|slot| SlotContext::new(schedule, slot))
    }

    /// Replaces every cached schedule of `practitioner` with `fetched`.
    ///
    /// This is a replacement, never a merge: schedules missing from
    /// `fetched` are dropped and the fetched versions are stored exactly, in
    /// the order given. They take the place of the practitioner's first
    /// cached schedule, so other practitioners keep their positions; a
    /// practitioner not cached yet is appended.
    pub fn replace_practitioner(&mut self, practitioner: &PractitionerId, fetched: Vec<Schedule>) {
        let first: Option<usize> = self
            .schedules
            .iter()
            .position(|schedule| &schedule.practitioner_id == practitioner);
        self.schedules
            .retain(|schedule| &schedule.practitioner_id != practitioner);
        match first {
            Some(index) => {
                self.schedules.splice(index..index, fetched);
            }
            None => self.schedules.extend(fetched),
        }
    }

    /// Converts the book to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let slot_count: usize = self
            .schedules
            .iter()
            .map(|schedule| schedule.slots.len())
            .sum();
        StateSnapshot::new(format!(
            "schedules={},slots={},occupied={},available={}",
            self.schedules.len(),
            slot_count,
            total_occupied(&self.schedules),
            total_available(&self.schedules)
        ))
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The optimistic book after the transition.
    pub new_book: ScheduleBook,
    /// Commands the persistence service must execute, in order.
    pub external_commands: Vec<ExternalCommand>,
    /// Practitioners whose schedules changed.
    pub practitioners: Vec<PractitionerId>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
