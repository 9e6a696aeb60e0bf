// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk deletion planning.
//!
//! Planners are read-only. They work out exactly which schedules or slots a
//! selection covers and how much booked data would go with them, so the
//! caller can ask for confirmation before anything is removed.

use crate::error::DomainError;
use crate::schedule::{Schedule, Slot};
use crate::types::{ScheduleId, SlotId};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};

/// Which schedules to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleSelection {
    /// Explicit schedule ids.
    Ids {
        /// The selected ids.
        ids: Vec<ScheduleId>,
    },
    /// Every schedule whose date lies in `[from, to]`.
    DateRange {
        /// First date (inclusive).
        from: Date,
        /// Last date (inclusive).
        to: Date,
    },
}

/// Which slots of one schedule to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotSelection {
    /// Explicit slot ids.
    Ids {
        /// The selected ids.
        ids: Vec<SlotId>,
    },
    /// Every slot starting in `[start, end)` on the schedule's date.
    TimeRange {
        /// Window start (inclusive).
        start: Time,
        /// Window end (exclusive).
        end: Time,
    },
}

/// Outcome of planning a schedule deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDeletionPlan {
    /// Schedules that would be removed.
    pub to_delete: Vec<Schedule>,
    /// Number of schedules that would be removed.
    pub schedule_count: usize,
    /// Slots removed along with them.
    pub slot_count: usize,
    /// Occupied slots among `slot_count`.
    pub occupied_count: usize,
    /// Requested ids that matched no schedule.
    pub unmatched_ids: Vec<ScheduleId>,
}

impl ScheduleDeletionPlan {
    /// Ids of the schedules that would be removed.
    #[must_use]
    pub fn schedule_ids(&self) -> Vec<ScheduleId> {
        self.to_delete
            .iter()
            .map(|schedule| schedule.id.clone())
            .collect()
    }

    /// Whether booked appointments would be lost.
    #[must_use]
    pub const fn affects_appointments(&self) -> bool {
        self.occupied_count > 0
    }
}

/// Outcome of planning a slot deletion within one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDeletionPlan {
    /// Schedule the slots belong to.
    pub schedule_id: ScheduleId,
    /// Slots that would be removed.
    pub slots: Vec<Slot>,
    /// Number of slots that would be removed.
    pub slot_count: usize,
    /// Occupied slots among them.
    pub occupied_count: usize,
    /// Requested ids that matched no slot.
    pub unmatched_ids: Vec<SlotId>,
}

impl SlotDeletionPlan {
    /// Ids of the slots that would be removed.
    #[must_use]
    pub fn slot_ids(&self) -> Vec<SlotId> {
        self.slots.iter().map(|slot| slot.id.clone()).collect()
    }
}

/// Plans the deletion of whole schedules.
///
/// # Errors
///
/// Returns `InvalidDateRange` when a date range ends before it starts.
pub fn plan_schedule_deletion(
    schedules: &[Schedule],
    selection: &ScheduleSelection,
) -> Result<ScheduleDeletionPlan, DomainError> {
    let (to_delete, unmatched_ids): (Vec<Schedule>, Vec<ScheduleId>) = match selection {
        ScheduleSelection::Ids { ids } => {
            let to_delete: Vec<Schedule> = schedules
                .iter()
                .filter(|schedule| ids.contains(&schedule.id))
                .cloned()
                .collect();
            let unmatched: Vec<ScheduleId> = ids
                .iter()
                .filter(|id| !schedules.iter().any(|schedule| &schedule.id == *id))
                .cloned()
                .collect();
            (to_delete, unmatched)
        }
        ScheduleSelection::DateRange { from, to } => {
            if from > to {
                return Err(DomainError::InvalidDateRange {
                    from: *from,
                    to: *to,
                });
            }
            let to_delete: Vec<Schedule> = schedules
                .iter()
                .filter(|schedule| (*from..=*to).contains(&schedule.date()))
                .cloned()
                .collect();
            (to_delete, Vec::new())
        }
    };

    let slot_count: usize = to_delete.iter().map(|schedule| schedule.slots.len()).sum();
    let occupied_count: usize = to_delete.iter().map(Schedule::occupied_count).sum();

    Ok(ScheduleDeletionPlan {
        schedule_count: to_delete.len(),
        to_delete,
        slot_count,
        occupied_count,
        unmatched_ids,
    })
}

/// Plans the deletion of slots inside one schedule.
///
/// A time range is interpreted on the schedule's own date and offset.
///
/// # Errors
///
/// Returns `InvalidTimeRange` when the window is empty or inverted.
pub fn plan_slot_deletion(
    schedule: &Schedule,
    selection: &SlotSelection,
) -> Result<SlotDeletionPlan, DomainError> {
    let (slots, unmatched_ids): (Vec<Slot>, Vec<SlotId>) = match selection {
        SlotSelection::Ids { ids } => {
            let slots: Vec<Slot> = schedule
                .slots
                .iter()
                .filter(|slot| ids.contains(&slot.id))
                .cloned()
                .collect();
            let unmatched: Vec<SlotId> = ids
                .iter()
                .filter(|id| schedule.find_slot(id).is_none())
                .cloned()
                .collect();
            (slots, unmatched)
        }
        SlotSelection::TimeRange { start, end } => {
            if end <= start {
                return Err(DomainError::InvalidTimeRange {
                    start: *start,
                    end: *end,
                });
            }
            let window_start: OffsetDateTime = on_schedule_day(schedule, *start);
            let window_end: OffsetDateTime = on_schedule_day(schedule, *end);
            let slots: Vec<Slot> = schedule
                .slots
                .iter()
                .filter(|slot| slot.start >= window_start && slot.start < window_end)
                .cloned()
                .collect();
            (slots, Vec::new())
        }
    };

    let occupied_count: usize = slots.iter().filter(|slot| slot.overbooked).count();

    Ok(SlotDeletionPlan {
        schedule_id: schedule.id.clone(),
        slot_count: slots.len(),
        slots,
        occupied_count,
        unmatched_ids,
    })
}

fn on_schedule_day(schedule: &Schedule, time_of_day: Time) -> OffsetDateTime {
    schedule
        .date()
        .with_time(time_of_day)
        .assume_offset(schedule.planning_start.offset())
}
