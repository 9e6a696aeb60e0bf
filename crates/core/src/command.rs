// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use slotshift_domain::{ScheduleId, ScheduleSelection, ShiftMode, ShiftRequest, SlotKey, SlotSelection};

/// A command represents user intent as data only.
///
/// Commands are the only way to request schedule changes. They are checked
/// by [`crate::plan`] and, once accepted, applied by [`crate::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Move the appointment in `source` onto the free slot `target`.
    Transfer {
        /// The occupied slot being dragged.
        source: SlotKey,
        /// The free slot it is dropped on.
        target: SlotKey,
    },
    /// Shift a group of schedules by a number of minutes.
    ShiftMinutes {
        /// The shift request; its mode must be `time`.
        request: ShiftRequest,
    },
    /// Shift a group of schedules by a number of whole days.
    ShiftDays {
        /// The shift request; its mode must be `day`.
        request: ShiftRequest,
    },
    /// Delete whole schedules.
    DeleteSchedules {
        /// Which schedules to delete.
        selection: ScheduleSelection,
    },
    /// Delete slots inside one schedule.
    DeleteSlots {
        /// The schedule the slots belong to.
        schedule_id: ScheduleId,
        /// Which slots to delete.
        selection: SlotSelection,
    },
}

impl Command {
    /// Wraps a shift request in the command matching its mode.
    #[must_use]
    pub fn shift(request: ShiftRequest) -> Self {
        match request.mode {
            ShiftMode::Time => Self::ShiftMinutes { request },
            ShiftMode::Day => Self::ShiftDays { request },
        }
    }
}
