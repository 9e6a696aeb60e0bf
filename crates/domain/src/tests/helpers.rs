// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AppointmentId, PractitionerId, Schedule, ScheduleId, Slot, SlotId};
use time::macros::date;
use time::{Date, OffsetDateTime, Time};

pub const SCENARIO_DAY: Date = date!(2024 - 06 - 01);

pub fn at(day: Date, hour: u8, minute: u8) -> OffsetDateTime {
    day.with_time(Time::from_hms(hour, minute, 0).unwrap())
        .assume_utc()
}

pub fn free_slot(id: &str, day: Date, start: (u8, u8), end: (u8, u8)) -> Slot {
    Slot::free(
        SlotId::new(id),
        at(day, start.0, start.1),
        at(day, end.0, end.1),
    )
}

pub fn occupied_slot(
    id: &str,
    day: Date,
    start: (u8, u8),
    end: (u8, u8),
    appointment: &str,
) -> Slot {
    Slot::occupied(
        SlotId::new(id),
        at(day, start.0, start.1),
        at(day, end.0, end.1),
        AppointmentId::new(appointment),
    )
}

/// An empty 08:00-18:00 working block.
pub fn create_test_schedule(id: &str, practitioner: &str, day: Date) -> Schedule {
    Schedule::new(
        ScheduleId::new(id),
        PractitionerId::new(practitioner),
        &format!("Dr. {practitioner}"),
        at(day, 8, 0),
        at(day, 18, 0),
    )
}

/// `SCH1` for `P1` on 2024-06-01: 09:00-09:30 occupied by `A1`, 09:30-10:00 free.
pub fn scenario_schedule() -> Schedule {
    create_test_schedule("SCH1", "P1", SCENARIO_DAY).with_slots(vec![
        occupied_slot("slot1", SCENARIO_DAY, (9, 0), (9, 30), "A1"),
        free_slot("slot2", SCENARIO_DAY, (9, 30), (10, 0)),
    ])
}
