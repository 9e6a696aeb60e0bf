// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ScheduleBook;
use slotshift_audit::{Actor, Cause};
use slotshift_domain::{
    AppointmentId, PractitionerId, Schedule, ScheduleId, ShiftMode, ShiftRequest, Slot, SlotId,
    SlotKey,
};
use time::macros::date;
use time::{Date, OffsetDateTime, Time};

pub const DAY_ONE: Date = date!(2024 - 06 - 01);
pub const DAY_TWO: Date = date!(2024 - 06 - 02);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Clinic opens late"))
}

pub fn at(day: Date, hour: u8, minute: u8) -> OffsetDateTime {
    day.with_time(Time::from_hms(hour, minute, 0).unwrap())
        .assume_utc()
}

pub fn key(practitioner: &str, schedule: &str, slot: &str) -> SlotKey {
    SlotKey::new(
        PractitionerId::new(practitioner),
        ScheduleId::new(schedule),
        SlotId::new(slot),
    )
}

fn schedule(id: &str, practitioner: &str, name: &str, day: Date, slots: Vec<Slot>) -> Schedule {
    Schedule::new(
        ScheduleId::new(id),
        PractitionerId::new(practitioner),
        name,
        at(day, 8, 0),
        at(day, 18, 0),
    )
    .with_slots(slots)
}

/// Two practitioners:
/// - `P1` / `SCH1` on day one: `slot1` 09:00-09:30 occupied by `A1`,
///   `slot2` 09:30-10:00 free
/// - `P2` / `SCH2` on day two: `slot3` 10:00-10:30 free,
///   `slot4` 10:30-11:00 occupied by `A2`
pub fn create_test_book() -> ScheduleBook {
    ScheduleBook::from_schedules(vec![
        schedule(
            "SCH1",
            "P1",
            "Dr. Adams",
            DAY_ONE,
            vec![
                Slot::occupied(
                    SlotId::new("slot1"),
                    at(DAY_ONE, 9, 0),
                    at(DAY_ONE, 9, 30),
                    AppointmentId::new("A1"),
                ),
                Slot::free(SlotId::new("slot2"), at(DAY_ONE, 9, 30), at(DAY_ONE, 10, 0)),
            ],
        ),
        schedule(
            "SCH2",
            "P2",
            "Dr. Baker",
            DAY_TWO,
            vec![
                Slot::free(SlotId::new("slot3"), at(DAY_TWO, 10, 0), at(DAY_TWO, 10, 30)),
                Slot::occupied(
                    SlotId::new("slot4"),
                    at(DAY_TWO, 10, 30),
                    at(DAY_TWO, 11, 0),
                    AppointmentId::new("A2"),
                ),
            ],
        ),
    ])
}

pub fn shift_request(schedules: &[&str], mode: ShiftMode, magnitude: i64) -> ShiftRequest {
    ShiftRequest {
        schedule_ids: schedules.iter().map(|id| ScheduleId::new(id)).collect(),
        mode,
        magnitude,
        reason: String::from("Clinic opens late"),
        actor_id: String::from("admin-123"),
    }
}
