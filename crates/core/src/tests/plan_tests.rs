// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{DAY_ONE, DAY_TWO, create_test_book, key, shift_request};
use crate::{Command, CoreError, Plan, ScheduleBook, plan};
use slotshift_domain::{
    AppointmentId, DomainError, LinkPolicy, PractitionerId, Resolution, ScheduleId,
    ScheduleSelection, ShiftMode, SlotId, SlotSelection,
};
use time::macros::time;

#[test]
fn test_transfer_plan_resolves_appointment() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::Transfer {
        source: key("P1", "SCH1", "slot1"),
        target: key("P1", "SCH1", "slot2"),
    };

    let result: Plan = plan(&book, &command, LinkPolicy::Proceed).unwrap();

    let Plan::Transfer { transfer } = result else {
        panic!("expected a transfer plan");
    };
    assert_eq!(transfer.appointment_id, AppointmentId::new("A1"));
    assert_eq!(transfer.resolution, Resolution::Structured);
    assert!(transfer.same_day);
    assert!(!transfer.is_cross_practitioner());
}

#[test]
fn test_transfer_onto_occupied_slot_is_rejected() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::Transfer {
        source: key("P1", "SCH1", "slot1"),
        target: key("P2", "SCH2", "slot4"),
    };

    let result: Result<Plan, CoreError> = plan(&book, &command, LinkPolicy::Proceed);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::TargetOccupied {
            slot: SlotId::new("slot4"),
        }))
    );
}

#[test]
fn test_cross_practitioner_transfer_names_both_practitioners() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::Transfer {
        source: key("P1", "SCH1", "slot1"),
        target: key("P2", "SCH2", "slot3"),
    };

    let result: Plan = plan(&book, &command, LinkPolicy::Proceed).unwrap();

    assert_eq!(
        result.practitioners(),
        vec![PractitionerId::new("P1"), PractitionerId::new("P2")]
    );
    let Plan::Transfer { transfer } = result else {
        panic!("expected a transfer plan");
    };
    assert!(!transfer.same_day);
    assert_eq!(
        transfer.confirmation_message(),
        "Move appointment A1 from Dr. Adams to Dr. Baker to a different day?"
    );
}

#[test]
fn test_transfer_with_unknown_slot_is_rejected() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::Transfer {
        source: key("P1", "SCH1", "slot9"),
        target: key("P1", "SCH1", "slot2"),
    };

    let result: Result<Plan, CoreError> = plan(&book, &command, LinkPolicy::Proceed);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::SlotNotFound {
            schedule: ScheduleId::new("SCH1"),
            slot: SlotId::new("slot9"),
        }))
    );
}

#[test]
fn test_transfer_with_unknown_schedule_is_rejected() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::Transfer {
        source: key("P1", "SCH9", "slot1"),
        target: key("P1", "SCH1", "slot2"),
    };

    let result: Result<Plan, CoreError> = plan(&book, &command, LinkPolicy::Proceed);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::ScheduleNotFound(
            ScheduleId::new("SCH9")
        )))
    );
}

#[test]
fn test_link_policy_is_enforced_when_planning() {
    let mut book: ScheduleBook = create_test_book();
    // Strip the structured link so only the slot id remains
    let mut schedules = book.schedules().to_vec();
    schedules[0].slots[0].appointments = None;
    book = ScheduleBook::from_schedules(schedules);
    let command: Command = Command::Transfer {
        source: key("P1", "SCH1", "slot1"),
        target: key("P1", "SCH1", "slot2"),
    };

    let strict: Result<Plan, CoreError> =
        plan(&book, &command, LinkPolicy::RejectSlotIdFallback);
    let lenient: Result<Plan, CoreError> = plan(&book, &command, LinkPolicy::Proceed);

    assert!(matches!(
        strict,
        Err(CoreError::DomainViolation(
            DomainError::UnconfirmedAppointmentLink { .. }
        ))
    ));
    let Ok(Plan::Transfer { transfer }) = lenient else {
        panic!("expected a transfer plan");
    };
    assert!(transfer.is_degraded());
    assert_eq!(transfer.appointment_id, AppointmentId::new("slot1"));
}

#[test]
fn test_shift_plan_previews_shifted_schedules() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::shift(shift_request(&["SCH1"], ShiftMode::Time, 15));

    let result: Plan = plan(&book, &command, LinkPolicy::Proceed).unwrap();

    let Plan::Shift { preview, .. } = &result else {
        panic!("expected a shift plan");
    };
    assert_eq!(preview.len(), 1);
    assert_eq!(
        preview[0].slots[0].start,
        book.schedules()[0].slots[0].start + time::Duration::minutes(15)
    );
    assert_eq!(result.practitioners(), vec![PractitionerId::new("P1")]);
    assert_eq!(result.name(), "ShiftMinutes");
}

#[test]
fn test_shift_mode_must_match_command() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::ShiftMinutes {
        request: shift_request(&["SCH1"], ShiftMode::Day, 1),
    };

    let result: Result<Plan, CoreError> = plan(&book, &command, LinkPolicy::Proceed);

    assert_eq!(
        result,
        Err(CoreError::ShiftModeMismatch {
            command: ShiftMode::Time,
            request: ShiftMode::Day,
        })
    );
}

#[test]
fn test_shift_with_zero_magnitude_is_rejected() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::shift(shift_request(&["SCH1"], ShiftMode::Day, 0));

    let result: Result<Plan, CoreError> = plan(&book, &command, LinkPolicy::Proceed);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidMagnitude {
            magnitude: 0
        }))
    );
}

#[test]
fn test_schedule_deletion_by_date_range() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::DeleteSchedules {
        selection: ScheduleSelection::DateRange {
            from: DAY_TWO,
            to: DAY_TWO,
        },
    };

    let result: Plan = plan(&book, &command, LinkPolicy::Proceed).unwrap();

    let Plan::DeleteSchedules { deletion } = &result else {
        panic!("expected a schedule deletion plan");
    };
    assert_eq!(deletion.schedule_ids(), vec![ScheduleId::new("SCH2")]);
    assert_eq!(deletion.slot_count, 2);
    assert_eq!(deletion.occupied_count, 1);
    assert_eq!(result.practitioners(), vec![PractitionerId::new("P2")]);
}

#[test]
fn test_schedule_deletion_with_unknown_id_is_rejected() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::DeleteSchedules {
        selection: ScheduleSelection::Ids {
            ids: vec![ScheduleId::new("SCH1"), ScheduleId::new("SCH7")],
        },
    };

    let result: Result<Plan, CoreError> = plan(&book, &command, LinkPolicy::Proceed);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::ScheduleNotFound(
            ScheduleId::new("SCH7")
        )))
    );
}

#[test]
fn test_empty_schedule_selection_is_rejected() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::DeleteSchedules {
        selection: ScheduleSelection::DateRange {
            from: DAY_ONE.previous_day().unwrap(),
            to: DAY_ONE.previous_day().unwrap(),
        },
    };

    let result: Result<Plan, CoreError> = plan(&book, &command, LinkPolicy::Proceed);

    assert_eq!(
        result,
        Err(CoreError::EmptySelection {
            target: "schedules"
        })
    );
}

#[test]
fn test_slot_deletion_by_time_range() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::DeleteSlots {
        schedule_id: ScheduleId::new("SCH1"),
        selection: SlotSelection::TimeRange {
            start: time!(9:00),
            end: time!(9:30),
        },
    };

    let result: Plan = plan(&book, &command, LinkPolicy::Proceed).unwrap();

    let Plan::DeleteSlots {
        practitioner_id,
        deletion,
    } = result
    else {
        panic!("expected a slot deletion plan");
    };
    assert_eq!(practitioner_id, PractitionerId::new("P1"));
    assert_eq!(deletion.slot_ids(), vec![SlotId::new("slot1")]);
    assert_eq!(deletion.occupied_count, 1);
}

#[test]
fn test_slot_deletion_in_unknown_schedule_is_rejected() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::DeleteSlots {
        schedule_id: ScheduleId::new("SCH7"),
        selection: SlotSelection::Ids {
            ids: vec![SlotId::new("slot1")],
        },
    };

    let result: Result<Plan, CoreError> = plan(&book, &command, LinkPolicy::Proceed);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::ScheduleNotFound(
            ScheduleId::new("SCH7")
        )))
    );
}

#[test]
fn test_empty_slot_window_is_rejected() {
    let book: ScheduleBook = create_test_book();
    let command: Command = Command::DeleteSlots {
        schedule_id: ScheduleId::new("SCH1"),
        selection: SlotSelection::TimeRange {
            start: time!(12:00),
            end: time!(13:00),
        },
    };

    let result: Result<Plan, CoreError> = plan(&book, &command, LinkPolicy::Proceed);

    assert_eq!(result, Err(CoreError::EmptySelection { target: "slots" }));
}
