// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{DAY_TWO, at, create_test_book, key};
use crate::{ScheduleBook, validate_fetched};
use slotshift_domain::{DomainError, PractitionerId, Schedule, ScheduleId, Slot, SlotId};

#[test]
fn test_find_slot_requires_matching_practitioner() {
    let book: ScheduleBook = create_test_book();

    assert!(book.find_slot(&key("P1", "SCH1", "slot1")).is_some());
    assert!(book.find_slot(&key("P2", "SCH1", "slot1")).is_none());
}

#[test]
fn test_schedules_for_practitioner() {
    let book: ScheduleBook = create_test_book();

    let schedules: Vec<&Schedule> = book.schedules_for(&PractitionerId::new("P2"));

    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0].id, ScheduleId::new("SCH2"));
    assert_eq!(book.practitioners().len(), 2);
}

#[test]
fn test_replace_practitioner_is_not_a_merge() {
    let mut book: ScheduleBook = create_test_book();
    let fetched: Vec<Schedule> = vec![
        Schedule::new(
            ScheduleId::new("SCH5"),
            PractitionerId::new("P2"),
            "Dr. Baker",
            at(DAY_TWO, 8, 0),
            at(DAY_TWO, 12, 0),
        )
        .with_slots(vec![Slot::free(
            SlotId::new("slot9"),
            at(DAY_TWO, 8, 0),
            at(DAY_TWO, 8, 30),
        )]),
    ];

    book.replace_practitioner(&PractitionerId::new("P2"), fetched.clone());

    let cached: Vec<Schedule> = book
        .schedules_for(&PractitionerId::new("P2"))
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(cached, fetched);
    assert!(book.find_schedule(&ScheduleId::new("SCH2")).is_none());
    assert!(book.find_schedule(&ScheduleId::new("SCH1")).is_some());
}

#[test]
fn test_replace_practitioner_keeps_book_order() {
    let mut book: ScheduleBook = create_test_book();
    let before: Vec<Schedule> = book.schedules().to_vec();
    let mut refetched: Schedule = before[0].clone();
    refetched.slots[1].comment = Some(String::from("held for follow-up"));

    book.replace_practitioner(&PractitionerId::new("P1"), vec![refetched.clone()]);

    assert_eq!(book.schedules(), &[refetched, before[1].clone()]);
}

#[test]
fn test_replace_unknown_practitioner_appends() {
    let mut book: ScheduleBook = create_test_book();
    let fetched: Schedule = Schedule::new(
        ScheduleId::new("SCH7"),
        PractitionerId::new("P3"),
        "Dr. Chen",
        at(DAY_TWO, 8, 0),
        at(DAY_TWO, 12, 0),
    );

    book.replace_practitioner(&PractitionerId::new("P3"), vec![fetched.clone()]);

    assert_eq!(book.len(), 3);
    assert_eq!(book.schedules()[2], fetched);
}

#[test]
fn test_replace_practitioner_with_nothing_drops_schedules() {
    let mut book: ScheduleBook = create_test_book();

    book.replace_practitioner(&PractitionerId::new("P1"), Vec::new());

    assert_eq!(book.len(), 1);
    assert!(book.schedules_for(&PractitionerId::new("P1")).is_empty());
}

#[test]
fn test_empty_book_snapshot() {
    let book: ScheduleBook = ScheduleBook::new();

    assert!(book.is_empty());
    assert_eq!(
        book.to_snapshot().data,
        "schedules=0,slots=0,occupied=0,available=0"
    );
}

#[test]
fn test_validate_fetched_rejects_overlapping_slots() {
    let overlapping: Schedule = Schedule::new(
        ScheduleId::new("SCH5"),
        PractitionerId::new("P2"),
        "Dr. Baker",
        at(DAY_TWO, 8, 0),
        at(DAY_TWO, 12, 0),
    )
    .with_slots(vec![
        Slot::free(SlotId::new("a"), at(DAY_TWO, 9, 0), at(DAY_TWO, 9, 30)),
        Slot::free(SlotId::new("b"), at(DAY_TWO, 9, 15), at(DAY_TWO, 9, 45)),
    ]);

    let result: Result<(), DomainError> = validate_fetched(&[overlapping]);

    assert!(matches!(result, Err(DomainError::OverlappingSlots { .. })));
    assert!(validate_fetched(create_test_book().schedules()).is_ok());
}
