// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{DAY_ONE, at, p1, schedule_one, schedule_two, server_schedules};
use crate::{InMemoryScheduleService, ScheduleService, ServiceError, execute};
use slotshift::ExternalCommand;
use slotshift_domain::{AppointmentId, Schedule, ScheduleId, SlotId};

#[tokio::test]
async fn test_fetch_returns_only_the_practitioner_schedules() {
    let service: InMemoryScheduleService = InMemoryScheduleService::new(server_schedules());

    let fetched: Vec<Schedule> = service.fetch_schedules(&p1()).await.unwrap();

    assert_eq!(fetched, vec![schedule_one()]);
    assert_eq!(service.fetch_count().await, 1);
}

#[tokio::test]
async fn test_transfer_onto_occupied_slot_is_refused() {
    let service: InMemoryScheduleService = InMemoryScheduleService::new(server_schedules());

    let result: Result<(), ServiceError> = service
        .commit_transfer(&AppointmentId::new("A1"), &SlotId::new("slot4"))
        .await;

    assert_eq!(
        result,
        Err(ServiceError::Rejected(String::from(
            "Cannot drop on an occupied slot ('slot4')"
        )))
    );
    assert_eq!(service.schedules().await, server_schedules());
}

#[tokio::test]
async fn test_transfer_of_unknown_appointment_is_not_found() {
    let service: InMemoryScheduleService = InMemoryScheduleService::new(server_schedules());

    let result: Result<(), ServiceError> = service
        .commit_transfer(&AppointmentId::new("A9"), &SlotId::new("slot2"))
        .await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_transfer_finds_appointment_from_comment_label() {
    let mut legacy: Schedule = schedule_one();
    legacy.slots[0].appointments = None;
    legacy.slots[0].comment = Some(String::from("Appointment ID: A1"));
    let service: InMemoryScheduleService = InMemoryScheduleService::new(vec![legacy]);

    service
        .commit_transfer(&AppointmentId::new("A1"), &SlotId::new("slot2"))
        .await
        .unwrap();

    let schedules: Vec<Schedule> = service.schedules().await;
    assert!(!schedules[0].slots[0].overbooked);
    assert_eq!(schedules[0].slots[0].comment, None);
    assert_eq!(
        schedules[0].slots[1].linked_appointment(),
        Some(&AppointmentId::new("A1"))
    );
}

#[tokio::test]
async fn test_injected_failure_applies_once_and_is_logged() {
    let service: InMemoryScheduleService = InMemoryScheduleService::new(server_schedules());
    service
        .fail_next_commit(ServiceError::Unavailable(String::from("timeout")))
        .await;
    let command: ExternalCommand = ExternalCommand::CommitScheduleDeletion {
        schedule_ids: vec![ScheduleId::new("SCH2")],
    };

    let first: Result<(), ServiceError> = execute(&service, &command).await;
    let second: Result<(), ServiceError> = execute(&service, &command).await;

    assert!(first.is_err());
    assert!(second.is_ok());
    assert_eq!(service.received().await, vec![command.clone(), command]);
    assert_eq!(service.schedules().await, vec![schedule_one()]);
}

#[tokio::test]
async fn test_minute_shift_requires_reason() {
    let service: InMemoryScheduleService = InMemoryScheduleService::new(server_schedules());

    let result: Result<(), ServiceError> = service
        .commit_minute_shift(&ScheduleId::new("SCH1"), 15, "  ", "admin-123")
        .await;

    assert!(matches!(result, Err(ServiceError::Rejected(_))));
}

#[tokio::test]
async fn test_minute_shift_moves_one_schedule() {
    let service: InMemoryScheduleService = InMemoryScheduleService::new(server_schedules());

    service
        .commit_minute_shift(&ScheduleId::new("SCH1"), 15, "Late start", "admin-123")
        .await
        .unwrap();

    let schedules: Vec<Schedule> = service.schedules().await;
    assert_eq!(schedules[0].slots[0].start, at(DAY_ONE, 9, 15));
    assert_eq!(schedules[1], schedule_two());
}

#[tokio::test]
async fn test_day_shift_of_unknown_schedule_is_not_found() {
    let service: InMemoryScheduleService = InMemoryScheduleService::new(server_schedules());

    let result: Result<(), ServiceError> = service
        .commit_day_shift(&ScheduleId::new("SCH9"), 1, "Holiday", "admin-123")
        .await;

    assert_eq!(
        result,
        Err(ServiceError::NotFound(String::from("schedule 'SCH9'")))
    );
}

#[tokio::test]
async fn test_slot_deletion_removes_slots_across_schedules() {
    let service: InMemoryScheduleService = InMemoryScheduleService::new(server_schedules());

    service
        .commit_slot_deletion(&[SlotId::new("slot2"), SlotId::new("slot3")])
        .await
        .unwrap();

    let schedules: Vec<Schedule> = service.schedules().await;
    assert_eq!(schedules[0].slots.len(), 1);
    assert_eq!(schedules[1].slots.len(), 1);
}

#[tokio::test]
async fn test_slot_deletion_with_unknown_slot_changes_nothing() {
    let service: InMemoryScheduleService = InMemoryScheduleService::new(server_schedules());

    let result: Result<(), ServiceError> = service
        .commit_slot_deletion(&[SlotId::new("slot2"), SlotId::new("slot9")])
        .await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
    assert_eq!(service.schedules().await, server_schedules());
}

#[tokio::test]
async fn test_slot_deletion_refuses_ids_shared_by_two_schedules() {
    let mut second: Schedule = schedule_two();
    second.slots[0].id = SlotId::new("slot2");
    let shared: Vec<Schedule> = vec![schedule_one(), second];
    let service: InMemoryScheduleService = InMemoryScheduleService::new(shared.clone());

    let result: Result<(), ServiceError> = service.commit_slot_deletion(&[SlotId::new("slot2")]).await;

    assert_eq!(
        result,
        Err(ServiceError::Rejected(String::from(
            "slot 'slot2' exists in 2 schedules"
        )))
    );
    assert_eq!(service.schedules().await, shared);
}
