// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{InMemoryScheduleService, ReconcilerConfig, Reconciler, ScheduleService, ServiceError};
use async_trait::async_trait;
use slotshift_audit::{Actor, Cause};
use slotshift_domain::{
    AppointmentId, PractitionerId, Schedule, ScheduleId, ShiftMode, ShiftRequest, Slot, SlotId,
    SlotKey,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use time::macros::date;
use time::{Date, OffsetDateTime, Time};

pub const DAY_ONE: Date = date!(2024 - 06 - 01);
pub const DAY_TWO: Date = date!(2024 - 06 - 02);

pub fn at(day: Date, hour: u8, minute: u8) -> OffsetDateTime {
    day.with_time(Time::from_hms(hour, minute, 0).unwrap())
        .assume_utc()
}

pub fn p1() -> PractitionerId {
    PractitionerId::new("P1")
}

pub fn p2() -> PractitionerId {
    PractitionerId::new("P2")
}

pub fn key(practitioner: &str, schedule: &str, slot: &str) -> SlotKey {
    SlotKey::new(
        PractitionerId::new(practitioner),
        ScheduleId::new(schedule),
        SlotId::new(slot),
    )
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Dashboard action"))
}

/// `SCH1` for `P1` on day one: `slot1` 09:00-09:30 occupied by `A1`,
/// `slot2` 09:30-10:00 free.
pub fn schedule_one() -> Schedule {
    Schedule::new(
        ScheduleId::new("SCH1"),
        p1(),
        "Dr. Adams",
        at(DAY_ONE, 8, 0),
        at(DAY_ONE, 18, 0),
    )
    .with_slots(vec![
        Slot::occupied(
            SlotId::new("slot1"),
            at(DAY_ONE, 9, 0),
            at(DAY_ONE, 9, 30),
            AppointmentId::new("A1"),
        ),
        Slot::free(SlotId::new("slot2"), at(DAY_ONE, 9, 30), at(DAY_ONE, 10, 0)),
    ])
}

/// `SCH2` for `P2` on day two: `slot3` 10:00-10:30 free,
/// `slot4` 10:30-11:00 occupied by `A2`.
pub fn schedule_two() -> Schedule {
    Schedule::new(
        ScheduleId::new("SCH2"),
        p2(),
        "Dr. Baker",
        at(DAY_TWO, 8, 0),
        at(DAY_TWO, 18, 0),
    )
    .with_slots(vec![
        Slot::free(SlotId::new("slot3"), at(DAY_TWO, 10, 0), at(DAY_TWO, 10, 30)),
        Slot::occupied(
            SlotId::new("slot4"),
            at(DAY_TWO, 10, 30),
            at(DAY_TWO, 11, 0),
            AppointmentId::new("A2"),
        ),
    ])
}

pub fn server_schedules() -> Vec<Schedule> {
    vec![schedule_one(), schedule_two()]
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

pub fn create_test_reconciler(
    config: ReconcilerConfig,
) -> (Reconciler, Arc<InMemoryScheduleService>) {
    let service: Arc<InMemoryScheduleService> =
        Arc::new(InMemoryScheduleService::new(server_schedules()));
    let shared: Arc<dyn ScheduleService> = Arc::clone(&service) as Arc<dyn ScheduleService>;
    (Reconciler::new(shared, config), service)
}

/// A reconciler with both practitioners loaded.
pub async fn create_loaded_reconciler() -> (Reconciler, Arc<InMemoryScheduleService>) {
    let (reconciler, service) = create_test_reconciler(ReconcilerConfig::default());
    reconciler.load(&p1()).await.unwrap();
    reconciler.load(&p2()).await.unwrap();
    (reconciler, service)
}

/// The service's schedules for one practitioner.
pub async fn server_view(
    service: &InMemoryScheduleService,
    practitioner: &PractitionerId,
) -> Vec<Schedule> {
    service
        .schedules()
        .await
        .into_iter()
        .filter(|schedule| &schedule.practitioner_id == practitioner)
        .collect()
}

/// The reconciler's cached schedules for one practitioner.
pub async fn cached_view(reconciler: &Reconciler, practitioner: &PractitionerId) -> Vec<Schedule> {
    reconciler
        .snapshot()
        .await
        .schedules_for(practitioner)
        .into_iter()
        .cloned()
        .collect()
}

/// Wraps the in-memory service so that one fetch can be held open after it
/// has read the server state.
pub struct StallingService {
    pub inner: Arc<InMemoryScheduleService>,
    stall_next: AtomicBool,
    pub fetched: Notify,
    pub release: Notify,
}

impl StallingService {
    pub fn new(inner: Arc<InMemoryScheduleService>) -> Self {
        Self {
            inner,
            stall_next: AtomicBool::new(false),
            fetched: Notify::new(),
            release: Notify::new(),
        }
    }

    /// The next fetch reads its data, signals `fetched` and then waits for
    /// `release` before returning.
    pub fn stall_next_fetch(&self) {
        self.stall_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ScheduleService for StallingService {
    async fn fetch_schedules(
        &self,
        practitioner: &PractitionerId,
    ) -> Result<Vec<Schedule>, ServiceError> {
        let result: Result<Vec<Schedule>, ServiceError> =
            self.inner.fetch_schedules(practitioner).await;
        if self.stall_next.swap(false, Ordering::SeqCst) {
            self.fetched.notify_one();
            self.release.notified().await;
        }
        result
    }

    async fn commit_transfer(
        &self,
        appointment_id: &AppointmentId,
        new_slot_id: &SlotId,
    ) -> Result<(), ServiceError> {
        self.inner.commit_transfer(appointment_id, new_slot_id).await
    }

    async fn commit_minute_shift(
        &self,
        schedule_id: &ScheduleId,
        minutes: i64,
        reason: &str,
        actor_id: &str,
    ) -> Result<(), ServiceError> {
        self.inner
            .commit_minute_shift(schedule_id, minutes, reason, actor_id)
            .await
    }

    async fn commit_day_shift(
        &self,
        schedule_id: &ScheduleId,
        days: i64,
        reason: &str,
        actor_id: &str,
    ) -> Result<(), ServiceError> {
        self.inner
            .commit_day_shift(schedule_id, days, reason, actor_id)
            .await
    }

    async fn commit_schedule_deletion(
        &self,
        schedule_ids: &[ScheduleId],
    ) -> Result<(), ServiceError> {
        self.inner.commit_schedule_deletion(schedule_ids).await
    }

    async fn commit_slot_deletion(&self, slot_ids: &[SlotId]) -> Result<(), ServiceError> {
        self.inner.commit_slot_deletion(slot_ids).await
    }
}
