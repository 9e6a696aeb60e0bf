// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-memory schedule service.
//!
//! Applies commits with the same domain rules the planner uses, records
//! every command it receives, and can be told to fail the next call.

use crate::service::{ScheduleService, ServiceError};
use async_trait::async_trait;
use slotshift::ExternalCommand;
use slotshift_domain::{
    AppointmentId, DomainError, PractitionerId, Schedule, ScheduleId, ShiftMode, ShiftRequest,
    Slot, SlotId, resolve_appointment_id, shift_schedules,
};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Store {
    schedules: Vec<Schedule>,
    received: Vec<ExternalCommand>,
    fail_next_commit: Option<ServiceError>,
    fail_next_fetch: Option<ServiceError>,
    fetch_count: usize,
}

/// A [`ScheduleService`] holding its schedules in memory.
#[derive(Debug, Default)]
pub struct InMemoryScheduleService {
    store: Mutex<Store>,
}

impl InMemoryScheduleService {
    /// Creates a service holding `schedules`.
    #[must_use]
    pub fn new(schedules: Vec<Schedule>) -> Self {
        Self {
            store: Mutex::new(Store {
                schedules,
                ..Store::default()
            }),
        }
    }

    /// The service's current schedules.
    pub async fn schedules(&self) -> Vec<Schedule> {
        self.store.lock().await.schedules.clone()
    }

    /// Replaces the service's schedules, as another client would.
    pub async fn set_schedules(&self, schedules: Vec<Schedule>) {
        self.store.lock().await.schedules = schedules;
    }

    /// Every commit received so far, failed ones included, in arrival order.
    pub async fn received(&self) -> Vec<ExternalCommand> {
        self.store.lock().await.received.clone()
    }

    /// Number of fetches served or refused so far.
    pub async fn fetch_count(&self) -> usize {
        self.store.lock().await.fetch_count
    }

    /// Makes the next commit call fail with `error`.
    pub async fn fail_next_commit(&self, error: ServiceError) {
        self.store.lock().await.fail_next_commit = Some(error);
    }

    /// Makes the next fetch call fail with `error`.
    pub async fn fail_next_fetch(&self, error: ServiceError) {
        self.store.lock().await.fail_next_fetch = Some(error);
    }

    async fn commit(
        &self,
        command: ExternalCommand,
        mutate: impl FnOnce(&mut Vec<Schedule>) -> Result<(), ServiceError> + Send,
    ) -> Result<(), ServiceError> {
        let mut store = self.store.lock().await;
        store.received.push(command);
        if let Some(error) = store.fail_next_commit.take() {
            return Err(error);
        }
        // Work on a copy so a refused commit leaves nothing half-applied
        let mut schedules: Vec<Schedule> = store.schedules.clone();
        mutate(&mut schedules)?;
        store.schedules = schedules;
        Ok(())
    }

    async fn shift(
        &self,
        command: ExternalCommand,
        request: ShiftRequest,
    ) -> Result<(), ServiceError> {
        self.commit(command, move |schedules| {
            let shifted: Vec<Schedule> = shift_schedules(schedules, &request).map_err(reject)?;
            for replacement in shifted {
                if let Some(existing) = schedules
                    .iter_mut()
                    .find(|schedule| schedule.id == replacement.id)
                {
                    *existing = replacement;
                }
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ScheduleService for InMemoryScheduleService {
    async fn fetch_schedules(
        &self,
        practitioner: &PractitionerId,
    ) -> Result<Vec<Schedule>, ServiceError> {
        let mut store = self.store.lock().await;
        store.fetch_count += 1;
        if let Some(error) = store.fail_next_fetch.take() {
            return Err(error);
        }
        Ok(store
            .schedules
            .iter()
            .filter(|schedule| &schedule.practitioner_id == practitioner)
            .cloned()
            .collect())
    }

    async fn commit_transfer(
        &self,
        appointment_id: &AppointmentId,
        new_slot_id: &SlotId,
    ) -> Result<(), ServiceError> {
        let command: ExternalCommand = ExternalCommand::CommitTransfer {
            appointment_id: appointment_id.clone(),
            new_slot_id: new_slot_id.clone(),
        };
        self.commit(command, |schedules| {
            let source: (usize, usize) = position(schedules, |slot| {
                slot.is_movable() && &resolve_appointment_id(slot).id == appointment_id
            })
            .ok_or_else(|| ServiceError::NotFound(format!("appointment '{appointment_id}'")))?;
            let target: (usize, usize) = position(schedules, |slot| &slot.id == new_slot_id)
                .ok_or_else(|| ServiceError::NotFound(format!("slot '{new_slot_id}'")))?;

            // Rule: the service enforces the same occupancy rule as the planner
            if !schedules[target.0].slots[target.1].is_drop_target() {
                return Err(reject(DomainError::TargetOccupied {
                    slot: new_slot_id.clone(),
                }));
            }

            schedules[source.0].slots[source.1].release();
            schedules[target.0].slots[target.1].occupy(appointment_id.clone());
            Ok(())
        })
        .await
    }

    async fn commit_minute_shift(
        &self,
        schedule_id: &ScheduleId,
        minutes: i64,
        reason: &str,
        actor_id: &str,
    ) -> Result<(), ServiceError> {
        let command: ExternalCommand = ExternalCommand::CommitMinuteShift {
            schedule_id: schedule_id.clone(),
            minutes,
            reason: reason.to_string(),
            actor_id: actor_id.to_string(),
        };
        let request: ShiftRequest =
            single_shift(schedule_id, ShiftMode::Time, minutes, reason, actor_id);
        self.shift(command, request).await
    }

    async fn commit_day_shift(
        &self,
        schedule_id: &ScheduleId,
        days: i64,
        reason: &str,
        actor_id: &str,
    ) -> Result<(), ServiceError> {
        let command: ExternalCommand = ExternalCommand::CommitDayShift {
            schedule_id: schedule_id.clone(),
            days,
            reason: reason.to_string(),
            actor_id: actor_id.to_string(),
        };
        let request: ShiftRequest = single_shift(schedule_id, ShiftMode::Day, days, reason, actor_id);
        self.shift(command, request).await
    }

    async fn commit_schedule_deletion(
        &self,
        schedule_ids: &[ScheduleId],
    ) -> Result<(), ServiceError> {
        let command: ExternalCommand = ExternalCommand::CommitScheduleDeletion {
            schedule_ids: schedule_ids.to_vec(),
        };
        self.commit(command, |schedules| {
            if let Some(missing) = schedule_ids
                .iter()
                .find(|id| !schedules.iter().any(|schedule| &schedule.id == *id))
            {
                return Err(ServiceError::NotFound(format!("schedule '{missing}'")));
            }
            schedules.retain(|schedule| !schedule_ids.contains(&schedule.id));
            Ok(())
        })
        .await
    }

    async fn commit_slot_deletion(&self, slot_ids: &[SlotId]) -> Result<(), ServiceError> {
        let command: ExternalCommand = ExternalCommand::CommitSlotDeletion {
            slot_ids: slot_ids.to_vec(),
        };
        self.commit(command, |schedules| {
            let mut owners: Vec<usize> = Vec::with_capacity(slot_ids.len());
            for slot_id in slot_ids {
                let matches: Vec<usize> = schedules
                    .iter()
                    .enumerate()
                    .filter(|(_, schedule)| schedule.find_slot(slot_id).is_some())
                    .map(|(index, _)| index)
                    .collect();
                // Rule: slot ids are only unique within one schedule
                match matches.as_slice() {
                    [] => return Err(ServiceError::NotFound(format!("slot '{slot_id}'"))),
                    [owner] => owners.push(*owner),
                    _ => {
                        return Err(ServiceError::Rejected(format!(
                            "slot '{slot_id}' exists in {} schedules",
                            matches.len()
                        )));
                    }
                }
            }
            for (slot_id, owner) in slot_ids.iter().zip(owners) {
                schedules[owner].slots.retain(|slot| &slot.id != slot_id);
            }
            Ok(())
        })
        .await
    }
}

fn position(
    schedules: &[Schedule],
    predicate: impl Fn(&Slot) -> bool,
) -> Option<(usize, usize)> {
    schedules.iter().enumerate().find_map(|(index, schedule)| {
        schedule
            .slots
            .iter()
            .position(&predicate)
            .map(|slot| (index, slot))
    })
}

fn single_shift(
    schedule_id: &ScheduleId,
    mode: ShiftMode,
    magnitude: i64,
    reason: &str,
    actor_id: &str,
) -> ShiftRequest {
    ShiftRequest {
        schedule_ids: vec![schedule_id.clone()],
        mode,
        magnitude,
        reason: reason.to_string(),
        actor_id: actor_id.to_string(),
    }
}

fn reject(err: DomainError) -> ServiceError {
    match err {
        DomainError::ScheduleNotFound(id) => ServiceError::NotFound(format!("schedule '{id}'")),
        other => ServiceError::Rejected(other.to_string()),
    }
}
