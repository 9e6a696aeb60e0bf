// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The persistence service boundary.
//!
//! The service owns schedules and appointments. Every call is a single-shot
//! request and response; the reconciler never retries.

use async_trait::async_trait;
use slotshift::ExternalCommand;
use slotshift_domain::{AppointmentId, PractitionerId, Schedule, ScheduleId, SlotId};
use thiserror::Error;

/// Errors reported by a schedule service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service refused the request.
    #[error("Rejected: {0}")]
    Rejected(String),
    /// An entity named in the request does not exist on the service.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The service could not be reached.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Authoritative schedule storage.
#[async_trait]
pub trait ScheduleService: Send + Sync {
    /// Fetches every schedule of `practitioner`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the fetch fails.
    async fn fetch_schedules(
        &self,
        practitioner: &PractitionerId,
    ) -> Result<Vec<Schedule>, ServiceError>;

    /// Moves an appointment to a new slot.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the move is refused.
    async fn commit_transfer(
        &self,
        appointment_id: &AppointmentId,
        new_slot_id: &SlotId,
    ) -> Result<(), ServiceError>;

    /// Shifts one schedule by `minutes`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the shift is refused.
    async fn commit_minute_shift(
        &self,
        schedule_id: &ScheduleId,
        minutes: i64,
        reason: &str,
        actor_id: &str,
    ) -> Result<(), ServiceError>;

    /// Shifts one schedule by `days`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the shift is refused.
    async fn commit_day_shift(
        &self,
        schedule_id: &ScheduleId,
        days: i64,
        reason: &str,
        actor_id: &str,
    ) -> Result<(), ServiceError>;

    /// Deletes whole schedules.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the deletion is refused.
    async fn commit_schedule_deletion(&self, schedule_ids: &[ScheduleId])
    -> Result<(), ServiceError>;

    /// Deletes individual slots.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the deletion is refused.
    async fn commit_slot_deletion(&self, slot_ids: &[SlotId]) -> Result<(), ServiceError>;
}

/// Issues one external command against `service`.
///
/// # Errors
///
/// Returns whatever error the service reports.
pub async fn execute(
    service: &dyn ScheduleService,
    command: &ExternalCommand,
) -> Result<(), ServiceError> {
    match command {
        ExternalCommand::CommitTransfer {
            appointment_id,
            new_slot_id,
        } => service.commit_transfer(appointment_id, new_slot_id).await,
        ExternalCommand::CommitMinuteShift {
            schedule_id,
            minutes,
            reason,
            actor_id,
        } => {
            service
                .commit_minute_shift(schedule_id, *minutes, reason, actor_id)
                .await
        }
        ExternalCommand::CommitDayShift {
            schedule_id,
            days,
            reason,
            actor_id,
        } => {
            service
                .commit_day_shift(schedule_id, *days, reason, actor_id)
                .await
        }
        ExternalCommand::CommitScheduleDeletion { schedule_ids } => {
            service.commit_schedule_deletion(schedule_ids).await
        }
        ExternalCommand::CommitSlotDeletion { slot_ids } => {
            service.commit_slot_deletion(slot_ids).await
        }
    }
}
