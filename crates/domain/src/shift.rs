// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk time and day shifts.
//!
//! A shift is a uniform translation of every timestamp in a group of
//! schedules: slot starts and ends as well as the planning window. Because
//! every timestamp moves by the same amount, slot durations, slot order,
//! slot identity and occupancy are all preserved.
//!
//! The engine only rejects non-positive magnitudes. Upper bounds (one day
//! for minute shifts, one year for day shifts) belong to the caller.

use crate::error::DomainError;
use crate::schedule::{Schedule, slots_on_date};
use crate::types::ScheduleId;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_DAY: i64 = 86_400;

/// Unit of a shift magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftMode {
    /// Shift by minutes, changing time of day.
    Time,
    /// Shift by whole days, keeping time of day.
    Day,
}

impl ShiftMode {
    /// Returns the string representation of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Day => "day",
        }
    }

    /// Unit name for messages.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Time => "minutes",
            Self::Day => "days",
        }
    }
}

/// A request to shift a group of schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// Schedules to shift.
    pub schedule_ids: Vec<ScheduleId>,
    /// Unit of `magnitude`.
    pub mode: ShiftMode,
    /// Minutes or days, depending on `mode`.
    pub magnitude: i64,
    /// Why the schedules are shifted. Recorded in the audit trail.
    pub reason: String,
    /// Who performs the shift. Recorded in the audit trail.
    pub actor_id: String,
}

impl ShiftRequest {
    /// Builds a request covering every schedule on `date`.
    #[must_use]
    pub fn for_date(
        schedules: &[Schedule],
        date: Date,
        mode: ShiftMode,
        magnitude: i64,
        reason: &str,
        actor_id: &str,
    ) -> Self {
        Self {
            schedule_ids: slots_on_date(schedules, date)
                .into_iter()
                .map(|schedule| schedule.id.clone())
                .collect(),
            mode,
            magnitude,
            reason: reason.to_string(),
            actor_id: actor_id.to_string(),
        }
    }

    /// Validates the request fields that do not depend on schedule data.
    ///
    /// # Errors
    ///
    /// Returns `MissingReason`, `MissingActor` or `InvalidMagnitude`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.reason.trim().is_empty() {
            return Err(DomainError::MissingReason);
        }
        if self.actor_id.trim().is_empty() {
            return Err(DomainError::MissingActor);
        }
        validate_magnitude(self.magnitude)
    }
}

/// Shifts every slot and planning window by `minutes`.
///
/// # Errors
///
/// Returns `InvalidMagnitude` when `minutes <= 0`, or
/// `DateArithmeticOverflow` if a timestamp leaves the representable range.
pub fn shift_by_minutes(schedules: &[Schedule], minutes: i64) -> Result<Vec<Schedule>, DomainError> {
    validate_magnitude(minutes)?;
    let seconds: i64 = minutes
        .checked_mul(SECONDS_PER_MINUTE)
        .ok_or_else(|| overflow(format!("converting {minutes} minutes to seconds")))?;
    translate(schedules, Duration::seconds(seconds))
}

/// Shifts every timestamp forward by `days` whole days, keeping time of day.
///
/// # Errors
///
/// Returns `InvalidMagnitude` when `days <= 0`, or
/// `DateArithmeticOverflow` if a timestamp leaves the representable range.
pub fn shift_by_days(schedules: &[Schedule], days: i64) -> Result<Vec<Schedule>, DomainError> {
    validate_magnitude(days)?;
    let seconds: i64 = days
        .checked_mul(SECONDS_PER_DAY)
        .ok_or_else(|| overflow(format!("converting {days} days to seconds")))?;
    translate(schedules, Duration::seconds(seconds))
}

/// Applies a validated shift request to the schedules it names.
///
/// Only the named schedules are returned, shifted, in the order they appear
/// in `schedules`.
///
/// # Errors
///
/// Returns the request validation error, `ScheduleNotFound` for an unknown
/// id, or an arithmetic overflow.
pub fn shift_schedules(
    schedules: &[Schedule],
    request: &ShiftRequest,
) -> Result<Vec<Schedule>, DomainError> {
    request.validate()?;

    if let Some(missing) = request
        .schedule_ids
        .iter()
        .find(|id| !schedules.iter().any(|schedule| &schedule.id == *id))
    {
        return Err(DomainError::ScheduleNotFound(missing.clone()));
    }

    let selected: Vec<Schedule> = schedules
        .iter()
        .filter(|schedule| request.schedule_ids.contains(&schedule.id))
        .cloned()
        .collect();

    match request.mode {
        ShiftMode::Time => shift_by_minutes(&selected, request.magnitude),
        ShiftMode::Day => shift_by_days(&selected, request.magnitude),
    }
}

/// Translates every timestamp by `offset`, which may be negative.
///
/// This is the primitive behind both shift modes, and with a negated offset
/// it undoes a previous shift.
///
/// # Errors
///
/// Returns `DateArithmeticOverflow` if a timestamp leaves the representable range.
pub fn translate(schedules: &[Schedule], offset: Duration) -> Result<Vec<Schedule>, DomainError> {
    schedules
        .iter()
        .map(|schedule| {
            let mut shifted: Schedule = schedule.clone();
            shifted.planning_start = add(schedule.planning_start, offset)?;
            shifted.planning_end = add(schedule.planning_end, offset)?;
            for slot in &mut shifted.slots {
                slot.start = add(slot.start, offset)?;
                slot.end = add(slot.end, offset)?;
            }
            Ok(shifted)
        })
        .collect()
}

fn validate_magnitude(magnitude: i64) -> Result<(), DomainError> {
    if magnitude <= 0 {
        return Err(DomainError::InvalidMagnitude { magnitude });
    }
    Ok(())
}

fn add(timestamp: OffsetDateTime, offset: Duration) -> Result<OffsetDateTime, DomainError> {
    timestamp
        .checked_add(offset)
        .ok_or_else(|| overflow(format!("shifting {timestamp} by {offset}")))
}

const fn overflow(operation: String) -> DomainError {
    DomainError::DateArithmeticOverflow { operation }
}
