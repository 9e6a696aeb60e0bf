// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::service::ServiceError;
use slotshift::CoreError;
use slotshift_domain::{DomainError, PractitionerId};
use thiserror::Error;

/// Errors surfaced by the reconciler.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Planning or applying the action failed.
    #[error("Planning failed: {0}")]
    Core(#[from] CoreError),
    /// The schedule service rejected a call or could not be reached.
    #[error("Schedule service error: {0}")]
    Service(#[from] ServiceError),
    /// The service returned schedules that break schedule invariants.
    #[error("Fetched schedules are invalid: {0}")]
    InvalidSchedule(#[from] DomainError),
    /// Another action on the practitioner has not resolved yet.
    #[error("An action for practitioner '{practitioner}' is still pending")]
    ActionInFlight {
        /// The busy practitioner.
        practitioner: PractitionerId,
    },
    /// The cache missed a re-fetch and cannot be used for planning.
    #[error("Cached schedules for practitioner '{practitioner}' are stale; refresh before planning")]
    StaleCache {
        /// The practitioner whose cache is stale.
        practitioner: PractitionerId,
    },
    /// A fetch returned after a newer change to the practitioner's cache and
    /// was discarded.
    #[error("Fetched schedules for practitioner '{practitioner}' were superseded by a newer change")]
    Superseded {
        /// The practitioner whose fetch was discarded.
        practitioner: PractitionerId,
    },
    /// The practitioner's schedules were never loaded.
    #[error("Schedules for practitioner '{practitioner}' are not loaded")]
    NotLoaded {
        /// The unknown practitioner.
        practitioner: PractitionerId,
    },
    /// A shift exceeds the configured upper bound.
    #[error("Shift of {magnitude} {unit} exceeds the limit of {limit} {unit}")]
    MagnitudeOutOfRange {
        /// Requested magnitude.
        magnitude: i64,
        /// Configured maximum.
        limit: i64,
        /// "minutes" or "days".
        unit: &'static str,
    },
    /// The configuration could not be read or is invalid.
    #[error("Invalid reconciler configuration: {0}")]
    Config(String),
}
