// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use serde::{Deserialize, Serialize};
use slotshift_domain::PractitionerId;

/// Represents the entity performing an action.
///
/// For schedule shifts this is the practitioner or administrator named in
/// the shift request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "practitioner", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// Free-text reason, such as the reason given for a shift.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - Why the action was taken
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`TransferAppointment`", "`ShiftSchedules`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact summary of cached schedule state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable audit event describing one schedule transition.
///
/// Every accepted transfer, shift or deletion produces exactly one event,
/// which records:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before and after the transition
/// - Which practitioners' schedules were touched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The actor who initiated this change.
    pub actor: Actor,
    /// The cause or reason for this change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// Practitioners whose schedules changed. A cross-practitioner transfer
    /// lists both.
    pub practitioners: Vec<PractitionerId>,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        practitioners: Vec<PractitionerId>,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            before,
            after,
            practitioners,
        }
    }

    /// Whether the event touched `practitioner`'s schedules.
    #[must_use]
    pub fn involves(&self, practitioner: &PractitionerId) -> bool {
        self.practitioners.contains(practitioner)
    }
}
