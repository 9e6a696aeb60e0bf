// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment id resolution for transfer sources.
//!
//! Older records link a slot to its appointment only through the slot
//! comment (`"ID: 42"`, `"Appointment ID: 42"`, or a bare UUID). The
//! resolution order is:
//!
//! 1. `appointments[0].id`
//! 2. a labelled id in the comment
//! 3. the first UUID-shaped token in the comment
//! 4. the slot id itself (degraded: the link is unreliable)

use crate::schedule::Slot;
use crate::types::AppointmentId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static LABELLED_ID: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(appointment\s*id|app\s*id|id)\s*:\s*([a-zA-Z0-9_-]+)"));

static UUID: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
});

#[allow(clippy::expect_used)] // patterns are constants covered by unit tests
fn compile(pattern: &'static str) -> Regex {
    Regex::new(pattern).expect("static appointment pattern compiles")
}

/// How an appointment id was obtained from a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Read from the slot's structured appointment list.
    Structured,
    /// Parsed from an `ID:` style label in the comment.
    CommentLabel,
    /// Taken from a UUID found in the comment.
    CommentUuid,
    /// No link found; the slot id stands in for the appointment id.
    SlotIdFallback,
}

impl Resolution {
    /// Whether the id came from anything other than a structured link.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        !matches!(self, Self::Structured)
    }

    /// Returns the string representation of this resolution.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structured => "structured link",
            Self::CommentLabel => "comment label",
            Self::CommentUuid => "comment uuid",
            Self::SlotIdFallback => "slot id fallback",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An appointment id together with how it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAppointment {
    /// The resolved appointment id.
    pub id: AppointmentId,
    /// Where the id came from.
    pub resolution: Resolution,
}

/// Resolves the appointment carried by `slot`.
///
/// Never fails: when no link can be found the slot id is returned with
/// [`Resolution::SlotIdFallback`].
#[must_use]
pub fn resolve_appointment_id(slot: &Slot) -> ResolvedAppointment {
    if let Some(id) = slot.linked_appointment() {
        return ResolvedAppointment {
            id: id.clone(),
            resolution: Resolution::Structured,
        };
    }

    if let Some(comment) = slot.comment.as_deref() {
        if let Some(id) = labelled_id(comment) {
            return ResolvedAppointment {
                id,
                resolution: Resolution::CommentLabel,
            };
        }
        if let Some(id) = uuid_in(comment) {
            return ResolvedAppointment {
                id,
                resolution: Resolution::CommentUuid,
            };
        }
    }

    ResolvedAppointment {
        id: AppointmentId::new(slot.id.value()),
        resolution: Resolution::SlotIdFallback,
    }
}

fn labelled_id(comment: &str) -> Option<AppointmentId> {
    LABELLED_ID
        .captures(comment)
        .and_then(|captures| captures.get(2))
        .map(|value| AppointmentId::new(value.as_str()))
}

fn uuid_in(comment: &str) -> Option<AppointmentId> {
    UUID.find(comment)
        .map(|value| AppointmentId::new(value.as_str()))
}
