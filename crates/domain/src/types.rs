// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            /// The opaque identifier value.
            value: String,
        }

        impl $name {
            /// Creates a new identifier from its string value.
            #[must_use]
            pub fn new(value: &str) -> Self {
                Self {
                    value: value.to_string(),
                }
            }

            /// Returns the identifier value.
            #[must_use]
            pub fn value(&self) -> &str {
                &self.value
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.value)
            }
        }
    };
}

string_id!(
    /// Identifies a practitioner (doctor, dentist, hygienist).
    PractitionerId
);

string_id!(
    /// Identifies one schedule (a practitioner's working block on one day).
    ScheduleId
);

string_id!(
    /// Identifies one slot.
    ///
    /// Slot identity survives time and day shifts; only timing changes.
    SlotId
);

string_id!(
    /// Identifies an appointment record held by the persistence service.
    AppointmentId
);

/// A structured link from a slot to an appointment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentLink {
    /// The linked appointment.
    pub id: AppointmentId,
    /// Patient display name, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

impl AppointmentLink {
    /// Creates a link without patient details.
    #[must_use]
    pub const fn new(id: AppointmentId) -> Self {
        Self {
            id,
            patient_name: None,
        }
    }
}

/// Fully qualified address of a slot.
///
/// UI drag-and-drop layers encode this as `practitioner:schedule:slot`.
/// That string form exists only at the boundary; everything inside the
/// engine works with the structured key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    /// Owner of the schedule.
    pub practitioner_id: PractitionerId,
    /// Schedule holding the slot.
    pub schedule_id: ScheduleId,
    /// The slot itself.
    pub slot_id: SlotId,
}

impl SlotKey {
    /// Separator used by the UI string encoding.
    pub const SEPARATOR: char = ':';

    /// Creates a new slot key.
    #[must_use]
    pub const fn new(
        practitioner_id: PractitionerId,
        schedule_id: ScheduleId,
        slot_id: SlotId,
    ) -> Self {
        Self {
            practitioner_id,
            schedule_id,
            slot_id,
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.practitioner_id,
            self.schedule_id,
            self.slot_id,
            sep = Self::SEPARATOR
        )
    }
}

impl FromStr for SlotKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(Self::SEPARATOR).collect();
        match parts.as_slice() {
            [practitioner, schedule, slot]
                if !practitioner.is_empty() && !schedule.is_empty() && !slot.is_empty() =>
            {
                Ok(Self::new(
                    PractitionerId::new(practitioner),
                    ScheduleId::new(schedule),
                    SlotId::new(slot),
                ))
            }
            _ => Err(DomainError::InvalidSlotKey(s.to_string())),
        }
    }
}
