// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use slotshift_domain::{DomainError, ShiftMode};

/// Errors that can occur while planning or applying a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A shift command was paired with a request of the other mode.
    ShiftModeMismatch {
        /// The mode implied by the command.
        command: ShiftMode,
        /// The mode carried by the request.
        request: ShiftMode,
    },
    /// A deletion selection matched nothing.
    EmptySelection {
        /// What was being selected ("schedules" or "slots").
        target: &'static str,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::ShiftModeMismatch { command, request } => write!(
                f,
                "Shift command expects a {} shift but the request is a {} shift",
                command.as_str(),
                request.as_str()
            ),
            Self::EmptySelection { target } => {
                write!(f, "The selection matched no {target}; nothing to delete")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
