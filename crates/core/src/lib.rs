// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod plan;
mod state;

#[cfg(test)]
mod tests;

use slotshift_domain::{DomainError, Schedule, validate_schedule};

// Re-export public types and functions
pub use apply::apply;
pub use command::Command;
pub use error::CoreError;
pub use plan::{ExternalCommand, Plan, plan};
pub use state::{ScheduleBook, TransitionResult};

/// Validates every schedule in a freshly fetched set before it is cached.
///
/// This is a read-only validation that does not create audit events.
///
/// # Errors
///
/// Returns the first schedule invariant violation found.
pub fn validate_fetched(schedules: &[Schedule]) -> Result<(), DomainError> {
    schedules.iter().try_for_each(validate_schedule)
}
