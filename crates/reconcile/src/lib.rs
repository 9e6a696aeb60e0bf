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

mod config;
mod error;
mod events;
mod memory;
mod reconciler;
mod service;

#[cfg(test)]
mod tests;

pub use config::{ReconcilerConfig, ShiftLimits};
pub use error::ReconcileError;
pub use events::{CacheEvent, CacheEventBroadcaster};
pub use memory::InMemoryScheduleService;
pub use reconciler::{Freshness, ReconciliationHandle, ReconciliationStatus, Reconciler};
pub use service::{ScheduleService, ServiceError, execute};
