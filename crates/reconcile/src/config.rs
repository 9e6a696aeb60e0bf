// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reconciler configuration.
//!
//! Read from JSON. Every field is optional; missing fields take their
//! defaults.
//!
//! ```json
//! {
//!   "link_policy": "reject_slot_id_fallback",
//!   "shift_limits": { "max_minutes": 1440, "max_days": 365 },
//!   "refetch_after_failure": true,
//!   "event_buffer": 100
//! }
//! ```

use crate::error::ReconcileError;
use serde::{Deserialize, Serialize};
use slotshift_domain::{LinkPolicy, ShiftMode, ShiftRequest};
use std::path::Path;

/// Upper bounds the dashboard enforces on shift magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftLimits {
    /// Largest minute shift (one day).
    pub max_minutes: i64,
    /// Largest day shift (one year).
    pub max_days: i64,
}

impl Default for ShiftLimits {
    fn default() -> Self {
        Self {
            max_minutes: 1440,
            max_days: 365,
        }
    }
}

impl ShiftLimits {
    /// Checks a request's magnitude against the limit for its mode.
    ///
    /// Lower bounds are left to the shift engine.
    ///
    /// # Errors
    ///
    /// Returns `MagnitudeOutOfRange` when the magnitude exceeds the limit.
    pub const fn check(&self, request: &ShiftRequest) -> Result<(), ReconcileError> {
        let limit: i64 = match request.mode {
            ShiftMode::Time => self.max_minutes,
            ShiftMode::Day => self.max_days,
        };
        if request.magnitude > limit {
            return Err(ReconcileError::MagnitudeOutOfRange {
                magnitude: request.magnitude,
                limit,
                unit: request.mode.unit(),
            });
        }
        Ok(())
    }
}

/// Settings for a [`crate::Reconciler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// How strictly transfers must confirm their appointment link.
    pub link_policy: LinkPolicy,
    /// Caller-side shift bounds.
    pub shift_limits: ShiftLimits,
    /// Re-fetch immediately after a failed commit.
    pub refetch_after_failure: bool,
    /// Capacity of the cache event channel.
    pub event_buffer: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            link_policy: LinkPolicy::default(),
            shift_limits: ShiftLimits::default(),
            refetch_after_failure: true,
            event_buffer: 100,
        }
    }
}

impl ReconcilerConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the JSON is malformed or the values are invalid.
    pub fn from_json_str(json: &str) -> Result<Self, ReconcileError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ReconcileError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReconcileError> {
        let path: &Path = path.as_ref();
        let json: String = std::fs::read_to_string(path)
            .map_err(|e| ReconcileError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Config` naming the first invalid field.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.shift_limits.max_minutes <= 0 {
            return Err(ReconcileError::Config(String::from(
                "shift_limits.max_minutes must be greater than 0",
            )));
        }
        if self.shift_limits.max_days <= 0 {
            return Err(ReconcileError::Config(String::from(
                "shift_limits.max_days must be greater than 0",
            )));
        }
        if self.event_buffer == 0 {
            return Err(ReconcileError::Config(String::from(
                "event_buffer must be greater than 0",
            )));
        }
        Ok(())
    }
}
