// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cache change notifications.
//!
//! Events describe what happened to the cached schedules so that several
//! UI panels can re-render from [`crate::Reconciler::snapshot`]. They are
//! informational only; the cache itself is the source of truth for readers.

use serde::{Deserialize, Serialize};
use slotshift_domain::PractitionerId;
use tokio::sync::broadcast;
use tracing::debug;

/// A change to the cached schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CacheEvent {
    /// A practitioner's schedules were fetched and cached.
    Refreshed {
        /// The practitioner.
        practitioner_id: PractitionerId,
    },
    /// An action was applied optimistically.
    OptimisticApplied {
        /// The reconciliation id.
        reconciliation_id: u64,
        /// The action name.
        action: String,
        /// Practitioners now pending.
        practitioners: Vec<PractitionerId>,
    },
    /// The service accepted every command of an action.
    Committed {
        /// The reconciliation id.
        reconciliation_id: u64,
    },
    /// The service refused an action.
    Failed {
        /// The reconciliation id.
        reconciliation_id: u64,
        /// What the service reported.
        error: String,
    },
    /// A practitioner's cache missed its re-fetch and cannot be trusted.
    MarkedStale {
        /// The practitioner.
        practitioner_id: PractitionerId,
    },
}

/// Broadcaster for cache events.
///
/// A lightweight wrapper around `tokio::sync::broadcast`. Slow receivers
/// lose the oldest events.
#[derive(Debug, Clone)]
pub struct CacheEventBroadcaster {
    tx: broadcast::Sender<CacheEvent>,
}

impl CacheEventBroadcaster {
    /// Creates a broadcaster buffering up to `capacity` events.
    ///
    /// `capacity` must be greater than zero; configuration validation
    /// guarantees this.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Broadcasts an event to every subscriber.
    ///
    /// If nobody is subscribed, the event is dropped.
    pub fn broadcast(&self, event: &CacheEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast cache event");
            }
            Err(_) => {
                debug!(?event, "No receivers for cache event");
            }
        }
    }

    /// Subscribes to events sent from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.tx.subscribe()
    }
}
