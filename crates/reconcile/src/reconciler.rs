// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Optimistic reconciliation.
//!
//! Every accepted action runs through the same state machine:
//!
//! ```text
//! Idle -> Pending -> { Committed, Failed }
//! ```
//!
//! 1. [`Reconciler::begin`] applies the plan to the cache and marks the
//!    affected practitioners `Pending`.
//! 2. A background task issues the external commands in order.
//! 3. Once the service has answered, the task re-fetches every affected
//!    practitioner and replaces their cached schedules with the server's
//!    version. The optimistic mutation is only ever a preview.
//! 4. If the re-fetch fails the practitioners are marked `Stale` and must be
//!    refreshed before they can be planned against again.
//!
//! There are no retries. Dropping a [`ReconciliationHandle`] does not stop
//! the task, so the re-fetch always happens.

use crate::config::ReconcilerConfig;
use crate::error::ReconcileError;
use crate::events::{CacheEvent, CacheEventBroadcaster};
use crate::service::{ScheduleService, ServiceError, execute};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use slotshift::{
    Command, ExternalCommand, Plan, ScheduleBook, TransitionResult, apply, plan, validate_fetched,
};
use slotshift_audit::{Actor, AuditEvent, Cause};
use slotshift_domain::{PractitionerId, Schedule};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, broadcast, watch};
use tracing::{debug, info, warn};

/// Whether a practitioner's cached schedules can be planned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Matches the last fetch from the service.
    Fresh,
    /// Holds an optimistic mutation awaiting the service.
    Pending,
    /// Missed a re-fetch; must be refreshed before planning.
    Stale,
}

/// The observable state of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconciliationStatus {
    /// Waiting for the service.
    Pending,
    /// The service accepted every command.
    Committed,
    /// The service refused a command.
    Failed {
        /// What the service reported.
        error: String,
    },
}

impl ReconciliationStatus {
    /// Whether the reconciliation has finished.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A caller's view of one in-flight action.
#[derive(Debug)]
pub struct ReconciliationHandle {
    id: u64,
    status: watch::Receiver<ReconciliationStatus>,
    audit_event: AuditEvent,
}

impl ReconciliationHandle {
    /// Identifier of this reconciliation, unique per reconciler.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The current status.
    #[must_use]
    pub fn status(&self) -> ReconciliationStatus {
        self.status.borrow().clone()
    }

    /// Waits until the action is committed or has failed.
    ///
    /// When this returns, the post-commit re-fetch has already been applied
    /// to the cache (or the practitioners have been marked stale).
    pub async fn wait(&self) -> ReconciliationStatus {
        let mut status: watch::Receiver<ReconciliationStatus> = self.status.clone();
        match status.wait_for(ReconciliationStatus::is_terminal).await {
            Ok(terminal) => terminal.clone(),
            Err(_) => ReconciliationStatus::Failed {
                error: String::from("reconciliation task ended without a result"),
            },
        }
    }

    /// A receiver observing every status change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ReconciliationStatus> {
        self.status.clone()
    }

    /// The audit event recorded for the optimistic transition.
    #[must_use]
    pub const fn audit_event(&self) -> &AuditEvent {
        &self.audit_event
    }
}

#[derive(Debug, Default)]
struct Cache {
    book: ScheduleBook,
    freshness: BTreeMap<PractitionerId, Freshness>,
    // Bumped on every change to a practitioner's cached schedules
    generations: BTreeMap<PractitionerId, u64>,
}

impl Cache {
    fn ensure_usable(&self, practitioners: &[PractitionerId]) -> Result<(), ReconcileError> {
        for practitioner in practitioners {
            match self.freshness.get(practitioner) {
                None => {
                    return Err(ReconcileError::NotLoaded {
                        practitioner: practitioner.clone(),
                    });
                }
                Some(Freshness::Pending) => {
                    return Err(ReconcileError::ActionInFlight {
                        practitioner: practitioner.clone(),
                    });
                }
                Some(Freshness::Stale) => {
                    return Err(ReconcileError::StaleCache {
                        practitioner: practitioner.clone(),
                    });
                }
                Some(Freshness::Fresh) => {}
            }
        }
        Ok(())
    }

    fn mark(&mut self, practitioners: &[PractitionerId], freshness: Freshness) {
        for practitioner in practitioners {
            self.freshness.insert(practitioner.clone(), freshness);
        }
    }

    fn generation(&self, practitioner: &PractitionerId) -> u64 {
        self.generations.get(practitioner).copied().unwrap_or_default()
    }

    fn bump(&mut self, practitioners: &[PractitionerId]) {
        for practitioner in practitioners {
            *self.generations.entry(practitioner.clone()).or_default() += 1;
        }
    }
}

struct Inner {
    service: Arc<dyn ScheduleService>,
    config: ReconcilerConfig,
    cache: RwLock<Cache>,
    events: CacheEventBroadcaster,
    next_id: AtomicU64,
}

/// The sole writer of the schedule cache.
///
/// Cheap to clone; clones share the same cache.
#[derive(Clone)]
pub struct Reconciler {
    inner: Arc<Inner>,
}

impl Reconciler {
    /// Creates a reconciler with an empty cache.
    #[must_use]
    pub fn new(service: Arc<dyn ScheduleService>, config: ReconcilerConfig) -> Self {
        let events: CacheEventBroadcaster = CacheEventBroadcaster::new(config.event_buffer);
        Self {
            inner: Arc::new(Inner {
                service,
                config,
                cache: RwLock::new(Cache::default()),
                events,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ReconcilerConfig {
        &self.inner.config
    }

    /// Subscribes to cache change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    /// A copy of the cached schedules.
    pub async fn snapshot(&self) -> ScheduleBook {
        self.inner.cache.read().await.book.clone()
    }

    /// Freshness of a practitioner's cache, or `None` if never loaded.
    pub async fn freshness(&self, practitioner: &PractitionerId) -> Option<Freshness> {
        self.inner.cache.read().await.freshness.get(practitioner).copied()
    }

    /// Fetches and caches a practitioner's schedules for the first time.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::refresh`].
    pub async fn load(&self, practitioner: &PractitionerId) -> Result<(), ReconcileError> {
        self.refresh(practitioner).await
    }

    /// Re-fetches a practitioner's schedules and replaces the cached copy.
    ///
    /// This is how a `Stale` practitioner becomes usable again. A failed
    /// refresh leaves the cache and its freshness as they were.
    ///
    /// # Errors
    ///
    /// Returns `ActionInFlight` while an action on the practitioner is
    /// pending, `Superseded` if the cache changed while the fetch was in
    /// flight, or the fetch or validation error.
    pub async fn refresh(&self, practitioner: &PractitionerId) -> Result<(), ReconcileError> {
        let started: u64 = {
            let cache = self.inner.cache.read().await;
            if cache.freshness.get(practitioner) == Some(&Freshness::Pending) {
                return Err(ReconcileError::ActionInFlight {
                    practitioner: practitioner.clone(),
                });
            }
            cache.generation(practitioner)
        };

        let fetched: Vec<Schedule> = fetch_valid(self.inner.service.as_ref(), practitioner).await?;

        let mut cache = self.inner.cache.write().await;
        // Rule: a fetch older than the cached state never replaces it
        if cache.generation(practitioner) != started {
            drop(cache);
            warn!(practitioner = %practitioner, "Discarded superseded refresh");
            return Err(ReconcileError::Superseded {
                practitioner: practitioner.clone(),
            });
        }
        let practitioners: &[PractitionerId] = std::slice::from_ref(practitioner);
        cache.book.replace_practitioner(practitioner, fetched);
        cache.bump(practitioners);
        cache.mark(practitioners, Freshness::Fresh);
        drop(cache);

        info!(practitioner = %practitioner, "Refreshed practitioner schedules");
        self.inner.events.broadcast(&CacheEvent::Refreshed {
            practitioner_id: practitioner.clone(),
        });
        Ok(())
    }

    /// Plans a command against the cache.
    ///
    /// Applies the configured link policy and shift limits, and refuses to
    /// plan against practitioners that are not loaded, pending or stale.
    ///
    /// # Errors
    ///
    /// Returns the freshness, limit or planning error.
    pub async fn plan(&self, command: &Command) -> Result<Plan, ReconcileError> {
        match command {
            Command::ShiftMinutes { request } | Command::ShiftDays { request } => {
                self.inner.config.shift_limits.check(request)?;
            }
            Command::Transfer { .. }
            | Command::DeleteSchedules { .. }
            | Command::DeleteSlots { .. } => {}
        }

        let cache = self.inner.cache.read().await;
        if let Command::Transfer { source, target } = command {
            cache.ensure_usable(&[source.practitioner_id.clone(), target.practitioner_id.clone()])?;
        }
        let accepted: Plan = plan(&cache.book, command, self.inner.config.link_policy)?;
        cache.ensure_usable(&accepted.practitioners())?;
        drop(cache);

        if let Plan::Transfer { transfer } = &accepted {
            if transfer.is_degraded() {
                warn!(
                    source = %transfer.source,
                    appointment = %transfer.appointment_id,
                    "Transfer falls back to the slot id as appointment id"
                );
            }
        }
        Ok(accepted)
    }

    /// Applies a plan optimistically and starts reconciling it with the
    /// service.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the cache untouched, if an affected
    /// practitioner is not loaded, pending or stale, or if the plan no
    /// longer applies to the cache.
    pub async fn begin(
        &self,
        plan: Plan,
        actor: Actor,
        cause: Cause,
    ) -> Result<ReconciliationHandle, ReconcileError> {
        let mut cache = self.inner.cache.write().await;
        let practitioners: Vec<PractitionerId> = plan.practitioners();
        cache.ensure_usable(&practitioners)?;
        let TransitionResult {
            new_book,
            external_commands,
            audit_event,
            ..
        } = apply(&cache.book, &plan, actor, cause)?;
        cache.book = new_book;
        cache.bump(&practitioners);
        cache.mark(&practitioners, Freshness::Pending);
        drop(cache);

        let id: u64 = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        info!(
            reconciliation = id,
            action = plan.name(),
            practitioners = ?practitioners,
            commands = external_commands.len(),
            "Applied action optimistically"
        );
        self.inner.events.broadcast(&CacheEvent::OptimisticApplied {
            reconciliation_id: id,
            action: String::from(plan.name()),
            practitioners: practitioners.clone(),
        });

        let (tx, rx) = watch::channel(ReconciliationStatus::Pending);
        let inner: Arc<Inner> = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let status: ReconciliationStatus =
                reconcile(&inner, id, &external_commands, &practitioners).await;
            // Receivers may all be gone; the cache is already settled
            let _ = tx.send(status);
        });

        Ok(ReconciliationHandle {
            id,
            status: rx,
            audit_event,
        })
    }
}

async fn reconcile(
    inner: &Inner,
    id: u64,
    commands: &[ExternalCommand],
    practitioners: &[PractitionerId],
) -> ReconciliationStatus {
    let outcome: Result<(), ServiceError> = commit_all(inner.service.as_ref(), commands).await;

    let status: ReconciliationStatus = match outcome {
        Ok(()) => {
            info!(reconciliation = id, "Service committed action");
            inner.events.broadcast(&CacheEvent::Committed {
                reconciliation_id: id,
            });
            ReconciliationStatus::Committed
        }
        Err(err) => {
            warn!(reconciliation = id, error = %err, "Service refused action");
            inner.events.broadcast(&CacheEvent::Failed {
                reconciliation_id: id,
                error: err.to_string(),
            });
            ReconciliationStatus::Failed {
                error: err.to_string(),
            }
        }
    };

    let should_refetch: bool =
        status == ReconciliationStatus::Committed || inner.config.refetch_after_failure;
    if should_refetch {
        refetch(inner, id, practitioners).await;
    } else {
        mark_stale(inner, practitioners).await;
    }
    status
}

async fn commit_all(
    service: &dyn ScheduleService,
    commands: &[ExternalCommand],
) -> Result<(), ServiceError> {
    for command in commands {
        debug!(?command, "Issuing external command");
        execute(service, command).await?;
    }
    Ok(())
}

async fn refetch(inner: &Inner, id: u64, practitioners: &[PractitionerId]) {
    let service: &dyn ScheduleService = inner.service.as_ref();
    let fetched: Result<Vec<Vec<Schedule>>, ReconcileError> = try_join_all(
        practitioners
            .iter()
            .map(|practitioner| fetch_valid(service, practitioner)),
    )
    .await;

    match fetched {
        Ok(all) => {
            let mut cache = inner.cache.write().await;
            for (practitioner, schedules) in practitioners.iter().zip(all) {
                cache.book.replace_practitioner(practitioner, schedules);
            }
            cache.bump(practitioners);
            cache.mark(practitioners, Freshness::Fresh);
            drop(cache);

            debug!(reconciliation = id, "Replaced cache with fetched schedules");
            for practitioner in practitioners {
                inner.events.broadcast(&CacheEvent::Refreshed {
                    practitioner_id: practitioner.clone(),
                });
            }
        }
        Err(err) => {
            warn!(reconciliation = id, error = %err, "Re-fetch failed");
            mark_stale(inner, practitioners).await;
        }
    }
}

async fn mark_stale(inner: &Inner, practitioners: &[PractitionerId]) {
    let mut cache = inner.cache.write().await;
    cache.bump(practitioners);
    cache.mark(practitioners, Freshness::Stale);
    drop(cache);
    for practitioner in practitioners {
        warn!(practitioner = %practitioner, "Cached schedules marked stale");
        inner.events.broadcast(&CacheEvent::MarkedStale {
            practitioner_id: practitioner.clone(),
        });
    }
}

async fn fetch_valid(
    service: &dyn ScheduleService,
    practitioner: &PractitionerId,
) -> Result<Vec<Schedule>, ReconcileError> {
    let schedules: Vec<Schedule> = service.fetch_schedules(practitioner).await?;
    validate_fetched(&schedules)?;
    Ok(schedules)
}
