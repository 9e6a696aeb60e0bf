// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Replay scripts.
//!
//! A script is a list of steps. Loads and refreshes fetch a practitioner's
//! schedules; actions go through plan, optimistic apply, commit and
//! re-fetch, optionally with an injected service failure. A rejected step
//! is reported and the script carries on.

use serde::{Deserialize, Serialize};
use slotshift::{Command, Plan, ScheduleBook};
use slotshift_audit::{Actor, AuditEvent, Cause};
use slotshift_domain::PractitionerId;
use slotshift_reconcile::{
    Freshness, InMemoryScheduleService, ReconcileError, Reconciler, ReconciliationHandle,
    ReconciliationStatus, ServiceError,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// A replay script.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Steps, run in order.
    pub steps: Vec<Step>,
}

/// One scripted step.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Fetch a practitioner's schedules for the first time.
    Load {
        /// The practitioner.
        practitioner_id: PractitionerId,
    },
    /// Re-fetch a practitioner's schedules.
    Refresh {
        /// The practitioner.
        practitioner_id: PractitionerId,
    },
    /// Plan and reconcile one dashboard action.
    Action {
        /// Who performs the action.
        actor: Actor,
        /// Why.
        cause: Cause,
        /// The action.
        command: Command,
        /// Make the service refuse the first commit with this message.
        #[serde(default)]
        fail_commit: Option<String>,
        /// Make the service fail the next fetch with this message.
        #[serde(default)]
        fail_fetch: Option<String>,
    },
}

/// What happened to one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A load or refresh succeeded.
    Loaded,
    /// The step was refused before anything changed.
    Rejected {
        /// Why.
        error: String,
    },
    /// The action ran to a terminal status.
    Reconciled {
        /// Terminal status.
        status: ReconciliationStatus,
        /// Confirmation prompt shown for transfers.
        #[serde(skip_serializing_if = "Option::is_none")]
        confirmation: Option<String>,
        /// The audit record.
        audit_event: Box<AuditEvent>,
    },
}

/// Result of one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Position in the script, from zero.
    pub index: usize,
    /// What happened.
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Result of a whole script.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// One entry per step.
    pub steps: Vec<StepReport>,
    /// Freshness of every practitioner the script touched.
    pub freshness: BTreeMap<PractitionerId, Freshness>,
    /// The final cache.
    pub cache: ScheduleBook,
}

/// Runs every step of `script`.
pub async fn run_script(
    reconciler: &Reconciler,
    service: &InMemoryScheduleService,
    script: &Script,
) -> Report {
    let mut steps: Vec<StepReport> = Vec::with_capacity(script.steps.len());
    let mut touched: Vec<PractitionerId> = Vec::new();

    for (index, step) in script.steps.iter().enumerate() {
        let outcome: Outcome = match step {
            Step::Load { practitioner_id } | Step::Refresh { practitioner_id } => {
                touched.push(practitioner_id.clone());
                match reconciler.refresh(practitioner_id).await {
                    Ok(()) => Outcome::Loaded,
                    Err(err) => rejected(index, &err),
                }
            }
            Step::Action {
                actor,
                cause,
                command,
                fail_commit,
                fail_fetch,
            } => {
                if let Some(message) = fail_commit {
                    service
                        .fail_next_commit(ServiceError::Rejected(message.clone()))
                        .await;
                }
                if let Some(message) = fail_fetch {
                    service
                        .fail_next_fetch(ServiceError::Unavailable(message.clone()))
                        .await;
                }
                run_action(reconciler, index, actor, cause, command).await
            }
        };
        info!(step = index, ?outcome, "Replayed step");
        steps.push(StepReport { index, outcome });
    }

    let mut freshness: BTreeMap<PractitionerId, Freshness> = BTreeMap::new();
    for practitioner in touched {
        if let Some(state) = reconciler.freshness(&practitioner).await {
            freshness.insert(practitioner, state);
        }
    }

    Report {
        steps,
        freshness,
        cache: reconciler.snapshot().await,
    }
}

async fn run_action(
    reconciler: &Reconciler,
    index: usize,
    actor: &Actor,
    cause: &Cause,
    command: &Command,
) -> Outcome {
    let accepted: Plan = match reconciler.plan(command).await {
        Ok(accepted) => accepted,
        Err(err) => return rejected(index, &err),
    };
    let confirmation: Option<String> = match &accepted {
        Plan::Transfer { transfer } => Some(transfer.confirmation_message()),
        Plan::Shift { .. } | Plan::DeleteSchedules { .. } | Plan::DeleteSlots { .. } => None,
    };

    let handle: ReconciliationHandle =
        match reconciler.begin(accepted, actor.clone(), cause.clone()).await {
            Ok(handle) => handle,
            Err(err) => return rejected(index, &err),
        };
    let status: ReconciliationStatus = handle.wait().await;

    Outcome::Reconciled {
        status,
        confirmation,
        audit_event: Box::new(handle.audit_event().clone()),
    }
}

fn rejected(index: usize, err: &ReconcileError) -> Outcome {
    warn!(step = index, error = %err, "Step rejected");
    Outcome::Rejected {
        error: err.to_string(),
    }
}
