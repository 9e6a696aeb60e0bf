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

mod script;

use clap::Parser;
use script::{Report, Script, run_script};
use slotshift_domain::Schedule;
use slotshift_reconcile::{InMemoryScheduleService, ReconcilerConfig, Reconciler, ScheduleService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Slotshift Replay - runs a script of dashboard actions against an
/// in-memory schedule service and prints the resulting cache
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding the service's initial schedules
    #[arg(short, long)]
    fixture: PathBuf,

    /// JSON file holding the steps to replay
    #[arg(short, long)]
    script: PathBuf,

    /// Optional reconciler configuration (JSON). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config: ReconcilerConfig = match &args.config {
        Some(path) => {
            info!("Using reconciler configuration at: {}", path.display());
            ReconcilerConfig::from_path(path)?
        }
        None => ReconcilerConfig::default(),
    };

    let schedules: Vec<Schedule> = serde_json::from_str(&std::fs::read_to_string(&args.fixture)?)?;
    let script: Script = serde_json::from_str(&std::fs::read_to_string(&args.script)?)?;
    info!(
        schedules = schedules.len(),
        steps = script.steps.len(),
        "Loaded fixture and script"
    );

    let service: Arc<InMemoryScheduleService> = Arc::new(InMemoryScheduleService::new(schedules));
    let shared: Arc<dyn ScheduleService> = Arc::clone(&service) as Arc<dyn ScheduleService>;
    let reconciler: Reconciler = Reconciler::new(shared, config);

    let report: Report = run_script(&reconciler, &service, &script).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
