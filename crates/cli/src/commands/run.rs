// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pipes run [-d] [--name NAME] "<workflow>"` - Launch a pipeline

use anyhow::Result;
use clap::Args;
use pipes_adapters::{Orchestrator, TracedOrchestrator};
use pipes_core::consts::QUERY_POLL_INTERVAL;
use pipes_engine::{actions, Deployment, LocalOrchestrator, RunOutcome, RunRequest, WrapperConfig};
use pipes_storage::{FileStore, KvStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

#[derive(Args)]
pub struct RunArgs {
    /// Services separated by `|`; words after the first one form the query
    /// (e.g. "upper hello world | rev")
    pub workflow: Vec<String>,

    /// Keep the pipeline running until it is removed
    #[arg(short = 'd', long)]
    pub detach: bool,

    /// Project name (random when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// Seconds a stage waits for its successors before giving up
    #[arg(long, value_name = "SECS")]
    pub job_timeout: Option<u64>,
}

impl RunArgs {
    fn request(&self) -> RunRequest {
        RunRequest {
            workflow: self.workflow.join(" "),
            name: self.name.clone(),
            detach: self.detach,
        }
    }

    fn config(&self) -> WrapperConfig {
        WrapperConfig {
            job_timeout: self.job_timeout.map(Duration::from_secs),
        }
    }
}

pub async fn handle(args: RunArgs, store: FileStore) -> Result<()> {
    let orch = TracedOrchestrator::new(
        LocalOrchestrator::new(store.clone()).with_config(args.config()),
    );
    let mut out = std::io::stdout();

    match actions::run(orch, store, &args.request(), &mut out).await? {
        RunOutcome::Detached(deployment) => serve(deployment).await,
        RunOutcome::Completed(outcome) => {
            tracing::debug!(?outcome, "workflow finished");
            Ok(())
        }
    }
}

/// Keep a detached pipeline alive until it is removed or interrupted
async fn serve<O: Orchestrator, S: KvStore>(deployment: Deployment<O, S>) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        eprintln!("\nShutting down pipeline...");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut poll_timer = interval(QUERY_POLL_INTERVAL);
    loop {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        poll_timer.tick().await;
        if !deployment.running() {
            tracing::info!("project removed");
            break;
        }
    }

    deployment.shutdown().await?;
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
