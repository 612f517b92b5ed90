// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pipes rm [NAME|ID]` - Stop a running pipeline

use anyhow::Result;
use clap::Args;
use pipes_engine::{actions, LocalOrchestrator};
use pipes_storage::FileStore;

#[derive(Args)]
pub struct RmArgs {
    /// Project name or ID (the last one started when omitted)
    pub project: Option<String>,
}

/// Marks the project stopped; the process serving it notices and tears the
/// stages down.
pub fn handle(args: RmArgs, store: FileStore) -> Result<()> {
    let orch = LocalOrchestrator::new(store.clone());
    let mut out = std::io::stdout();
    actions::remove(orch, store, args.project.as_deref(), &mut out)?;
    Ok(())
}
