// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pipes register <name> <command> [--mode stdin|args]` - Add a service

use anyhow::Result;
use clap::Args;
use pipes_engine::{registry, InputMode};
use pipes_storage::FileStore;

#[derive(Args)]
pub struct RegisterArgs {
    /// Service name used in workflows
    pub name: String,

    /// Command line run for every request (e.g. "tr a-z A-Z")
    pub command: String,

    /// How requests reach the command: on stdin, or appended as arguments
    #[arg(long, default_value_t = InputMode::Stdin)]
    pub mode: InputMode,
}

pub fn handle(args: RegisterArgs, store: FileStore) -> Result<()> {
    registry::register_service(&store, &args.name, &args.command, args.mode)?;
    println!("Registered: {} ({})", args.name, args.mode);
    Ok(())
}
