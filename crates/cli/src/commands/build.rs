// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pipes build <path[:mode]>...` - Register executables as services

use anyhow::Result;
use clap::Args;
use pipes_engine::registry;
use pipes_storage::FileStore;

#[derive(Args)]
pub struct BuildArgs {
    /// Executables to register, each optionally suffixed with `:stdin` or
    /// `:args`; the service takes the executable's file name
    #[arg(required = true)]
    pub targets: Vec<String>,
}

pub fn handle(args: BuildArgs, store: FileStore) -> Result<()> {
    for target in &args.targets {
        let built = registry::build_service(&store, target)?;
        println!("service_name: {}", built.name);
        println!("input_mode: {}", built.mode);
    }
    println!("Services successfully built...");
    Ok(())
}
