// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pipes - chain registered services into a pipeline

mod commands;
mod error;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{build, init, query, register, rm, run};
use error::PipesError;
use pipes_storage::FileStore;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "pipes",
    version,
    about = "Pipes - chain registered services into a pipeline"
)]
struct Cli {
    /// Store shared by every project [default: ~/.pipes/store.json]
    #[arg(long, global = true, env = "PIPES_STORE")]
    store: Option<PathBuf>,

    /// Log level (debug, info, warn); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare an empty store
    Init,
    /// Register executables as services (path[:stdin|args])
    Build(build::BuildArgs),
    /// Launch a workflow, query it, and stop it (or keep it with -d)
    Run(run::RunArgs),
    /// Query a running project
    Query(query::QueryArgs),
    /// Stop a running project
    Rm(rm::RmArgs),
    /// Register the command behind a service name
    Register(register::RegisterArgs),
    /// Print the version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli.log);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprint!("{}", PipesError::explain(&e));
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    if let Commands::Version = cli.command {
        println!("pipes {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let path = match cli.store {
        Some(path) => path,
        None => default_store()?,
    };
    let store = FileStore::open(&path)
        .with_context(|| format!("cannot open store at {}", path.display()))?;

    let runtime = tokio::runtime::Runtime::new()?;
    match cli.command {
        Commands::Init => init::handle(store),
        Commands::Build(args) => build::handle(args, store),
        Commands::Run(args) => runtime.block_on(run::handle(args, store)),
        Commands::Query(args) => runtime.block_on(query::handle(args, store)),
        Commands::Rm(args) => rm::handle(args, store),
        Commands::Register(args) => register::handle(args, store),
        Commands::Version => Ok(()),
    }
}

fn default_store() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory; pass --store")?;
    Ok(home.join(".pipes").join("store.json"))
}

fn setup_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
