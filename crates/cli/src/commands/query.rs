// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pipes query [--name NAME] <words...>` - Ask a running pipeline

use anyhow::Result;
use clap::Args;
use pipes_engine::actions;
use pipes_storage::FileStore;

#[derive(Args)]
pub struct QueryArgs {
    /// Project name or ID (the last one started when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// Query submitted to the pipeline's first stage
    #[arg(required = true, trailing_var_arg = true)]
    pub words: Vec<String>,
}

pub async fn handle(args: QueryArgs, store: FileStore) -> Result<()> {
    let text = args.words.join(" ");
    let mut out = std::io::stdout();
    actions::query(store, args.name.as_deref(), &text, &mut out).await?;
    Ok(())
}
