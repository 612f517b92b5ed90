// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pipes init` - Prepare an empty store

use anyhow::Result;
use pipes_engine::registry;
use pipes_storage::FileStore;

pub fn handle(store: FileStore) -> Result<()> {
    registry::init_store(&store)?;
    println!("Store initialized: {}", store.path().display());
    Ok(())
}
