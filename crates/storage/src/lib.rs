// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Hierarchical key/value storage backing every project

mod file;
mod memory;
mod store;
mod tree;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{join_path, KvStore, StoreError};
pub use tree::Node;
