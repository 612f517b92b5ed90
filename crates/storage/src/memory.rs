// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory store

use crate::store::{join_path, KvStore, StoreError};
use crate::tree::Node;
use std::sync::{Arc, Mutex};

/// Store kept entirely in memory; clones share the same tree
#[derive(Clone, Default)]
pub struct MemoryStore {
    root: Arc<Mutex<Node>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the whole tree
    pub fn snapshot(&self) -> Node {
        self.root.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl KvStore for MemoryStore {
    fn read(&self, key: &str, dir: &str) -> Result<String, StoreError> {
        let path = join_path(key, dir)?;
        self.root
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .read(&path)
    }

    fn list(&self, key: &str, dir: &str) -> Result<Vec<String>, StoreError> {
        let path = join_path(key, dir)?;
        self.root
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .list(&path)
    }

    fn write(&self, key: &str, value: &str, dir: &str) -> Result<(), StoreError> {
        let path = join_path(key, dir)?;
        self.root
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .write(&path, value)
    }

    fn delete(&self, key: &str, dir: &str) -> Result<(), StoreError> {
        let path = join_path(key, dir)?;
        self.root
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .delete(&path)
    }

    fn addr(&self) -> String {
        "memory".to_string()
    }
}
