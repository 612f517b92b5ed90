// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key/value store contract

use std::io;
use thiserror::Error;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),
    #[error("key is a directory: {0}")]
    IsDir(String),
    #[error("key is not a directory: {0}")]
    NotDir(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("failed to lock store: {0}")]
    Lock(#[source] io::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Hierarchical key/value store
///
/// Every key is addressed as `dir/key`. Writing an empty value creates a
/// directory node; intermediate directories are created on demand.
pub trait KvStore: Clone + Send + Sync + 'static {
    /// Read the value stored at `dir/key`
    fn read(&self, key: &str, dir: &str) -> Result<String, StoreError>;

    /// List the children names of the directory at `dir/key`
    fn list(&self, key: &str, dir: &str) -> Result<Vec<String>, StoreError>;

    /// Write `value` at `dir/key` (empty value creates a directory)
    fn write(&self, key: &str, value: &str, dir: &str) -> Result<(), StoreError>;

    /// Delete `dir/key` and everything beneath it
    fn delete(&self, key: &str, dir: &str) -> Result<(), StoreError>;

    /// Address other processes use to reach this store
    fn addr(&self) -> String;
}

/// Join `dir` and `key` into path segments
pub fn join_path(key: &str, dir: &str) -> Result<Vec<String>, StoreError> {
    let segments: Vec<String> = dir
        .split('/')
        .chain(key.split('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if segments.is_empty() {
        return Err(StoreError::InvalidKey(
            "you need to provide at least either key or dir".to_string(),
        ));
    }
    Ok(segments)
}
