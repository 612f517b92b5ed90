// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed store shared between processes
//!
//! The whole tree is kept as one JSON document. Every operation takes an
//! exclusive advisory lock on a sibling `.lock` file, reloads the document,
//! and (for mutations) rewrites it through a temporary file and a rename.

use crate::store::{join_path, KvStore, StoreError};
use crate::tree::Node;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Store persisted as a JSON snapshot on disk
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open (or lazily create) a store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        tracing::debug!(path = %path.display(), "opened file store");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn lock(&self) -> Result<File, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        file.lock_exclusive().map_err(StoreError::Lock)?;
        Ok(file)
    }

    fn load(&self) -> Result<Node, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(Node::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Node::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, root: &Node) -> Result<(), StoreError> {
        let mut tmp = self.path.as_os_str().to_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, serde_json::to_vec_pretty(root)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn with_tree<T>(
        &self,
        mutate: bool,
        f: impl FnOnce(&mut Node) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let lock = self.lock()?;
        let mut root = self.load()?;
        let result = f(&mut root)?;
        if mutate {
            self.save(&root)?;
        }
        // Unlocking explicitly surfaces errors that drop would swallow
        lock.unlock().map_err(StoreError::Lock)?;
        Ok(result)
    }
}

impl KvStore for FileStore {
    fn read(&self, key: &str, dir: &str) -> Result<String, StoreError> {
        let path = join_path(key, dir)?;
        self.with_tree(false, |root| root.read(&path))
    }

    fn list(&self, key: &str, dir: &str) -> Result<Vec<String>, StoreError> {
        let path = join_path(key, dir)?;
        self.with_tree(false, |root| root.list(&path))
    }

    fn write(&self, key: &str, value: &str, dir: &str) -> Result<(), StoreError> {
        let path = join_path(key, dir)?;
        self.with_tree(true, |root| root.write(&path, value))
    }

    fn delete(&self, key: &str, dir: &str) -> Result<(), StoreError> {
        let path = join_path(key, dir)?;
        self.with_tree(true, |root| root.delete(&path))
    }

    fn addr(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
