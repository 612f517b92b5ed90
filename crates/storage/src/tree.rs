// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory node tree shared by the store implementations

use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A store node: either a leaf value or a directory of children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Value(String),
    Dir(BTreeMap<String, Node>),
}

impl Default for Node {
    fn default() -> Self {
        Node::Dir(BTreeMap::new())
    }
}

impl Node {
    fn lookup(&self, path: &[String]) -> Result<&Node, StoreError> {
        let mut node = self;
        for (i, segment) in path.iter().enumerate() {
            node = match node {
                Node::Dir(children) => children
                    .get(segment)
                    .ok_or_else(|| StoreError::NotFound(path[..=i].join("/")))?,
                Node::Value(_) => return Err(StoreError::NotDir(path[..i].join("/"))),
            };
        }
        Ok(node)
    }

    pub fn read(&self, path: &[String]) -> Result<String, StoreError> {
        match self.lookup(path)? {
            Node::Value(v) => Ok(v.clone()),
            Node::Dir(_) => Err(StoreError::IsDir(path.join("/"))),
        }
    }

    pub fn list(&self, path: &[String]) -> Result<Vec<String>, StoreError> {
        match self.lookup(path)? {
            Node::Dir(children) => Ok(children.keys().cloned().collect()),
            Node::Value(_) => Err(StoreError::NotDir(path.join("/"))),
        }
    }

    /// Set a value, or create a directory when `value` is empty.
    ///
    /// Creating a directory that already exists keeps its children.
    pub fn write(&mut self, path: &[String], value: &str) -> Result<(), StoreError> {
        let Some((last, parents)) = path.split_last() else {
            return Err(StoreError::InvalidKey(String::new()));
        };

        let mut node = self;
        for (i, segment) in parents.iter().enumerate() {
            let Node::Dir(children) = node else {
                return Err(StoreError::NotDir(path[..i].join("/")));
            };
            node = children.entry(segment.clone()).or_default();
        }

        let Node::Dir(children) = node else {
            return Err(StoreError::NotDir(parents.join("/")));
        };

        if value.is_empty() {
            match children.get(last) {
                Some(Node::Dir(_)) => {}
                Some(Node::Value(_)) | None => {
                    children.insert(last.clone(), Node::default());
                }
            }
            return Ok(());
        }

        if let Some(Node::Dir(_)) = children.get(last) {
            return Err(StoreError::IsDir(path.join("/")));
        }
        children.insert(last.clone(), Node::Value(value.to_string()));
        Ok(())
    }

    pub fn delete(&mut self, path: &[String]) -> Result<(), StoreError> {
        let Some((last, parents)) = path.split_last() else {
            return Err(StoreError::InvalidKey(String::new()));
        };

        let mut node = self;
        for (i, segment) in parents.iter().enumerate() {
            node = match node {
                Node::Dir(children) => children
                    .get_mut(segment)
                    .ok_or_else(|| StoreError::NotFound(path[..=i].join("/")))?,
                Node::Value(_) => return Err(StoreError::NotDir(path[..i].join("/"))),
            };
        }

        match node {
            Node::Dir(children) => children
                .remove(last)
                .map(|_| ())
                .ok_or_else(|| StoreError::NotFound(path.join("/"))),
            Node::Value(_) => Err(StoreError::NotDir(parents.join("/"))),
        }
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
