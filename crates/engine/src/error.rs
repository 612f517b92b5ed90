// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for projects and top-level actions

use crate::controller::ControllerError;
use pipes_storage::StoreError;
use thiserror::Error;

/// Errors that can occur on a project
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project already exists: {0}")]
    AlreadyExists(String),
    #[error("project does not exist: {0}")]
    NotFound(String),
    #[error("project is not running: {0}")]
    NotRunning(String),
    #[error("invalid project name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("invalid stage {name:?}: {reason}")]
    InvalidStage { name: String, reason: &'static str },
    #[error("no containers for {0}")]
    NoContainer(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("corrupt topology: {0}")]
    Topology(#[from] serde_json::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
}

/// Errors from the run/query/remove actions
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("you need to provide a workflow, ie. \"service1 | service2 | service3\"")]
    EmptyWorkflow,
    #[error("empty service in workflow: {0:?}")]
    EmptyService(String),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}
