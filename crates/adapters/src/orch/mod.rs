// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container orchestration adapters

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOrchestrator, OrchCall};

use async_trait::async_trait;
use pipes_core::{Container, Image};
use thiserror::Error;

/// Errors from orchestration operations
#[derive(Debug, Error)]
pub enum OrchError {
    #[error("image not found: {0}")]
    ImageNotFound(String),
    #[error("container not found: {0}")]
    ContainerNotFound(String),
    #[error("failed to run container {name}: {reason}")]
    RunFailed { name: String, reason: String },
    #[error("orchestrator backend error: {0}")]
    Backend(String),
}

/// Adapter for the layer that places containers on machines
#[async_trait]
pub trait Orchestrator: Clone + Send + Sync + 'static {
    /// Run a container, filling in its assigned ID, IP and host ports
    async fn run(&self, container: &mut Container) -> Result<(), OrchError>;

    /// Stop a running container
    async fn stop(&self, container: &Container) -> Result<(), OrchError>;

    /// Remove a container
    async fn remove(&self, container: &Container) -> Result<(), OrchError>;

    /// List known containers
    async fn list(&self) -> Result<Vec<Container>, OrchError>;

    /// Look up a locally available image
    async fn get_image(&self, name: &str) -> Result<Image, OrchError>;

    /// Fetch an image from a registry
    async fn pull_image(&self, name: &str) -> Result<Image, OrchError>;
}
