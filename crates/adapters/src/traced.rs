// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::bus::{BusError, Procedure, RpcBus};
use crate::orch::{OrchError, Orchestrator};
use async_trait::async_trait;
use pipes_core::{Container, Image, Invocation, Reply};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds tracing to any Orchestrator
#[derive(Clone)]
pub struct TracedOrchestrator<O> {
    inner: O,
}

impl<O> TracedOrchestrator<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<O: Orchestrator> Orchestrator for TracedOrchestrator<O> {
    async fn run(&self, container: &mut Container) -> Result<(), OrchError> {
        let span = tracing::info_span!(
            "orch.run",
            name = %container.name,
            image = %container.image.name
        );
        async {
            tracing::info!(cmd = ?container.cmd, env_count = container.env.len(), "starting");

            // Precondition: a container needs an image to run from
            if container.image.name.is_empty() {
                tracing::error!("container has no image");
                return Err(OrchError::RunFailed {
                    name: container.name.clone(),
                    reason: "no image set".to_string(),
                });
            }

            let start = Instant::now();
            let result = self.inner.run(container).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(
                    id = %container.id,
                    ip = %container.ip,
                    elapsed_ms,
                    "container running"
                ),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "run failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn stop(&self, container: &Container) -> Result<(), OrchError> {
        let span = tracing::info_span!("orch.stop", id = %container.id);
        let result = self.inner.stop(container).instrument(span.clone()).await;
        span.in_scope(|| match &result {
            Ok(()) => tracing::info!("stopped"),
            Err(e) => tracing::warn!(error = %e, "stop failed (may be expected)"),
        });
        result
    }

    async fn remove(&self, container: &Container) -> Result<(), OrchError> {
        let span = tracing::info_span!("orch.remove", id = %container.id);
        let result = self.inner.remove(container).instrument(span.clone()).await;
        span.in_scope(|| match &result {
            Ok(()) => tracing::info!("removed"),
            Err(e) => tracing::warn!(error = %e, "remove failed"),
        });
        result
    }

    async fn list(&self) -> Result<Vec<Container>, OrchError> {
        let result = self.inner.list().await;
        tracing::trace!(count = result.as_ref().map(|v| v.len()).ok(), "listed containers");
        result
    }

    async fn get_image(&self, name: &str) -> Result<Image, OrchError> {
        let result = self.inner.get_image(name).await;
        tracing::trace!(name, found = result.is_ok(), "looked up image");
        result
    }

    async fn pull_image(&self, name: &str) -> Result<Image, OrchError> {
        let span = tracing::info_span!("orch.pull", name);
        let start = Instant::now();
        let result = self.inner.pull_image(name).instrument(span.clone()).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        span.in_scope(|| match &result {
            Ok(image) => tracing::info!(elapsed_ms, id = %image.id, "image pulled"),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "pull failed"),
        });
        result
    }
}

/// Wrapper that adds tracing to any RpcBus
#[derive(Clone)]
pub struct TracedBus<B> {
    inner: B,
}

impl<B> TracedBus<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: RpcBus> RpcBus for TracedBus<B> {
    async fn join(&self, realm: &str) -> Result<(), BusError> {
        let result = self.inner.join(realm).await;
        match &result {
            Ok(()) => tracing::debug!(realm, "joined realm"),
            Err(e) => tracing::error!(realm, error = %e, "join failed"),
        }
        result
    }

    async fn register(&self, uri: &str, procedure: Arc<dyn Procedure>) -> Result<(), BusError> {
        let span = tracing::info_span!("bus.register", uri);
        let result = self.inner.register(uri, procedure).instrument(span.clone()).await;
        span.in_scope(|| match &result {
            Ok(()) => tracing::info!("registered"),
            Err(e) => tracing::error!(error = %e, "register failed"),
        });
        result
    }

    async fn unregister(&self, uri: &str) -> Result<(), BusError> {
        let result = self.inner.unregister(uri).await;
        if let Err(e) = &result {
            tracing::warn!(uri, error = %e, "unregister failed");
        }
        result
    }

    async fn call(&self, uri: &str, invocation: Invocation) -> Result<Reply, BusError> {
        let span = tracing::info_span!("bus.call", uri);
        tracing::debug!(parent: &span, args = invocation.args.len(), "calling");

        let start = Instant::now();
        let result = self.inner.call(uri, invocation).instrument(span.clone()).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        span.in_scope(|| match &result {
            Ok(reply) => tracing::debug!(elapsed_ms, responses = reply.args.len(), "replied"),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "call failed"),
        });
        result
    }

    async fn end(&self) -> Result<(), BusError> {
        let result = self.inner.end().await;
        tracing::debug!(ok = result.is_ok(), "session ended");
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
