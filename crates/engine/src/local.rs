// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process orchestrator
//!
//! Runs every container of a project as a task of the current process. The
//! API image becomes the front door: an `api` wrapper served over HTTP on an
//! ephemeral loopback port. Any other image becomes a stage worker
//! registered on a shared [`LocalBus`]. Every worker talks to the bus
//! through a [`TracedBus`] session.
//!
//! Containers are described as for any orchestrator; the command line is
//! `[store address, project ID, service]`.

use crate::api;
use crate::project::Project;
use crate::registry;
use crate::wrapper::{Wrapper, WrapperConfig, WrapperError};
use async_trait::async_trait;
use pipes_adapters::{LocalBus, OrchError, Orchestrator, RpcBus, TracedBus};
use pipes_core::consts::{API_IMAGE, API_SERVICE, ROUTER_REALM};
use pipes_core::{Container, Image, JobIdGen};
use pipes_storage::KvStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const LOOPBACK: &str = "127.0.0.1";

struct Worker {
    container: Container,
    session: TracedBus<LocalBus>,
    shutdown: CancellationToken,
}

/// Orchestrator that runs pipeline stages inside this process
#[derive(Clone)]
pub struct LocalOrchestrator<S> {
    store: S,
    bus: LocalBus,
    config: WrapperConfig,
    ids: JobIdGen,
    workers: Arc<Mutex<HashMap<String, Worker>>>,
    next_id: Arc<AtomicU64>,
}

impl<S: KvStore> LocalOrchestrator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            bus: LocalBus::new(),
            config: WrapperConfig::default(),
            ids: JobIdGen::new(),
            workers: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn with_config(mut self, config: WrapperConfig) -> Self {
        self.config = config;
        self
    }

    /// The bus every stage worker registers on
    pub fn bus(&self) -> &LocalBus {
        &self.bus
    }

    fn workers(&self) -> std::sync::MutexGuard<'_, HashMap<String, Worker>> {
        self.workers.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn start(&self, container: &mut Container) -> Result<Worker, String> {
        let project_id = container
            .cmd
            .get(1)
            .ok_or("command has no project ID")?
            .clone();
        let project = Project::get(&project_id, self.store.clone()).map_err(|e| e.to_string())?;

        let session = TracedBus::new(self.bus.connect());
        session.join(ROUTER_REALM).await.map_err(|e| e.to_string())?;
        let shutdown = CancellationToken::new();

        if container.image.name == API_IMAGE {
            let mut wrapper = Wrapper::new(API_SERVICE, project, session.clone())
                .with_config(self.config)
                .with_job_ids(self.ids.clone());
            wrapper.init().map_err(|e| e.to_string())?;

            let listener = TcpListener::bind((LOOPBACK, 0))
                .await
                .map_err(|e| e.to_string())?;
            let port = listener.local_addr().map_err(|e| e.to_string())?.port();
            container.ip = LOOPBACK.to_string();
            for mapping in &mut container.ports {
                mapping.host = port.to_string();
            }

            let token = shutdown.clone();
            tokio::spawn(async move {
                if let Err(e) = api::serve(listener, Arc::new(wrapper), token).await {
                    tracing::error!(error = %e, "API server failed");
                }
            });
        } else {
            let service = container
                .cmd
                .get(2)
                .ok_or("command has no service name")?
                .clone();
            let mut wrapper = Wrapper::new(&service, project, session.clone())
                .with_config(self.config)
                .with_job_ids(self.ids.clone());
            let started: Result<(), WrapperError> = async {
                wrapper.configure()?;
                wrapper.init()?;
                let wrapper = Arc::new(wrapper);
                wrapper.register().await
            }
            .await;
            started.map_err(|e| e.to_string())?;
            container.ip = LOOPBACK.to_string();
        }

        Ok(Worker {
            container: container.clone(),
            session,
            shutdown,
        })
    }
}

#[async_trait]
impl<S: KvStore> Orchestrator for LocalOrchestrator<S> {
    async fn run(&self, container: &mut Container) -> Result<(), OrchError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        container.id = format!("local-{}", n);

        let mut worker = self
            .start(container)
            .await
            .map_err(|reason| OrchError::RunFailed {
                name: container.name.clone(),
                reason,
            })?;
        container.active = true;
        worker.container.active = true;

        self.workers().insert(container.id.clone(), worker);
        Ok(())
    }

    async fn stop(&self, container: &Container) -> Result<(), OrchError> {
        let session = {
            let mut workers = self.workers();
            let worker = workers
                .get_mut(&container.id)
                .ok_or_else(|| OrchError::ContainerNotFound(container.id.clone()))?;
            if !worker.container.active {
                return Ok(());
            }
            worker.container.active = false;
            worker.shutdown.cancel();
            worker.session.clone()
        };
        if let Err(e) = session.end().await {
            tracing::warn!(id = %container.id, error = %e, "bus session not ended");
        }
        Ok(())
    }

    async fn remove(&self, container: &Container) -> Result<(), OrchError> {
        self.stop(container).await?;
        self.workers().remove(&container.id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Container>, OrchError> {
        let mut containers: Vec<Container> =
            self.workers().values().map(|w| w.container.clone()).collect();
        containers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(containers)
    }

    /// The API image is built in; a stage image exists once a service with
    /// that base name is registered
    async fn get_image(&self, name: &str) -> Result<Image, OrchError> {
        if name == API_IMAGE {
            return Ok(Image::named(name));
        }
        let services = registry::registered_services(&self.store)
            .map_err(|e| OrchError::Backend(e.to_string()))?;
        services
            .iter()
            .map(|service| Container::image_for_service(service))
            .find(|image| image.name == name)
            .ok_or_else(|| OrchError::ImageNotFound(name.to_string()))
    }

    async fn pull_image(&self, name: &str) -> Result<Image, OrchError> {
        // Nothing to pull from: local images come from the service registry
        self.get_image(name).await
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
