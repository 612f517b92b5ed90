// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller: materializes a project as running containers

use crate::error::ProjectError;
use crate::project::Project;
use pipes_adapters::{OrchError, Orchestrator};
use pipes_core::consts::{API_IMAGE, API_PORT, API_SERVICE};
use pipes_core::{Container, Image, PortMapping};
use pipes_storage::KvStore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("failed to launch {service}: {source}")]
    Launch {
        service: String,
        #[source]
        source: OrchError,
    },
    #[error("failed to tear down {service}: {source}")]
    Teardown {
        service: String,
        #[source]
        source: OrchError,
    },
    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// Binds a project to an orchestrator
pub struct Controller<O, S> {
    orch: O,
    project: Project<S>,
}

impl<O: Orchestrator, S: KvStore> Controller<O, S> {
    pub fn new(orch: O, project: Project<S>) -> Self {
        Self { orch, project }
    }

    pub fn project(&self) -> &Project<S> {
        &self.project
    }

    /// Run the front door and record its address under the `api` stage
    pub async fn launch_api(&self) -> Result<Container, ControllerError> {
        let name = format!("{}_{}", self.project.name(), API_SERVICE);
        let mut container = Container {
            name: name.clone(),
            hostname: name,
            image: Image::named(API_IMAGE),
            ports: vec![PortMapping {
                container: API_PORT.to_string(),
                host: String::new(),
            }],
            cmd: vec![self.project.store().addr(), self.project.id().to_string()],
            ..Container::default()
        };
        self.run(API_SERVICE, &mut container).await?;
        self.project.set_addr(API_SERVICE, &container.addr())?;

        tracing::info!(project_id = %self.project.id(), addr = %container.addr(), "running API");
        Ok(container)
    }

    /// Run the worker of one stage
    pub async fn launch_service(&self, service: &str) -> Result<Container, ControllerError> {
        tracing::info!(project_id = %self.project.id(), service, "running service");
        let name = format!("{}_{}", self.project.name(), service);
        let image = Container::image_for_service(service);
        self.ensure_image(service, &image.name).await?;

        let mut container = Container {
            name: name.clone(),
            hostname: name,
            image,
            cmd: vec![
                self.project.store().addr(),
                self.project.id().to_string(),
                service.to_string(),
            ],
            ..Container::default()
        };
        self.run(service, &mut container).await?;
        Ok(container)
    }

    /// Launch the front door, then every stage in pipeline order
    ///
    /// Stops at the first failure without rolling back what already runs.
    pub async fn launch_all(&self) -> Result<Vec<(String, Container)>, ControllerError> {
        let mut containers = vec![(API_SERVICE.to_string(), self.launch_api().await?)];
        for service in self.project.services() {
            containers.push((service.clone(), self.launch_service(service).await?));
        }
        Ok(containers)
    }

    /// Stop and remove launched containers, forgetting their records
    ///
    /// Every container is attempted; the first error is returned.
    pub async fn teardown(&self, containers: &[(String, Container)]) -> Result<(), ControllerError> {
        let mut first_err = None;
        for (service, container) in containers {
            let result = async {
                self.orch.stop(container).await?;
                self.orch.remove(container).await
            }
            .await;
            if let Err(source) = result {
                tracing::warn!(service, id = %container.id, error = %source, "teardown failed");
                first_err.get_or_insert(ControllerError::Teardown {
                    service: service.clone(),
                    source,
                });
            }
            if let Err(e) = self.project.remove_container(service, container) {
                tracing::warn!(service, error = %e, "container record not removed");
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    pub fn stop(&self) -> Result<(), ControllerError> {
        Ok(self.project.stop()?)
    }

    async fn ensure_image(&self, service: &str, image: &str) -> Result<(), ControllerError> {
        match self.orch.get_image(image).await {
            Ok(_) => Ok(()),
            Err(OrchError::ImageNotFound(_)) => {
                tracing::info!(image, "image not found locally, pulling");
                self.orch
                    .pull_image(image)
                    .await
                    .map(|_| ())
                    .map_err(|source| ControllerError::Launch {
                        service: service.to_string(),
                        source,
                    })
            }
            Err(source) => Err(ControllerError::Launch {
                service: service.to_string(),
                source,
            }),
        }
    }

    async fn run(&self, service: &str, container: &mut Container) -> Result<(), ControllerError> {
        self.orch
            .run(container)
            .await
            .map_err(|source| ControllerError::Launch {
                service: service.to_string(),
                source,
            })?;
        self.project.set_container(service, container)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
