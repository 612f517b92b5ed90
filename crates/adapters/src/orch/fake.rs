// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake orchestrator for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{OrchError, Orchestrator};
use async_trait::async_trait;
use pipes_core::{Container, Image};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Recorded orchestrator call
#[derive(Debug, Clone)]
pub enum OrchCall {
    Run { name: String, image: String, cmd: Vec<String> },
    Stop { id: String },
    Remove { id: String },
    List,
    GetImage { name: String },
    PullImage { name: String },
}

/// Fake orchestrator for testing
///
/// Assigns IDs `fake-N`, IPs `10.0.0.N` and host ports `3200N` to the
/// mappings that have no host port yet.
#[derive(Clone, Default)]
pub struct FakeOrchestrator {
    containers: Arc<Mutex<HashMap<String, Container>>>,
    images: Arc<Mutex<HashSet<String>>>,
    failing_images: Arc<Mutex<HashSet<String>>>,
    calls: Arc<Mutex<Vec<OrchCall>>>,
    next_id: Arc<Mutex<u64>>,
}

impl FakeOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<OrchCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make an image available to `get_image`
    pub fn add_image(&self, name: &str) {
        self.images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string());
    }

    /// Make every `run` of this image fail
    pub fn fail_runs_of(&self, image: &str) {
        self.failing_images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(image.to_string());
    }

    /// Get a container by ID
    pub fn get_container(&self, id: &str) -> Option<Container> {
        self.containers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    fn record(&self, call: OrchCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl Orchestrator for FakeOrchestrator {
    async fn run(&self, container: &mut Container) -> Result<(), OrchError> {
        self.record(OrchCall::Run {
            name: container.name.clone(),
            image: container.image.name.clone(),
            cmd: container.cmd.clone(),
        });

        let failing = self
            .failing_images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&container.image.name);
        if failing {
            return Err(OrchError::RunFailed {
                name: container.name.clone(),
                reason: "injected failure".to_string(),
            });
        }

        let n = {
            let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
            *next += 1;
            *next
        };
        container.id = format!("fake-{}", n);
        container.ip = format!("10.0.0.{}", n);
        for port in &mut container.ports {
            if port.host.is_empty() {
                port.host = format!("3200{}", n);
            }
        }
        container.active = true;

        self.containers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(container.id.clone(), container.clone());
        Ok(())
    }

    async fn stop(&self, container: &Container) -> Result<(), OrchError> {
        self.record(OrchCall::Stop {
            id: container.id.clone(),
        });
        match self
            .containers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(&container.id)
        {
            Some(c) => {
                c.active = false;
                Ok(())
            }
            None => Err(OrchError::ContainerNotFound(container.id.clone())),
        }
    }

    async fn remove(&self, container: &Container) -> Result<(), OrchError> {
        self.record(OrchCall::Remove {
            id: container.id.clone(),
        });
        self.containers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&container.id)
            .map(|_| ())
            .ok_or_else(|| OrchError::ContainerNotFound(container.id.clone()))
    }

    async fn list(&self) -> Result<Vec<Container>, OrchError> {
        self.record(OrchCall::List);
        let mut containers: Vec<Container> = self
            .containers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        containers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(containers)
    }

    async fn get_image(&self, name: &str) -> Result<Image, OrchError> {
        self.record(OrchCall::GetImage {
            name: name.to_string(),
        });
        if self
            .images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(name)
        {
            Ok(Image::named(name))
        } else {
            Err(OrchError::ImageNotFound(name.to_string()))
        }
    }

    async fn pull_image(&self, name: &str) -> Result<Image, OrchError> {
        self.record(OrchCall::PullImage {
            name: name.to_string(),
        });
        self.add_image(name);
        Ok(Image::named(name))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
